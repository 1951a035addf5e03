use crate::layouts::Rect;
use crate::tdatile::WindowId;

mod mock;
pub use mock::*;

/// Everything the tiler needs from the windowing system.
///
/// Implementations are responsible for any border or frame compensation
/// when moving windows; the rects passed in are the regions the tree
/// computed.
pub trait WindowServer {
    /// Bounds of the area windows are tiled in, `None` if no screen is known.
    fn screen_bounds(&self) -> Option<Rect>;
    /// Windows that should be tiled, in stacking order.
    fn visible_windows(&self) -> Vec<WindowId>;
    /// Current geometry of a window, `None` if the handle is stale.
    fn window_rect(&self, window: WindowId) -> Option<Rect>;
    fn move_window(&mut self, window: WindowId, rect: Rect);
    fn set_foreground(&mut self, window: WindowId);
    fn maximize(&mut self, window: WindowId);
    fn restore(&mut self, window: WindowId);
    fn set_has_titlebar(&mut self, window: WindowId, titlebar: bool);
}
