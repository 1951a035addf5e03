mod tdatile;
pub use tdatile::*;
mod window;
pub use window::*;

/// Opaque handle of a window, owned by the window server.
pub type WindowId = u64;
