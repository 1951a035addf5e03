use std::collections::HashMap;

use super::WindowServer;
use crate::layouts::Rect;
use crate::tdatile::WindowId;

/// A recorded call made to a [`MockServer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerCall {
    Move(WindowId, Rect),
    Foreground(WindowId),
    Maximize(WindowId),
    Restore(WindowId),
    Titlebar(WindowId, bool),
}

/// In-memory window server. Windows follow the moves issued to them, so
/// geometry reads see what the tiler last asked for unless a test drifts
/// them on purpose.
#[derive(Debug, Default, Clone)]
pub struct MockServer {
    pub screen: Option<Rect>,
    pub windows: Vec<WindowId>,
    pub geometry: HashMap<WindowId, Rect>,
    pub calls: Vec<ServerCall>,
}

impl MockServer {
    pub fn new(screen: Rect) -> Self {
        MockServer {
            screen: Some(screen),
            ..Default::default()
        }
    }

    pub fn open(&mut self, window: WindowId) {
        if !self.windows.contains(&window) {
            self.windows.push(window);
        }
    }

    pub fn close(&mut self, window: WindowId) {
        self.windows.retain(|w| *w != window);
        self.geometry.remove(&window);
    }

    /// Moves a window behind the tiler's back.
    pub fn drift(&mut self, window: WindowId, rect: Rect) {
        self.geometry.insert(window, rect);
    }

    pub fn moves(&self) -> Vec<(WindowId, Rect)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                ServerCall::Move(window, rect) => Some((*window, *rect)),
                _ => None,
            })
            .collect()
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }
}

impl WindowServer for MockServer {
    fn screen_bounds(&self) -> Option<Rect> {
        self.screen
    }

    fn visible_windows(&self) -> Vec<WindowId> {
        self.windows.clone()
    }

    fn window_rect(&self, window: WindowId) -> Option<Rect> {
        self.geometry.get(&window).copied()
    }

    fn move_window(&mut self, window: WindowId, rect: Rect) {
        self.geometry.insert(window, rect);
        self.calls.push(ServerCall::Move(window, rect));
    }

    fn set_foreground(&mut self, window: WindowId) {
        self.calls.push(ServerCall::Foreground(window));
    }

    fn maximize(&mut self, window: WindowId) {
        if let Some(screen) = self.screen {
            self.geometry.insert(window, screen);
        }
        self.calls.push(ServerCall::Maximize(window));
    }

    fn restore(&mut self, window: WindowId) {
        self.calls.push(ServerCall::Restore(window));
    }

    fn set_has_titlebar(&mut self, window: WindowId, titlebar: bool) {
        self.calls.push(ServerCall::Titlebar(window, titlebar));
    }
}
