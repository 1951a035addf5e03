use super::WindowId;

/// Per-window state the tiler keeps next to the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub id: WindowId,
    pub titlebar_hidden: bool,
    pub maximized: bool,
}
impl From<WindowId> for Window {
    fn from(value: WindowId) -> Self {
        Self {
            id: value,
            titlebar_hidden: false,
            maximized: false,
        }
    }
}
