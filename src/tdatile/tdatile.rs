use std::collections::HashMap;

use log::{debug, info, warn};
use thiserror::Error;

use super::{Window, WindowId};
use crate::config::Config;
use crate::layouts::{layout_tree, validate_ratio, LayoutTree, TreeError};
use crate::server::WindowServer;

#[derive(Error, Debug, PartialEq)]
pub enum TDATileError {
    #[error("No screen")]
    NoScreenFound,
    #[error("window {0} is not managed")]
    UnknownWindow(WindowId),
    #[error(transparent)]
    Tree(#[from] TreeError),
}

/// Tiles every managed window of one screen in a BSP tree.
///
/// Shape changes and layout passes must not interleave; callers drive this
/// from a single event loop.
pub struct TDATile<S: WindowServer> {
    pub server: S,
    config: Config,
    tree: LayoutTree,
    windows: HashMap<WindowId, Window>,
    // new windows split this one's region
    focused: Option<WindowId>,
}

impl<S: WindowServer> TDATile<S> {
    pub fn new(server: S, config: Config) -> Result<TDATile<S>, TDATileError> {
        validate_ratio(config.split_ratio)?;
        let screen = config
            .screen
            .or_else(|| server.screen_bounds())
            .ok_or(TDATileError::NoScreenFound)?;
        info!("tiling area is {}", screen);
        Ok(TDATile {
            server,
            config,
            tree: LayoutTree::new(screen),
            windows: HashMap::new(),
            focused: None,
        })
    }

    pub fn tree(&self) -> &LayoutTree {
        &self.tree
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn focused(&self) -> Option<WindowId> {
        self.focused
    }

    pub fn window(&self, id: WindowId) -> Option<&Window> {
        self.windows.get(&id)
    }

    pub fn is_managed(&self, id: WindowId) -> bool {
        self.windows.contains_key(&id)
    }

    /// Starts tiling a newly opened window.
    pub fn manage(&mut self, window: WindowId) -> Result<(), TDATileError> {
        if self.attach(window)? {
            self.layout()?;
        }
        Ok(())
    }

    /// Stops tiling a closed window, giving its region to its sibling.
    pub fn unmanage(&mut self, window: WindowId) -> Result<(), TDATileError> {
        if self.detach(window)? {
            self.layout()?;
        }
        Ok(())
    }

    /// Brings the tree in line with the windows the server reports.
    pub fn sync(&mut self) -> Result<(), TDATileError> {
        let visible = self.server.visible_windows();
        let gone: Vec<WindowId> = self
            .tree
            .windows()
            .into_iter()
            .filter(|w| !visible.contains(w))
            .collect();
        for window in gone {
            self.detach(window)?;
        }
        for window in visible {
            self.attach(window)?;
        }
        self.layout()
    }

    fn attach(&mut self, window: WindowId) -> Result<bool, TDATileError> {
        if self.windows.contains_key(&window) {
            debug!("window {} is already managed", window);
            return Ok(false);
        }
        info!("registering new window with id {}", window);
        self.restore_maximized()?;

        // a maximized window ignores moves
        self.server.restore(window);
        let mut managed = Window::from(window);
        if self.config.hide_titlebars {
            self.server.set_has_titlebar(window, false);
            managed.titlebar_hidden = true;
        }

        let target = self
            .focused
            .and_then(|focused| self.tree.find_window(focused))
            .unwrap_or_else(|| self.tree.last_leaf());
        self.tree
            .split_leaf(target, window, self.config.split_ratio)?;
        self.windows.insert(window, managed);
        Ok(true)
    }

    fn detach(&mut self, window: WindowId) -> Result<bool, TDATileError> {
        if self.windows.remove(&window).is_none() {
            debug!("ignoring unknown window {}", window);
            return Ok(false);
        }
        info!("unregistering window with id {}", window);
        self.restore_maximized()?;
        if let Some(id) = self.tree.find_window(window) {
            self.tree.remove_leaf(id)?;
        }
        if self.focused == Some(window) {
            self.focused = None;
        }
        Ok(true)
    }

    // every region may change with the tree's shape
    fn restore_maximized(&mut self) -> Result<(), TDATileError> {
        for managed in self.windows.values_mut().filter(|w| w.maximized) {
            managed.maximized = false;
            self.server.restore(managed.id);
            if let Some(id) = self.tree.find_window(managed.id) {
                self.tree.forget_placement(id)?;
            }
        }
        Ok(())
    }

    /// Runs a layout pass over the whole tree.
    ///
    /// Windows found away from where they were last placed are moved back.
    pub fn layout(&mut self) -> Result<(), TDATileError> {
        for id in self.tree.leaves() {
            let Some(node) = self.tree.node(id) else {
                continue;
            };
            let (Some(window), Some(placed)) = (node.window(), node.placed()) else {
                continue;
            };
            if self.windows.get(&window).is_some_and(|w| w.maximized) {
                continue;
            }
            match self.server.window_rect(window) {
                Some(actual) if actual != placed => {
                    warn!("window {} drifted to {}, expected {}", window, actual, placed);
                    self.tree.set_placed(id, actual)?;
                }
                _ => {}
            }
        }
        layout_tree(&mut self.tree, &mut self.server)?;
        Ok(())
    }

    /// Raises a window and makes it the target of the next split.
    pub fn focus(&mut self, window: WindowId) -> Result<(), TDATileError> {
        if !self.windows.contains_key(&window) {
            return Err(TDATileError::UnknownWindow(window));
        }
        self.server.set_foreground(window);
        self.focused = Some(window);
        Ok(())
    }

    /// Changes the ratio of the split a window's region came from.
    pub fn set_ratio(&mut self, window: WindowId, ratio: f64) -> Result<(), TDATileError> {
        let id = self
            .tree
            .find_window(window)
            .ok_or(TDATileError::UnknownWindow(window))?;
        let split = self.tree.parent(id)?.unwrap_or(id);
        self.tree.set_ratio(split, ratio)?;
        self.restore_maximized()?;
        self.layout()
    }

    /// Maximizes a window over the whole screen, or puts it back in its
    /// region.
    pub fn toggle_maximized(&mut self, window: WindowId) -> Result<(), TDATileError> {
        let managed = self
            .windows
            .get_mut(&window)
            .ok_or(TDATileError::UnknownWindow(window))?;
        if managed.maximized {
            managed.maximized = false;
            self.server.restore(window);
            if let Some(id) = self.tree.find_window(window) {
                self.tree.forget_placement(id)?;
            }
            self.layout()
        } else {
            managed.maximized = true;
            self.server.maximize(window);
            self.server.set_foreground(window);
            Ok(())
        }
    }

    /// Gives hidden titlebars back before the tiler exits.
    pub fn release(&mut self) {
        for managed in self.windows.values_mut() {
            if managed.titlebar_hidden {
                self.server.set_has_titlebar(managed.id, true);
                managed.titlebar_hidden = false;
            }
        }
    }
}
