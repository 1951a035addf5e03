use std::{
    ffi::{c_int, c_uchar, c_uint, c_ulong, CString, NulError},
    mem::zeroed,
    ptr, slice,
};

use log::{trace, warn};
use thiserror::Error;
use x11::{xinerama, xlib};

use crate::layouts::Rect;
use crate::server::WindowServer;
use crate::tdatile::WindowId;

const MWM_HINTS_DECORATIONS: c_ulong = 1 << 1;

pub struct X11Adapter {
    pub display: *mut xlib::Display,
    pub root_window: WindowId,
    motif_hints: xlib::Atom,
}
#[derive(Debug, Error)]
pub enum X11Error {
    #[error("display {0} not found")]
    DisplayNotFound(String),
    #[error("{0}")]
    NulString(#[from] NulError),
}

// Requests on windows that vanished in the meantime are expected, so X
// errors are logged instead of aborting.
unsafe extern "C" fn on_x_error(_: *mut xlib::Display, event: *mut xlib::XErrorEvent) -> c_int {
    let event = &*event;
    warn!(
        "x11 error {} on resource {} (request {})",
        event.error_code, event.resourceid, event.request_code
    );
    0
}

impl X11Adapter {
    pub fn new(display_name: &str) -> Result<Self, X11Error> {
        let display: *mut xlib::Display =
            unsafe { xlib::XOpenDisplay(CString::new(display_name)?.as_ptr()) };
        if display.is_null() {
            return Err(X11Error::DisplayNotFound(display_name.into()));
        }
        let atom_name = CString::new("_MOTIF_WM_HINTS")?;
        let (root_window, motif_hints) = unsafe {
            (
                xlib::XDefaultRootWindow(display),
                xlib::XInternAtom(display, atom_name.as_ptr(), xlib::False),
            )
        };
        Ok(X11Adapter {
            display,
            root_window,
            motif_hints,
        })
    }
    pub fn init(&self) {
        trace!("registering to x11 as a window manager");
        unsafe {
            xlib::XSetErrorHandler(Some(on_x_error));
            // https://tronche.com/gui/x/xlib/event-handling/XSelectInput.html
            xlib::XSelectInput(
                self.display,
                self.root_window,
                xlib::SubstructureRedirectMask
                    | xlib::SubstructureNotifyMask
                    | xlib::StructureNotifyMask,
            );
            xlib::XSync(self.display, xlib::False);
        }
    }
    pub fn next_event(&self) -> xlib::XEvent {
        let mut event: xlib::XEvent = unsafe { zeroed() };
        unsafe {
            xlib::XNextEvent(self.display, &mut event);
        }
        event
    }
    pub fn flush(&self) {
        unsafe {
            xlib::XFlush(self.display);
        }
    }
    pub fn map_window(&self, window: WindowId) {
        trace!("mapping window {}", window);
        unsafe {
            xlib::XMapWindow(self.display, window);
        }
    }
    /// Grants a configure request as asked, for windows that are not tiled.
    pub fn configure_window(&self, event: &xlib::XConfigureRequestEvent) {
        let mut changes = xlib::XWindowChanges {
            x: event.x,
            y: event.y,
            width: event.width,
            height: event.height,
            border_width: event.border_width,
            sibling: event.above,
            stack_mode: event.detail,
        };
        unsafe {
            xlib::XConfigureWindow(
                self.display,
                event.window,
                event.value_mask as c_uint,
                &mut changes,
            );
        }
    }
    fn is_tileable(&self, window: WindowId) -> bool {
        let mut attributes: xlib::XWindowAttributes = unsafe { zeroed() };
        let status = unsafe { xlib::XGetWindowAttributes(self.display, window, &mut attributes) };
        status != 0
            && attributes.map_state == xlib::IsViewable
            && attributes.override_redirect == xlib::False
            && attributes.class == xlib::InputOutput
    }
}

impl WindowServer for X11Adapter {
    fn screen_bounds(&self) -> Option<Rect> {
        unsafe {
            let mut num: c_int = 0;
            let screen_pointers = xinerama::XineramaQueryScreens(self.display, &mut num);
            if !screen_pointers.is_null() {
                // first screen only, no multi display
                let first = slice::from_raw_parts(screen_pointers, num as usize)
                    .first()
                    .map(|s| {
                        Rect::new(
                            s.x_org.into(),
                            s.y_org.into(),
                            s.width as u32,
                            s.height as u32,
                        )
                    });
                xlib::XFree(screen_pointers.cast());
                if first.is_some() {
                    return first;
                }
            }
            let screen = xlib::XDefaultScreen(self.display);
            let width = xlib::XDisplayWidth(self.display, screen);
            let height = xlib::XDisplayHeight(self.display, screen);
            (width > 0 && height > 0).then(|| Rect::new(0, 0, width as u32, height as u32))
        }
    }

    fn visible_windows(&self) -> Vec<WindowId> {
        let mut root_return: xlib::Window = 0;
        let mut parent_return: xlib::Window = 0;
        let mut children: *mut xlib::Window = ptr::null_mut();
        let mut count: c_uint = 0;
        let status = unsafe {
            xlib::XQueryTree(
                self.display,
                self.root_window,
                &mut root_return,
                &mut parent_return,
                &mut children,
                &mut count,
            )
        };
        if status == 0 || children.is_null() {
            return Vec::new();
        }
        let windows: Vec<WindowId> = unsafe { slice::from_raw_parts(children, count as usize) }
            .iter()
            .copied()
            .filter(|w| self.is_tileable(*w))
            .collect();
        unsafe {
            xlib::XFree(children.cast());
        }
        windows
    }

    fn window_rect(&self, window: WindowId) -> Option<Rect> {
        let mut root: xlib::Window = 0;
        let (mut x, mut y): (c_int, c_int) = (0, 0);
        let (mut w, mut h, mut border, mut depth): (c_uint, c_uint, c_uint, c_uint) = (0, 0, 0, 0);
        let status = unsafe {
            xlib::XGetGeometry(
                self.display,
                window,
                &mut root,
                &mut x,
                &mut y,
                &mut w,
                &mut h,
                &mut border,
                &mut depth,
            )
        };
        (status != 0).then(|| Rect::new(x, y, w, h))
    }

    fn move_window(&mut self, window: WindowId, rect: Rect) {
        trace!("moving window {} to {}", window, rect);
        unsafe {
            // zero sized windows are a protocol error
            xlib::XMoveResizeWindow(
                self.display,
                window,
                rect.x,
                rect.y,
                rect.w.max(1),
                rect.h.max(1),
            );
        }
    }

    fn set_foreground(&mut self, window: WindowId) {
        trace!("putting window {} on top", window);
        unsafe {
            xlib::XRaiseWindow(self.display, window);
            xlib::XSetInputFocus(self.display, window, xlib::RevertToParent, xlib::CurrentTime);
        }
    }

    fn maximize(&mut self, window: WindowId) {
        if let Some(screen) = self.screen_bounds() {
            self.move_window(window, screen);
        }
        self.set_foreground(window);
    }

    fn restore(&mut self, window: WindowId) {
        // iconified windows come back when mapped again
        self.map_window(window);
    }

    fn set_has_titlebar(&mut self, window: WindowId, titlebar: bool) {
        let hints: [c_ulong; 5] = [MWM_HINTS_DECORATIONS, 0, c_ulong::from(titlebar), 0, 0];
        unsafe {
            xlib::XChangeProperty(
                self.display,
                window,
                self.motif_hints,
                self.motif_hints,
                32,
                xlib::PropModeReplace,
                hints.as_ptr() as *const c_uchar,
                hints.len() as c_int,
            );
        }
    }
}
