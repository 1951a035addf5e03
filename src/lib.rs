pub mod config;
pub mod layouts;
pub mod logging;
pub mod server;
pub mod tdatile;
#[cfg(feature = "xlib")]
pub mod x11;
