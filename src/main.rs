use std::error::Error;

use ::x11::xlib;
use log::{debug, info, warn};
use tdatile::config::{self, Config};
use tdatile::logging;
use tdatile::tdatile::TDATile;
use tdatile::x11::X11Adapter;

fn main() -> Result<(), Box<dyn Error>> {
    let loaded = config::load_config();
    let config = loaded.as_ref().cloned().unwrap_or_default();
    let _log = logging::init(&config.log_level);
    if let Err(e) = loaded {
        warn!("{}, using the default config", e);
    }

    let display_name = std::env::var("DISPLAY")?;
    let server = X11Adapter::new(&display_name)?;
    server.init();
    config::run_startup(&config);

    let mut wm = TDATile::new(server, config)?;
    wm.sync()?;
    wm.server.flush();
    run(&mut wm)
}

fn run(wm: &mut TDATile<X11Adapter>) -> Result<(), Box<dyn Error>> {
    info!("tdatile started");
    loop {
        let event = wm.server.next_event();
        match event.get_type() {
            // Window showed
            xlib::MapRequest => {
                let event: xlib::XMapRequestEvent = From::from(event);
                wm.server.map_window(event.window);
                wm.manage(event.window)?;
            }
            xlib::UnmapNotify => {
                let event: xlib::XUnmapEvent = From::from(event);
                wm.unmanage(event.window)?;
            }
            // Window deleted
            xlib::DestroyNotify => {
                let event: xlib::XDestroyWindowEvent = From::from(event);
                wm.unmanage(event.window)?;
            }
            xlib::ConfigureRequest => {
                let event: xlib::XConfigureRequestEvent = From::from(event);
                if wm.is_managed(event.window) {
                    // tiled windows stay in their region
                    wm.layout()?;
                } else {
                    wm.server.configure_window(&event);
                }
            }
            _ => {
                debug!("unknown event {:?}", event);
                continue;
            }
        }
        wm.server.flush();
    }
}
