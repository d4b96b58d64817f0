use parallax_demo::Demo;
use parallax_engine::logging::{init_logging, LoggingConfig};

fn main() {
    init_logging(LoggingConfig::default());

    log::info!("scroll or use PageUp/PageDown; C cycles color, W toggles wireframe, Esc quits");

    if let Err(e) = Demo::new().title("parallax").size(1280.0, 720.0).run() {
        log::error!("{e:#}");
        std::process::exit(1);
    }
}
