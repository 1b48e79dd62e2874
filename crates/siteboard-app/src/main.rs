//! Main application entry point (native).

#[cfg(feature = "native")]
fn main() {
    use siteboard_app::{App, AppConfig, ShortcutRegistry};

    env_logger::init();
    log::info!("Starting SiteBoard");

    let config = match std::env::args().nth(1) {
        Some(path) => match std::fs::read_to_string(&path) {
            Ok(json) => match AppConfig::from_json(&json) {
                Ok(config) => config,
                Err(e) => {
                    log::error!("Invalid config {}: {}", path, e);
                    std::process::exit(1);
                }
            },
            Err(e) => {
                log::error!("Failed to read config {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => AppConfig::default(),
    };

    let storage = match config.open_storage() {
        Ok(storage) => storage,
        Err(e) => {
            log::error!("Failed to open board storage: {}", e);
            std::process::exit(1);
        }
    };
    log::info!("Board data in {}", storage.base_path().display());

    let mut app = App::new(storage, config);
    let ui = app.ui_state().clone();
    println!("{}: {}, zoom {}", app.config().title, ui.status_text(), ui.zoom_label());

    match app.render() {
        Ok(frame) => log::info!(
            "First frame: {} background and {} layer commands",
            frame.background.len(),
            frame.layer.len()
        ),
        Err(e) => log::error!("Render failed: {}", e),
    }

    ShortcutRegistry::print_all();
}

#[cfg(not(feature = "native"))]
fn main() {
    panic!("Native feature not enabled. Use `cargo run --features native`");
}
