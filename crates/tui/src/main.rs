mod app;

use anyhow::Result;
use std::fs::{self, OpenOptions};

use innkeep_core::{
    config::{self, AppConfig},
    manager::ReservationManager,
    store::JsonStore,
};
use tracing_subscriber::{prelude::*, EnvFilter};

fn main() -> Result<()> {
    init_logging()?;

    config::ensure_default_config()?;
    let config = AppConfig::load()?;
    tracing::info!(
        "using rooms file {} and bookings file {}",
        config.rooms_path().display(),
        config.bookings_path().display()
    );

    let store = JsonStore::new(config.rooms_path(), config.bookings_path());
    let manager = ReservationManager::load(store);

    let mut app = app::InnkeepApp::new(manager);
    app.run()
}

fn init_logging() -> Result<()> {
    let log_dir = std::env::current_dir()?.join("logs");
    fs::create_dir_all(&log_dir)?;
    let log_path = log_dir.join("innkeep.log");

    let env_filter = EnvFilter::from_default_env();

    // Everything goes to the log file; stdout belongs to the terminal UI.
    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .compact()
        .with_writer(move || {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(&log_path)
                .expect("failed to open log file")
        });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    Ok(())
}
