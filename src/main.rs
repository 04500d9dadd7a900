#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

use std::process::exit;

use clap::Parser;
use device_monitor::config::{default_config_path, ConfigData};
use device_monitor::sources::{Platform, PlatformOverrides};
use device_monitor::{Args, DeviceMonitor, INITIAL_HEIGHT, INITIAL_WIDTH, PROGRAM_TITLE};
use eframe::egui;
use fast_config::Config;

// Application Entry Point
fn main() -> eframe::Result<()> {
    // Initialize logging
    #[cfg(feature = "logging")]
    env_logger::init();

    let args = Args::parse();
    log::info!("Starting {}", PROGRAM_TITLE);

    let config_path = args.config.clone().unwrap_or_else(default_config_path);
    let config = match Config::new(&config_path, ConfigData::default()) {
        Ok(cfg) => cfg,
        Err(e) => {
            log::error!("Error creating config file at {}: {}", config_path, e);
            eprintln!("Error creating config file at {}: {}", config_path, e);
            exit(1)
        }
    };

    let overrides = PlatformOverrides {
        peripheral_backend: args.peripherals,
        wireless_interface: args.interface,
    };
    let platform = Platform::system(&config.data, &overrides);
    let app = DeviceMonitor::new(config, platform);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([INITIAL_WIDTH, INITIAL_HEIGHT])
            .with_title(PROGRAM_TITLE),
        ..Default::default()
    };

    eframe::run_native(
        PROGRAM_TITLE,
        options,
        Box::new(move |_cc| Ok(Box::new(app))),
    )
}
