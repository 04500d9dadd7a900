// Export modules for testing
pub mod about;
pub mod config;
pub mod device;
pub mod error;
pub mod inventory;
pub mod notification;
pub mod permission;
pub mod sources;
pub mod state;
pub mod ui;
pub mod util;

use std::time::{Duration, Instant};

use clap::Parser;
use eframe::{egui, glow};
use fast_config::Config;

// Re-export main types for testing
pub use crate::config::{ConfigData, PeripheralBackend};
pub use crate::device::{DeviceRecord, RecordKind, Subsystem};
pub use crate::error::StageError;
pub use crate::inventory::{fetch_inventory, InventorySnapshot, SharedSnapshot};
pub use crate::sources::Platform;
pub use crate::state::{Screen, ScreenFlow};

use crate::notification::Toasts;

// Constants
pub const PROGRAM_TITLE: &str = "Device Monitor";
pub const INITIAL_WIDTH: f32 = 420.0;
pub const INITIAL_HEIGHT: f32 = 720.0;
const REPAINT_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Settings file (defaults to device_monitor.json in the user config dir)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Where to read attached USB peripherals from, for this session only
    #[arg(short, long, value_enum)]
    pub peripherals: Option<PeripheralBackend>,

    /// Wireless interface to report, for this session only
    #[arg(short, long)]
    pub interface: Option<String>,
}

// The main application struct
pub struct DeviceMonitor {
    // Screen selection
    pub flow: ScreenFlow,

    // Inventory for the current list visit; `None` until the list is shown
    pub snapshot: Option<SharedSnapshot>,

    // Platform services
    pub platform: Platform,

    // Transient notifications
    pub toasts: Toasts,

    // Configuration
    pub config: Config<ConfigData>,
}

impl DeviceMonitor {
    /// Creates the app and runs the startup permission check.
    pub fn new(config: Config<ConfigData>, platform: Platform) -> Self {
        let toasts = Toasts::new(config.data.toast_duration());

        permission::run_permission_gate(platform.permission.as_ref(), toasts.notifier());

        Self {
            flow: ScreenFlow::new(),
            snapshot: None,
            platform,
            toasts,
            config,
        }
    }

    /// Lifecycle hook for the list screen: requests the inventory on first
    /// activation and returns whether it did. `on_complete` runs once the
    /// snapshot lands from the background thread.
    pub fn on_list_shown<F>(&mut self, on_complete: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        if !self.flow.activate_list() || self.snapshot.is_some() {
            return false;
        }

        self.snapshot = Some(inventory::start_fetch(self.platform.clone(), on_complete));
        true
    }

    /// The delivered inventory, if the fetch has finished.
    pub fn current_snapshot(&self) -> Option<InventorySnapshot> {
        self.snapshot.as_ref().and_then(inventory::read_snapshot)
    }

    fn shutdown_app(&mut self) {
        log::info!("Shutdown requested.");
        if let Err(e) = self.config.save() {
            log::error!("Failed to save configuration on exit: {}", e);
        } else {
            log::info!("Configuration saved.");
        }
    }
}

// Main eframe application loop
impl eframe::App for DeviceMonitor {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Keeps toasts expiring and picks up the permission result
        ctx.request_repaint_after(REPAINT_INTERVAL);
        self.toasts.poll(Instant::now());

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(ui::BACKGROUND_COLOR))
            .show(ctx, |ui| match self.flow.screen() {
                Screen::Welcome => ui::draw_welcome_screen(self, ui),
                Screen::List => {
                    let repaint = ctx.clone();
                    self.on_list_shown(move || repaint.request_repaint());
                    ui::draw_device_list(self, ui);
                }
            });

        ui::draw_toasts(&self.toasts, ctx);
    }

    // Called when the application is about to close
    fn on_exit(&mut self, _gl: Option<&glow::Context>) {
        self.shutdown_app();
    }
}
