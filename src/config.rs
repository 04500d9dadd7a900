use serde::{Deserialize, Serialize};
use std::time::Duration;

const MIN_TOAST_SECONDS: f32 = 0.5;
const MAX_TOAST_SECONDS: f32 = 60.0;

// Application settings saved to JSON. The inventory itself is never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigData {
    #[serde(default)] // Ensure field exists even if missing in JSON
    pub peripheral_backend: PeripheralBackend,
    #[serde(default)] // `None` picks the first wireless interface found
    pub wireless_interface: Option<String>,
    #[serde(default = "default_permission_group")]
    pub permission_group: Option<String>,
    #[serde(default = "default_toast_seconds")]
    pub toast_seconds: f32,
}

fn default_permission_group() -> Option<String> {
    Some("bluetooth".to_string())
}

fn default_toast_seconds() -> f32 {
    2.0
}

// Default values for a new configuration
impl Default for ConfigData {
    fn default() -> Self {
        Self {
            peripheral_backend: PeripheralBackend::default(),
            wireless_interface: None,
            permission_group: default_permission_group(),
            toast_seconds: default_toast_seconds(),
        }
    }
}

impl ConfigData {
    /// How long a notification stays on screen. Out-of-range values from a
    /// hand-edited file are clamped; NaN falls back to the default.
    pub fn toast_duration(&self) -> Duration {
        let seconds = if self.toast_seconds.is_nan() {
            default_toast_seconds()
        } else {
            self.toast_seconds.clamp(MIN_TOAST_SECONDS, MAX_TOAST_SECONDS)
        };
        Duration::from_secs_f32(seconds)
    }
}

// Where the serial-bus peripheral list comes from
#[derive(Debug, Copy, Clone, Default, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PeripheralBackend {
    #[default]
    Hid,   // HID devices through hidapi
    Sysfs, // Every USB device under /sys/bus/usb/devices
}

impl std::fmt::Display for PeripheralBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            PeripheralBackend::Hid => write!(f, "hid"),
            PeripheralBackend::Sysfs => write!(f, "sysfs"),
        }
    }
}

/// Location of the settings file, next to other per-user configuration.
pub fn default_config_path() -> String {
    let config_dir = dirs::config_dir()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|| ".".to_string()); // Fallback to current dir
    format!("{}/device_monitor.json", config_dir)
}
