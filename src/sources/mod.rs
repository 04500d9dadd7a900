//! Capability traits for the platform services the inventory reads, plus
//! their Linux implementations.

pub mod command;
pub mod peripheral;
pub mod radio;
pub mod wireless;

use std::sync::Arc;

use crate::config::{ConfigData, PeripheralBackend};
use crate::device::{PairedPeer, Peripheral, RadioAdapter, WirelessConnectionInfo};
use crate::error::StageError;
use crate::permission::{GroupPermissionOracle, PermissionOracle};

pub use command::{CommandRunner, SystemCommandRunner};

/// Reports the current wireless association.
pub trait WirelessInfoSource: Send + Sync {
    fn connection_info(&self) -> Result<WirelessConnectionInfo, StageError>;
}

/// Reports the local short-range radio and its paired peers.
pub trait RadioAdapterSource: Send + Sync {
    /// `Ok(None)` when the machine has no adapter at all.
    fn default_adapter(&self) -> Result<Option<RadioAdapter>, StageError>;

    /// Previously paired peers, in the order the platform lists them.
    fn paired_peers(&self, adapter: &RadioAdapter) -> Result<Vec<PairedPeer>, StageError>;
}

/// Lists attached serial-bus peripherals.
pub trait PeripheralSource: Send + Sync {
    fn attached(&self) -> Result<Vec<Peripheral>, StageError>;
}

/// Everything the aggregator needs from the machine.
#[derive(Clone)]
pub struct Platform {
    pub wireless: Arc<dyn WirelessInfoSource>,
    pub radio: Arc<dyn RadioAdapterSource>,
    pub peripherals: Arc<dyn PeripheralSource>,
    pub permission: Arc<dyn PermissionOracle>,
}

/// Session overrides taken from the command line.
#[derive(Debug, Clone, Default)]
pub struct PlatformOverrides {
    pub peripheral_backend: Option<PeripheralBackend>,
    pub wireless_interface: Option<String>,
}

impl Platform {
    /// Builds the Linux sources described by the configuration.
    pub fn system(config: &ConfigData, overrides: &PlatformOverrides) -> Self {
        let runner: Arc<dyn CommandRunner> = Arc::new(SystemCommandRunner);

        let interface = overrides
            .wireless_interface
            .clone()
            .or_else(|| config.wireless_interface.clone());
        let backend = overrides
            .peripheral_backend
            .unwrap_or(config.peripheral_backend);
        log::info!(
            "Platform sources: wireless interface={}, peripherals={:?}, permission group={}",
            interface.as_deref().unwrap_or("auto"),
            backend,
            config.permission_group.as_deref().unwrap_or("none"),
        );

        let peripherals: Arc<dyn PeripheralSource> = match backend {
            PeripheralBackend::Hid => Arc::new(peripheral::HidPeripheralSource),
            PeripheralBackend::Sysfs => {
                Arc::new(peripheral::SysfsPeripheralSource::new(peripheral::SYSFS_USB_DEVICES))
            }
        };

        Self {
            wireless: Arc::new(wireless::LinuxWirelessSource::new(
                runner.clone(),
                wireless::SYSFS_NET,
                interface,
            )),
            radio: Arc::new(radio::BluetoothctlSource::new(runner.clone())),
            peripherals,
            permission: Arc::new(GroupPermissionOracle::new(
                runner,
                config.permission_group.clone(),
            )),
        }
    }
}
