use std::sync::Arc;

use log::{debug, info};

use super::{CommandRunner, RadioAdapterSource};
use crate::device::{PairedPeer, RadioAdapter};
use crate::error::StageError;
use crate::util::field_value;

const NO_CONTROLLER: &str = "No default controller available";

/// Queries BlueZ through `bluetoothctl`.
pub struct BluetoothctlSource {
    runner: Arc<dyn CommandRunner>,
}

impl BluetoothctlSource {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }
}

impl RadioAdapterSource for BluetoothctlSource {
    fn default_adapter(&self) -> Result<Option<RadioAdapter>, StageError> {
        let output = self.runner.run("bluetoothctl", &["show"])?;
        let adapter = parse_show(&output);
        match &adapter {
            Some(a) => info!(
                "Bluetooth controller {} ({}), powered: {}",
                a.address.as_deref().unwrap_or("?"),
                a.name.as_deref().unwrap_or("unnamed"),
                a.enabled
            ),
            None => info!("No Bluetooth controller found."),
        }
        Ok(adapter)
    }

    fn paired_peers(&self, _adapter: &RadioAdapter) -> Result<Vec<PairedPeer>, StageError> {
        let output = self.runner.run("bluetoothctl", &["devices", "Paired"])?;
        // BlueZ before 5.65 only knows the older spelling
        let output = if output.contains("Invalid command") || output.contains("Too many arguments") {
            debug!("bluetoothctl rejected 'devices Paired', falling back to 'paired-devices'");
            self.runner.run("bluetoothctl", &["paired-devices"])?
        } else {
            output
        };
        Ok(parse_devices(&output))
    }
}

/// Parses `bluetoothctl show`. `None` when no controller exists.
pub fn parse_show(output: &str) -> Option<RadioAdapter> {
    if output.contains(NO_CONTROLLER) {
        return None;
    }
    let address = output
        .lines()
        .find_map(|line| line.trim_start().strip_prefix("Controller "))
        .and_then(|rest| rest.split_whitespace().next())
        .map(str::to_string)?;

    let name = field_value(output, "Alias")
        .or_else(|| field_value(output, "Name"))
        .map(str::to_string);
    let enabled = field_value(output, "Powered") == Some("yes");

    Some(RadioAdapter {
        name,
        address: Some(address),
        enabled,
    })
}

/// Parses `Device <address> <name>` lines, keeping their order.
pub fn parse_devices(output: &str) -> Vec<PairedPeer> {
    output
        .lines()
        .filter_map(|line| {
            let rest = line.trim().strip_prefix("Device ")?;
            let (address, name) = match rest.split_once(' ') {
                Some((address, name)) => (address, name.trim()),
                None => (rest, ""),
            };
            // Unnamed peers are listed with their address in dashed form
            let name = if name.is_empty() || name == address.replace(':', "-") {
                None
            } else {
                Some(name.to_string())
            };
            Some(PairedPeer {
                name,
                address: address.to_string(),
            })
        })
        .collect()
}
