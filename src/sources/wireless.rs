use std::fs;
use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, info};

use super::{CommandRunner, WirelessInfoSource};
use crate::device::WirelessConnectionInfo;
use crate::error::StageError;
use crate::util::{field_value, pack_ip_address};

pub const SYSFS_NET: &str = "/sys/class/net";

/// Name reported while the interface is not associated with any network.
pub const UNKNOWN_SSID: &str = "<unknown ssid>";

/// Reads the wireless link through `iw` and `ip`.
pub struct LinuxWirelessSource {
    runner: Arc<dyn CommandRunner>,
    sysfs_net: PathBuf,
    interface: Option<String>, // Fixed interface, otherwise discovered from sysfs
}

impl LinuxWirelessSource {
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        sysfs_net: impl Into<PathBuf>,
        interface: Option<String>,
    ) -> Self {
        Self {
            runner,
            sysfs_net: sysfs_net.into(),
            interface,
        }
    }

    fn interface(&self) -> Result<String, StageError> {
        if let Some(interface) = &self.interface {
            return Ok(interface.clone());
        }
        find_wireless_interface(&self.sysfs_net)?
            .ok_or_else(|| StageError::unavailable("no wireless interface found"))
    }
}

impl WirelessInfoSource for LinuxWirelessSource {
    fn connection_info(&self) -> Result<WirelessConnectionInfo, StageError> {
        let interface = self.interface()?;

        let link = self.runner.run("iw", &["dev", interface.as_str(), "link"])?;
        let ssid = parse_iw_link(&link).unwrap_or_else(|| UNKNOWN_SSID.to_string());

        let addresses = self
            .runner
            .run("ip", &["-4", "-o", "addr", "show", "dev", interface.as_str()])?;
        let ip_address = parse_ipv4_address(&addresses)
            .map(pack_ip_address)
            .unwrap_or(0);

        info!("Wireless interface {} associated with '{}'", interface, ssid);
        Ok(WirelessConnectionInfo { ssid, ip_address })
    }
}

/// Picks the first interface (by name) that exposes a `wireless` directory.
pub fn find_wireless_interface(sysfs_net: &Path) -> Result<Option<String>, StageError> {
    let mut names = Vec::new();
    for entry in fs::read_dir(sysfs_net)? {
        let entry = entry?;
        if entry.path().join("wireless").is_dir() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    debug!("Wireless interfaces under {}: {:?}", sysfs_net.display(), names);
    Ok(names.into_iter().next())
}

/// Network name from `iw dev <iface> link`, `None` when not connected.
pub fn parse_iw_link(output: &str) -> Option<String> {
    if output.trim_start().starts_with("Not connected") {
        return None;
    }
    field_value(output, "SSID").map(str::to_string)
}

/// First IPv4 address in `ip -4 -o addr show` output.
pub fn parse_ipv4_address(output: &str) -> Option<Ipv4Addr> {
    let mut tokens = output.split_whitespace();
    while let Some(token) = tokens.next() {
        if token == "inet" {
            let cidr = tokens.next()?;
            let address = cidr.split('/').next()?;
            return address.parse().ok();
        }
    }
    None
}
