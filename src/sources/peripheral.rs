use hidapi::{BusType, DeviceInfo, HidApi};
use log::{info, trace, warn};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use super::PeripheralSource;
use crate::device::Peripheral;
use crate::error::StageError;

pub const SYSFS_USB_DEVICES: &str = "/sys/bus/usb/devices";
const SYSFS_HIDRAW: &str = "/sys/class/hidraw";

/// Lists USB HID peripherals through hidapi.
pub struct HidPeripheralSource;

impl PeripheralSource for HidPeripheralSource {
    fn attached(&self) -> Result<Vec<Peripheral>, StageError> {
        let hidapi = HidApi::new()?;
        let peripherals = collect_hid_peripherals(hidapi.device_list().map(HidInterface::from_info));
        info!("hidapi reported {} USB peripherals.", peripherals.len());
        Ok(peripherals)
    }
}

/// One HID interface as hidapi enumerates it.
#[derive(Debug, Clone)]
pub struct HidInterface {
    pub bus: BusType,
    pub vendor_id: u16,
    pub product_id: u16,
    pub serial_number: String,
    pub product_name: Option<String>,
    /// Names the physical device the interface belongs to.
    pub device_key: String,
}

impl HidInterface {
    fn from_info(device_info: &DeviceInfo) -> Self {
        let path = device_info.path().to_string_lossy().into_owned();
        Self {
            bus: device_info.bus_type(),
            vendor_id: device_info.vendor_id(),
            product_id: device_info.product_id(),
            serial_number: device_info.serial_number().unwrap_or("").to_string(),
            product_name: device_info
                .product_string()
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string),
            device_key: physical_device_key(&path),
        }
    }
}

/// Keeps USB interfaces only, one peripheral per physical device, in
/// enumeration order.
pub fn collect_hid_peripherals(interfaces: impl IntoIterator<Item = HidInterface>) -> Vec<Peripheral> {
    let mut seen_devices = HashSet::new();
    let mut peripherals = Vec::new();
    for interface in interfaces {
        if !matches!(interface.bus, BusType::Usb) {
            // Bluetooth, I2C and SPI HID devices are not serial-bus peripherals
            trace!("Skipping non-USB HID device {}", interface.device_key);
            continue;
        }
        if interface.vendor_id == 0 {
            // Virtual devices (uinput and friends) carry no vendor
            continue;
        }
        let key = (
            interface.vendor_id,
            interface.product_id,
            interface.serial_number.clone(),
            interface.device_key.clone(),
        );
        if !seen_devices.insert(key) {
            trace!("Skipping further interface of {}", interface.device_key);
            continue;
        }
        peripherals.push(Peripheral {
            product_name: interface.product_name,
            vendor_id: interface.vendor_id,
        });
    }
    peripherals
}

// Resolves a hidraw node to its USB device; other paths are kept as they are,
// so their interfaces count separately.
fn physical_device_key(hid_path: &str) -> String {
    let node = match Path::new(hid_path).file_name() {
        Some(node) => node,
        None => return hid_path.to_string(),
    };
    fs::canonicalize(Path::new(SYSFS_HIDRAW).join(node).join("device"))
        .ok()
        .and_then(|resolved| usb_device_from_sysfs_path(&resolved))
        .unwrap_or_else(|| hid_path.to_string())
}

/// Finds the USB device ("1-1.4") above an interface directory ("1-1.4:1.0")
/// in a resolved sysfs path.
pub fn usb_device_from_sysfs_path(path: &Path) -> Option<String> {
    path.components().rev().find_map(|component| {
        let name = component.as_os_str().to_str()?;
        let (device, interface) = name.split_once(':')?;
        let is_usb_interface = device.starts_with(|c: char| c.is_ascii_digit())
            && device.contains('-')
            && interface.contains('.');
        is_usb_interface.then(|| device.to_string())
    })
}

/// Lists every attached USB device from sysfs, HID or not.
pub struct SysfsPeripheralSource {
    root: PathBuf,
}

impl SysfsPeripheralSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl PeripheralSource for SysfsPeripheralSource {
    fn attached(&self) -> Result<Vec<Peripheral>, StageError> {
        if !self.root.is_dir() {
            return Err(StageError::unavailable(format!(
                "{} does not exist",
                self.root.display()
            )));
        }

        let mut peripherals = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            // Skip interfaces ("1-1:1.0") and root hubs ("usb1")
            if name.contains(':') || name.starts_with("usb") {
                continue;
            }
            match read_sysfs_device(&entry.path()) {
                Ok(Some(peripheral)) => peripherals.push(peripheral),
                Ok(None) => trace!("{} has no idVendor, skipping", name),
                Err(e) => {
                    warn!("Failed to read USB device {}: {}", name, e);
                    return Err(e);
                }
            }
        }

        info!("sysfs reported {} USB devices.", peripherals.len());
        Ok(peripherals)
    }
}

fn read_sysfs_device(path: &Path) -> Result<Option<Peripheral>, StageError> {
    let vendor_path = path.join("idVendor");
    if !vendor_path.is_file() {
        return Ok(None);
    }
    let raw_vendor = fs::read_to_string(&vendor_path)?;
    let vendor_id = u16::from_str_radix(raw_vendor.trim(), 16).map_err(|e| {
        StageError::unexpected(format!(
            "invalid idVendor '{}' in {}: {}",
            raw_vendor.trim(),
            path.display(),
            e
        ))
    })?;

    // `product` is optional; many devices do not provide a string descriptor
    let product_name = fs::read_to_string(path.join("product"))
        .ok()
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty());

    Ok(Some(Peripheral {
        product_name,
        vendor_id,
    }))
}
