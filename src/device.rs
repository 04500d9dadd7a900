use crate::error::StageError;

// Fallback labels used when the platform reports no name
pub const UNKNOWN_NAME: &str = "Unknown";
pub const UNKNOWN_PERIPHERAL: &str = "USB Device";

/// Which platform service a record was gathered from. Variants are declared
/// in listing order.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
pub enum Subsystem {
    Wireless,
    Radio,
    SerialBus,
}

impl std::fmt::Display for Subsystem {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Subsystem::Wireless => write!(f, "Wi-Fi"),
            Subsystem::Radio => write!(f, "Bluetooth"),
            Subsystem::SerialBus => write!(f, "USB"),
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
pub enum RecordKind {
    Status,      // A fact about the local machine (network name, adapter name)
    Header,      // Introduces a list of entries
    Entry,       // One paired peer or attached peripheral
    Placeholder, // Stands in for data that could not be read
}

/// One line of the device inventory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeviceRecord {
    pub subsystem: Subsystem,
    pub kind: RecordKind,
    pub text: String,
}

impl std::fmt::Display for DeviceRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}

impl DeviceRecord {
    fn new(subsystem: Subsystem, kind: RecordKind, text: String) -> Self {
        Self { subsystem, kind, text }
    }

    // --- Wireless ---

    pub fn wifi_network(name: &str) -> Self {
        Self::new(Subsystem::Wireless, RecordKind::Status, format!("📶 Wi-Fi Network: {}", name))
    }

    pub fn ip_address(address: &str) -> Self {
        Self::new(Subsystem::Wireless, RecordKind::Status, format!("🖥 IP Address: {}", address))
    }

    // --- Radio ---

    pub fn radio_permission_denied() -> Self {
        Self::new(
            Subsystem::Radio,
            RecordKind::Placeholder,
            "⚠ Bluetooth permission not granted".to_string(),
        )
    }

    pub fn radio_not_supported() -> Self {
        Self::new(Subsystem::Radio, RecordKind::Placeholder, "❌ Bluetooth not supported".to_string())
    }

    pub fn local_adapter(name: Option<&str>) -> Self {
        Self::new(
            Subsystem::Radio,
            RecordKind::Status,
            format!("📱 Local Bluetooth: {}", name.unwrap_or(UNKNOWN_NAME)),
        )
    }

    pub fn radio_disabled() -> Self {
        Self::new(Subsystem::Radio, RecordKind::Placeholder, "🔴 Bluetooth is disabled".to_string())
    }

    pub fn no_paired_peers() -> Self {
        Self::new(
            Subsystem::Radio,
            RecordKind::Placeholder,
            "🔵 No paired Bluetooth devices".to_string(),
        )
    }

    pub fn paired_peers_header() -> Self {
        Self::new(Subsystem::Radio, RecordKind::Header, "🟢 Paired Bluetooth Devices:".to_string())
    }

    pub fn paired_peer(peer: &PairedPeer) -> Self {
        Self::new(
            Subsystem::Radio,
            RecordKind::Entry,
            format!("🔹 {} ({})", peer.name.as_deref().unwrap_or(UNKNOWN_NAME), peer.address),
        )
    }

    // --- Serial bus ---

    pub fn no_peripherals() -> Self {
        Self::new(
            Subsystem::SerialBus,
            RecordKind::Placeholder,
            "🔌 No USB devices connected".to_string(),
        )
    }

    pub fn peripherals_header() -> Self {
        Self::new(Subsystem::SerialBus, RecordKind::Header, "🖥 Connected USB Devices:".to_string())
    }

    pub fn peripheral(peripheral: &Peripheral) -> Self {
        Self::new(
            Subsystem::SerialBus,
            RecordKind::Entry,
            format!(
                "🔹 {} (Vendor: {})",
                peripheral.product_name.as_deref().unwrap_or(UNKNOWN_PERIPHERAL),
                peripheral.vendor_id
            ),
        )
    }

    // --- Any stage ---

    /// Placeholder for a stage that failed part way.
    pub fn unavailable(subsystem: Subsystem, error: &StageError) -> Self {
        Self::new(
            subsystem,
            RecordKind::Placeholder,
            format!("⚠ {} info unavailable: {}", subsystem, error),
        )
    }
}

/// Current association of the wireless link, as the platform reports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WirelessConnectionInfo {
    /// Network name, possibly still wrapped in quotes.
    pub ssid: String,
    /// IPv4 address with the first octet in the low byte.
    pub ip_address: u32,
}

/// The local short-range radio.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RadioAdapter {
    pub name: Option<String>,
    pub address: Option<String>,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairedPeer {
    pub name: Option<String>,
    pub address: String,
}

/// An attached serial-bus peripheral.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Peripheral {
    pub product_name: Option<String>,
    pub vendor_id: u16,
}
