#![allow(dead_code)]

use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use device_monitor::device::{PairedPeer, Peripheral, RadioAdapter, WirelessConnectionInfo};
use device_monitor::error::StageError;
use device_monitor::permission::{PermissionCallback, PermissionOracle, PermissionStatus};
use device_monitor::sources::{
    CommandRunner, PeripheralSource, Platform, RadioAdapterSource, WirelessInfoSource,
};
use device_monitor::util::pack_ip_address;

/// Canned behaviour of a fake platform call.
#[derive(Debug, Clone)]
pub enum Fake<T> {
    Value(T),
    Fail(&'static str),
    Panic(&'static str),
}

impl<T: Clone> Fake<T> {
    pub fn get(&self) -> Result<T, StageError> {
        match self {
            Fake::Value(value) => Ok(value.clone()),
            Fake::Fail(message) => Err(StageError::unavailable(*message)),
            Fake::Panic(message) => panic!("{}", message),
        }
    }
}

pub struct FakeWireless(pub Fake<WirelessConnectionInfo>);

impl WirelessInfoSource for FakeWireless {
    fn connection_info(&self) -> Result<WirelessConnectionInfo, StageError> {
        self.0.get()
    }
}

pub struct FakeRadio {
    pub adapter: Fake<Option<RadioAdapter>>,
    pub peers: Fake<Vec<PairedPeer>>,
}

impl RadioAdapterSource for FakeRadio {
    fn default_adapter(&self) -> Result<Option<RadioAdapter>, StageError> {
        self.adapter.get()
    }

    fn paired_peers(&self, _adapter: &RadioAdapter) -> Result<Vec<PairedPeer>, StageError> {
        self.peers.get()
    }
}

pub struct FakePeripherals(pub Fake<Vec<Peripheral>>);

impl PeripheralSource for FakePeripherals {
    fn attached(&self) -> Result<Vec<Peripheral>, StageError> {
        self.0.get()
    }
}

/// Permission owner whose status can change between reads.
pub struct FakePermission {
    pub status: Mutex<PermissionStatus>,
    pub request_outcome: PermissionStatus,
    pub status_reads: AtomicUsize,
    pub requests: AtomicUsize,
}

impl FakePermission {
    pub fn new(status: PermissionStatus, request_outcome: PermissionStatus) -> Self {
        Self {
            status: Mutex::new(status),
            request_outcome,
            status_reads: AtomicUsize::new(0),
            requests: AtomicUsize::new(0),
        }
    }

    pub fn set(&self, status: PermissionStatus) {
        *self.status.lock().unwrap() = status;
    }
}

impl PermissionOracle for FakePermission {
    fn status(&self) -> PermissionStatus {
        self.status_reads.fetch_add(1, Ordering::SeqCst);
        *self.status.lock().unwrap()
    }

    fn request(&self, on_result: PermissionCallback) {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let outcome = self.request_outcome;
        std::thread::spawn(move || on_result(outcome));
    }
}

pub fn home_network() -> WirelessConnectionInfo {
    WirelessConnectionInfo {
        ssid: "\"HomeNet\"".to_string(),
        ip_address: pack_ip_address(Ipv4Addr::new(192, 168, 1, 23)),
    }
}

pub fn enabled_adapter() -> RadioAdapter {
    RadioAdapter {
        name: Some("workstation".to_string()),
        address: Some("00:1A:7D:DA:71:13".to_string()),
        enabled: true,
    }
}

pub fn peer(name: Option<&str>, address: &str) -> PairedPeer {
    PairedPeer {
        name: name.map(str::to_string),
        address: address.to_string(),
    }
}

pub fn peripheral(name: Option<&str>, vendor_id: u16) -> Peripheral {
    Peripheral {
        product_name: name.map(str::to_string),
        vendor_id,
    }
}

/// Builds a platform where every subsystem works, then lets tests break parts.
pub struct PlatformBuilder {
    pub wireless: Fake<WirelessConnectionInfo>,
    pub adapter: Fake<Option<RadioAdapter>>,
    pub peers: Fake<Vec<PairedPeer>>,
    pub peripherals: Fake<Vec<Peripheral>>,
    pub permission: PermissionStatus,
}

impl Default for PlatformBuilder {
    fn default() -> Self {
        Self {
            wireless: Fake::Value(home_network()),
            adapter: Fake::Value(Some(enabled_adapter())),
            peers: Fake::Value(vec![peer(Some("Headphones"), "AA:BB:CC:DD:EE:01")]),
            peripherals: Fake::Value(vec![peripheral(Some("USB Keyboard"), 1133)]),
            permission: PermissionStatus::Granted,
        }
    }
}

impl PlatformBuilder {
    pub fn build(self) -> Platform {
        self.build_with_permission().0
    }

    pub fn build_with_permission(self) -> (Platform, Arc<FakePermission>) {
        let permission = Arc::new(FakePermission::new(self.permission, PermissionStatus::Granted));
        let platform = Platform {
            wireless: Arc::new(FakeWireless(self.wireless)),
            radio: Arc::new(FakeRadio {
                adapter: self.adapter,
                peers: self.peers,
            }),
            peripherals: Arc::new(FakePeripherals(self.peripherals)),
            permission: permission.clone(),
        };
        (platform, permission)
    }
}

/// Replays canned tool output keyed by the full command line.
#[derive(Default)]
pub struct FakeRunner {
    pub outputs: HashMap<String, String>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeRunner {
    pub fn with(mut self, command: &str, output: &str) -> Self {
        self.outputs.insert(command.to_string(), output.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl CommandRunner for FakeRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<String, StageError> {
        let command = std::iter::once(program)
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ");
        self.calls.lock().unwrap().push(command.clone());
        self.outputs
            .get(&command)
            .cloned()
            .ok_or_else(|| StageError::unavailable(format!("{} is not installed", program)))
    }
}
