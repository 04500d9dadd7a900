use chrono::{DateTime, Local};
use log::{debug, info, warn};
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, Weak};
use std::thread::{self, JoinHandle};

use crate::device::{DeviceRecord, Subsystem};
use crate::error::StageError;
use crate::sources::Platform;
use crate::util::{format_ip_address, panic_message, strip_quotes};

/// Slot the background fetch writes its snapshot into, exactly once.
pub type SharedSnapshot = Arc<Mutex<Option<InventorySnapshot>>>;

/// Ordered inventory captured at one moment. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct InventorySnapshot {
    records: Vec<DeviceRecord>,
    captured_at: DateTime<Local>,
}

impl InventorySnapshot {
    /// Concatenates stage reports in the order given.
    pub fn from_reports(reports: impl IntoIterator<Item = StageReport>) -> Self {
        let records = reports
            .into_iter()
            .flat_map(StageReport::into_records)
            .collect();
        Self {
            records,
            captured_at: Local::now(),
        }
    }

    pub fn records(&self) -> &[DeviceRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn captured_at(&self) -> DateTime<Local> {
        self.captured_at
    }

    /// Record texts in order.
    pub fn lines(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.text.as_str()).collect()
    }
}

/// What one stage produced: the records it got to, and why it stopped early.
#[derive(Debug)]
pub struct StageReport {
    pub subsystem: Subsystem,
    pub records: Vec<DeviceRecord>,
    pub failure: Option<StageError>,
}

impl StageReport {
    /// Records followed by one placeholder if the stage failed.
    pub fn into_records(self) -> Vec<DeviceRecord> {
        let mut records = self.records;
        if let Some(error) = &self.failure {
            records.push(DeviceRecord::unavailable(self.subsystem, error));
        }
        records
    }
}

/// Runs one stage, turning both errors and panics into a failure.
/// Records pushed before the failure are kept.
pub fn run_stage<F>(subsystem: Subsystem, stage: F) -> StageReport
where
    F: FnOnce(&mut Vec<DeviceRecord>) -> Result<(), StageError>,
{
    let mut records = Vec::new();
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| stage(&mut records)));
    let failure = match outcome {
        Ok(Ok(())) => None,
        Ok(Err(e)) => Some(e),
        Err(payload) => Some(StageError::unexpected(panic_message(payload.as_ref()))),
    };
    if let Some(e) = &failure {
        warn!("{} stage failed after {} records: {}", subsystem, records.len(), e);
    }
    StageReport {
        subsystem,
        records,
        failure,
    }
}

/// Gathers the full inventory. Never fails: each stage's trouble becomes a
/// placeholder line and the remaining stages still run.
pub fn fetch_inventory(platform: &Platform) -> InventorySnapshot {
    info!("Fetching device inventory...");
    let snapshot = InventorySnapshot::from_reports([
        run_stage(Subsystem::Wireless, |records| wireless_stage(platform, records)),
        run_stage(Subsystem::Radio, |records| radio_stage(platform, records)),
        run_stage(Subsystem::SerialBus, |records| serial_bus_stage(platform, records)),
    ]);
    info!("Inventory complete with {} records.", snapshot.len());
    snapshot
}

fn wireless_stage(platform: &Platform, records: &mut Vec<DeviceRecord>) -> Result<(), StageError> {
    let info = platform.wireless.connection_info()?;
    let ssid = strip_quotes(&info.ssid);
    let address = format_ip_address(info.ip_address);
    debug!("Wireless: ssid='{}' address={}", ssid, address);

    records.push(DeviceRecord::wifi_network(&ssid));
    records.push(DeviceRecord::ip_address(&address));
    Ok(())
}

fn radio_stage(platform: &Platform, records: &mut Vec<DeviceRecord>) -> Result<(), StageError> {
    // Checked again here; the startup gate's outcome may be stale
    if !platform.permission.status().is_granted() {
        records.push(DeviceRecord::radio_permission_denied());
        return Ok(());
    }

    let adapter = match platform.radio.default_adapter()? {
        Some(adapter) => adapter,
        None => {
            records.push(DeviceRecord::radio_not_supported());
            return Ok(());
        }
    };

    records.push(DeviceRecord::local_adapter(adapter.name.as_deref()));
    if !adapter.enabled {
        records.push(DeviceRecord::radio_disabled());
        return Ok(());
    }

    let peers = platform.radio.paired_peers(&adapter)?;
    if peers.is_empty() {
        records.push(DeviceRecord::no_paired_peers());
    } else {
        records.push(DeviceRecord::paired_peers_header());
        records.extend(peers.iter().map(DeviceRecord::paired_peer));
    }
    Ok(())
}

fn serial_bus_stage(platform: &Platform, records: &mut Vec<DeviceRecord>) -> Result<(), StageError> {
    let peripherals = platform.peripherals.attached()?;
    if peripherals.is_empty() {
        records.push(DeviceRecord::no_peripherals());
    } else {
        records.push(DeviceRecord::peripherals_header());
        records.extend(peripherals.iter().map(DeviceRecord::peripheral));
    }
    Ok(())
}

/// Runs `fetch_inventory` off the UI thread and stores the result in `target`.
///
/// The thread only holds a weak reference: if every owner of `target` is gone
/// by the time the fetch finishes, the snapshot is dropped. `on_complete` runs
/// after a successful delivery.
pub fn spawn_fetch<F>(
    platform: Platform,
    target: &SharedSnapshot,
    on_complete: F,
) -> std::io::Result<JoinHandle<()>>
where
    F: FnOnce() + Send + 'static,
{
    let target: Weak<Mutex<Option<InventorySnapshot>>> = Arc::downgrade(target);
    thread::Builder::new()
        .name("inventory".to_string())
        .spawn(move || {
            let snapshot = fetch_inventory(&platform);
            let Some(slot) = target.upgrade() else {
                debug!("Inventory owner gone, discarding snapshot.");
                return;
            };
            if deliver(&slot, snapshot) {
                on_complete();
            }
        })
}

// Fills an empty slot. A slot that already holds a snapshot keeps it.
fn deliver(slot: &SharedSnapshot, snapshot: InventorySnapshot) -> bool {
    let mut guard = match slot.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            log::error!("Snapshot mutex poisoned!");
            poisoned.into_inner()
        }
    };
    if guard.is_some() {
        warn!("Snapshot already delivered, discarding the newer one.");
        return false;
    }
    *guard = Some(snapshot);
    true
}

/// Starts a background fetch into a fresh slot and returns the slot.
pub fn start_fetch<F>(platform: Platform, on_complete: F) -> SharedSnapshot
where
    F: FnOnce() + Send + 'static,
{
    start_fetch_with(platform, on_complete, spawn_fetch)
}

/// Like [`start_fetch`] with a custom spawner. If the spawner cannot start a
/// thread the inventory is gathered on the calling thread instead, so the
/// returned slot always ends up filled.
pub fn start_fetch_with<F, S>(platform: Platform, on_complete: F, spawn: S) -> SharedSnapshot
where
    F: FnOnce() + Send + 'static,
    S: FnOnce(Platform, &SharedSnapshot, F) -> std::io::Result<JoinHandle<()>>,
{
    let slot = SharedSnapshot::default();
    match spawn(platform.clone(), &slot, on_complete) {
        Ok(_) => info!("Inventory fetch started."),
        Err(e) => {
            log::error!("Failed to spawn inventory thread, fetching inline: {}", e);
            deliver(&slot, fetch_inventory(&platform));
        }
    }
    slot
}

/// Clones the delivered snapshot out of the slot, if any.
pub fn read_snapshot(slot: &SharedSnapshot) -> Option<InventorySnapshot> {
    match slot.lock() {
        Ok(guard) => guard.clone(),
        Err(poisoned) => {
            log::error!("Snapshot mutex poisoned!");
            (**poisoned.get_ref()).clone()
        }
    }
}
