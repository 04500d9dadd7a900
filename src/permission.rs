use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;

use log::{info, warn};

use crate::sources::CommandRunner;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum PermissionStatus {
    Granted,
    Denied,
}

impl PermissionStatus {
    pub fn is_granted(self) -> bool {
        self == PermissionStatus::Granted
    }

    /// Text of the transient notification reporting a request outcome.
    pub fn notification(self) -> &'static str {
        match self {
            PermissionStatus::Granted => "Permission granted",
            PermissionStatus::Denied => "Permission denied",
        }
    }
}

pub type PermissionCallback = Box<dyn FnOnce(PermissionStatus) + Send + 'static>;

/// Owner of the radio "connect" permission.
pub trait PermissionOracle: Send + Sync {
    /// Current grant status. Never cached by callers.
    fn status(&self) -> PermissionStatus;

    /// Asks for the permission once. `on_result` may run later, on any thread.
    fn request(&self, on_result: PermissionCallback);
}

/// Checks the permission once at startup and requests it when missing.
///
/// The outcome of the request is only reported through `notifier`; nothing
/// waits for it, and the aggregator checks the permission again on its own.
pub fn run_permission_gate(
    oracle: &dyn PermissionOracle,
    notifier: Sender<String>,
) -> PermissionStatus {
    let status = oracle.status();
    if status.is_granted() {
        info!("Bluetooth connect permission already granted.");
        return status;
    }

    info!("Bluetooth connect permission missing, requesting it.");
    oracle.request(Box::new(move |outcome| {
        info!("Permission request finished: {:?}", outcome);
        if notifier.send(outcome.notification().to_string()).is_err() {
            warn!("Notification channel closed before the permission result arrived.");
        }
    }));
    status
}

/// Grants the permission to root and to members of a group.
///
/// Desktop Linux has no runtime prompt for this, so `request` re-evaluates
/// group membership on a background thread and reports what it finds.
pub struct GroupPermissionOracle {
    runner: Arc<dyn CommandRunner>,
    group: Option<String>, // `None` disables the check
}

impl GroupPermissionOracle {
    pub fn new(runner: Arc<dyn CommandRunner>, group: Option<String>) -> Self {
        Self { runner, group }
    }
}

impl PermissionOracle for GroupPermissionOracle {
    fn status(&self) -> PermissionStatus {
        check_group(self.runner.as_ref(), self.group.as_deref())
    }

    fn request(&self, on_result: PermissionCallback) {
        let runner = self.runner.clone();
        let group = self.group.clone();
        let spawned = thread::Builder::new()
            .name("permission-request".to_string())
            .spawn(move || {
                let status = check_group(runner.as_ref(), group.as_deref());
                on_result(status);
            });
        if let Err(e) = spawned {
            warn!("Failed to spawn permission request thread: {}", e);
        }
    }
}

fn check_group(runner: &dyn CommandRunner, group: Option<&str>) -> PermissionStatus {
    let group = match group {
        Some(group) => group,
        None => return PermissionStatus::Granted,
    };

    match runner.run("id", &["-u"]) {
        Ok(uid) if uid.trim() == "0" => return PermissionStatus::Granted,
        Ok(_) => {}
        Err(e) => warn!("Could not determine user id: {}", e),
    }

    match runner.run("id", &["-nG"]) {
        Ok(groups) if groups.split_whitespace().any(|g| g == group) => PermissionStatus::Granted,
        Ok(_) => PermissionStatus::Denied,
        Err(e) => {
            warn!("Could not list group membership: {}", e);
            PermissionStatus::Denied
        }
    }
}
