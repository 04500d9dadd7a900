mod common;

use std::net::Ipv4Addr;
use std::sync::atomic::Ordering;
use std::time::{Duration, Instant};

use common::*;
use device_monitor::config::{ConfigData, PeripheralBackend};
use device_monitor::device::{DeviceRecord, RecordKind, Subsystem};
use device_monitor::error::StageError;
use device_monitor::notification::Toasts;
use device_monitor::permission::{run_permission_gate, PermissionStatus};
use device_monitor::state::{Screen, ScreenFlow};
use device_monitor::util::{field_value, format_ip_address, pack_ip_address, strip_quotes};

#[test]
fn test_config_data_default() {
    let config = ConfigData::default();

    assert_eq!(config.peripheral_backend, PeripheralBackend::Hid);
    assert_eq!(config.wireless_interface, None);
    assert_eq!(config.permission_group.as_deref(), Some("bluetooth"));
    assert_eq!(config.toast_seconds, 2.0);
}

#[test]
fn test_toast_duration_is_clamped() {
    let with_seconds = |toast_seconds| ConfigData {
        toast_seconds,
        ..ConfigData::default()
    };

    assert_eq!(with_seconds(2.0).toast_duration(), Duration::from_secs(2));
    assert_eq!(with_seconds(0.1).toast_duration(), Duration::from_millis(500));
    assert_eq!(with_seconds(-3.0).toast_duration(), Duration::from_millis(500));
    assert_eq!(with_seconds(1e30).toast_duration(), Duration::from_secs(60));
    assert_eq!(with_seconds(f32::INFINITY).toast_duration(), Duration::from_secs(60));
    assert_eq!(with_seconds(f32::NAN).toast_duration(), Duration::from_secs(2));
}

#[test]
fn test_peripheral_backend_display() {
    assert_eq!(format!("{}", PeripheralBackend::Hid), "hid");
    assert_eq!(format!("{}", PeripheralBackend::Sysfs), "sysfs");
}

#[test]
fn test_screen_flow_starts_on_welcome() {
    let flow = ScreenFlow::new();
    assert_eq!(flow.screen(), Screen::Welcome);
}

#[test]
fn test_screen_flow_advance_is_one_way() {
    let mut flow = ScreenFlow::new();
    flow.advance();
    assert_eq!(flow.screen(), Screen::List);

    flow.advance();
    assert_eq!(flow.screen(), Screen::List);
}

#[test]
fn test_list_activation_requests_inventory_once() {
    let mut flow = ScreenFlow::new();
    // Nothing to request while the welcome screen is up
    assert!(!flow.activate_list());

    flow.advance();
    assert!(flow.activate_list());
    assert!(!flow.activate_list());

    // A second advance does not re-arm the hook
    flow.advance();
    assert!(!flow.activate_list());
}

#[test]
fn test_record_display_is_its_text() {
    let record = DeviceRecord::paired_peer(&peer(Some("Keyboard"), "11:22:33:44:55:66"));
    assert_eq!(format!("{}", record), "🔹 Keyboard (11:22:33:44:55:66)");
    assert_eq!(record.subsystem, Subsystem::Radio);
    assert_eq!(record.kind, RecordKind::Entry);
}

#[test]
fn test_unavailable_record_names_subsystem() {
    let error = StageError::unavailable("service missing");
    assert_eq!(
        DeviceRecord::unavailable(Subsystem::Wireless, &error).text,
        "⚠ Wi-Fi info unavailable: service missing"
    );
    assert_eq!(
        DeviceRecord::unavailable(Subsystem::Radio, &error).text,
        "⚠ Bluetooth info unavailable: service missing"
    );
    assert_eq!(
        DeviceRecord::unavailable(Subsystem::SerialBus, &error).text,
        "⚠ USB info unavailable: service missing"
    );
}

#[test]
fn test_command_failure_message() {
    let error = StageError::CommandFailed {
        program: "iw".to_string(),
        status: "exit status: 237".to_string(),
        stderr: "command failed: No such device (-19)".to_string(),
    };
    assert_eq!(
        error.to_string(),
        "iw exited with exit status: 237: command failed: No such device (-19)"
    );
}

#[test]
fn test_strip_quotes() {
    assert_eq!(strip_quotes("\"HomeNet\""), "HomeNet");
    assert_eq!(strip_quotes("plain"), "plain");
    assert_eq!(strip_quotes("<unknown ssid>"), "<unknown ssid>");
}

#[test]
fn test_format_ip_address() {
    assert_eq!(format_ip_address(0), "0.0.0.0");
    assert_eq!(format_ip_address(pack_ip_address(Ipv4Addr::new(172, 16, 4, 200))), "172.16.4.200");
    // First octet lives in the low byte
    assert_eq!(format_ip_address(0x0101_A8C0), "192.168.1.1");
}

#[test]
fn test_field_value() {
    let output = "Controller 00:1A:7D:DA:71:13 (public)\n\tName: box\n\tAlias: \n\tPowered: yes\n";
    assert_eq!(field_value(output, "Name"), Some("box"));
    assert_eq!(field_value(output, "Powered"), Some("yes"));
    assert_eq!(field_value(output, "Alias"), None);
    assert_eq!(field_value(output, "Class"), None);
}

#[test]
fn test_toasts_expire() {
    let mut toasts = Toasts::new(Duration::from_secs(2));
    let start = Instant::now();

    toasts.notifier().send("Permission granted".to_string()).unwrap();
    toasts.poll(start);
    let visible: Vec<&str> = toasts.visible().map(|t| t.message.as_str()).collect();
    assert_eq!(visible, vec!["Permission granted"]);

    toasts.poll(start + Duration::from_secs(1));
    assert!(!toasts.is_empty());

    toasts.poll(start + Duration::from_secs(3));
    assert!(toasts.is_empty());
}

#[test]
fn test_permission_gate_skips_request_when_granted() {
    let oracle = FakePermission::new(PermissionStatus::Granted, PermissionStatus::Granted);
    let toasts = Toasts::new(Duration::from_secs(2));

    let status = run_permission_gate(&oracle, toasts.notifier());

    assert_eq!(status, PermissionStatus::Granted);
    assert_eq!(oracle.requests.load(Ordering::SeqCst), 0);
}

#[test]
fn test_permission_gate_requests_once_and_notifies() {
    let oracle = FakePermission::new(PermissionStatus::Denied, PermissionStatus::Denied);
    let (notifier, inbox) = std::sync::mpsc::channel();

    let status = run_permission_gate(&oracle, notifier);

    assert_eq!(status, PermissionStatus::Denied);
    assert_eq!(oracle.requests.load(Ordering::SeqCst), 1);
    let message = inbox.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(message, "Permission denied");
}

#[test]
fn test_permission_notification_text() {
    assert_eq!(PermissionStatus::Granted.notification(), "Permission granted");
    assert_eq!(PermissionStatus::Denied.notification(), "Permission denied");
}

#[test]
fn test_about_mentions_version() {
    let lines = device_monitor::about::about();
    assert!(lines.iter().any(|l| l.contains(env!("CARGO_PKG_VERSION"))));
}
