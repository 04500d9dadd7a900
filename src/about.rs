pub fn about() -> Vec<String> {
    vec![
        "Lists the Wi-Fi network, paired Bluetooth devices and attached \
        USB peripherals of this machine."
            .to_string(),
        "Nothing is paired, connected or saved; the list is read once per visit.".to_string(),
        format!("Version {}", env!("CARGO_PKG_VERSION")),
    ]
}
