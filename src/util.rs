use log::trace;

/// Removes every double quote the platform wraps around a network name.
pub fn strip_quotes(ssid: &str) -> String {
    ssid.replace('"', "")
}

/// Formats a packed IPv4 address as dotted decimal.
/// The first octet is stored in the low byte, the last in the high byte.
pub fn format_ip_address(packed: u32) -> String {
    let [a, b, c, d] = packed.to_le_bytes();
    format!("{}.{}.{}.{}", a, b, c, d)
}

/// Packs an address the way `format_ip_address` expects it.
pub fn pack_ip_address(address: std::net::Ipv4Addr) -> u32 {
    u32::from_le_bytes(address.octets())
}

/// Reads a `Key: value` line out of indented tool output.
/// Keys are matched after trimming leading whitespace.
pub fn field_value<'a>(output: &'a str, key: &str) -> Option<&'a str> {
    for line in output.lines() {
        let line = line.trim_start();
        if let Some(rest) = line.strip_prefix(key) {
            if let Some(value) = rest.strip_prefix(':') {
                let value = value.trim();
                trace!("field_value: {} = '{}'", key, value);
                return if value.is_empty() { None } else { Some(value) };
            }
        }
    }
    None
}

/// Extracts the message carried by a caught panic payload.
pub fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown error".to_string()
    }
}
