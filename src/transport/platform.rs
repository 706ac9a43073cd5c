//! Host facts reported in the environment event.

use uuid::Uuid;

/// Anonymous, stable identifier for this machine.
///
/// Derived from the hostname so the same machine always reports the same id,
/// while the hostname itself is never sent.
pub fn device_id() -> String {
    let hostname = hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string());
    Uuid::new_v5(&Uuid::NAMESPACE_DNS, hostname.as_bytes()).to_string()
}

/// Operating system name.
pub fn os_name() -> String {
    std::env::consts::OS.to_string()
}

/// Operating system version, or `"unknown"` when it cannot be determined.
pub fn os_version() -> String {
    read_os_version().unwrap_or_else(|| "unknown".to_string())
}

#[cfg(target_os = "linux")]
fn read_os_version() -> Option<String> {
    std::fs::read_to_string("/proc/sys/kernel/osrelease")
        .ok()
        .map(|release| release.trim().to_string())
        .filter(|release| !release.is_empty())
}

#[cfg(target_os = "macos")]
fn read_os_version() -> Option<String> {
    let output = std::process::Command::new("sw_vers")
        .arg("-productVersion")
        .output()
        .ok()?;
    let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!version.is_empty()).then_some(version)
}

#[cfg(not(any(target_os = "linux", target_os = "macos")))]
fn read_os_version() -> Option<String> {
    None
}

/// OS name and version joined for the `os` segment.
pub fn os_string(os: &str, version: &str) -> String {
    format!("{os}/{version}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_id_is_stable() {
        let id = device_id();
        assert_eq!(id, device_id());
        assert!(Uuid::parse_str(&id).is_ok());
    }

    #[test]
    fn test_os_string() {
        assert_eq!(os_string("linux", "6.1.0"), "linux/6.1.0");
        assert!(!os_name().is_empty());
        assert!(!os_version().is_empty());
    }
}
