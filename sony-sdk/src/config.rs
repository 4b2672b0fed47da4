//! Persisted device configuration.
//!
//! One record per configured device: connection parameters, pairing
//! credentials, and the polling interval. The record is immutable once a
//! connection is established; re-pairing produces an updated record.

use std::fs;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::SdkError;

/// PIN sentinel meaning "not yet paired"
pub const DEFAULT_PIN: &str = "0000";
/// Default polling interval in seconds
pub const DEFAULT_UPDATE_INTERVAL_SECS: u64 = 5;

fn default_broadcast_address() -> String {
    sony_api::DEFAULT_BROADCAST_ADDRESS.to_string()
}

fn default_app_port() -> u16 {
    sony_api::DEFAULT_APP_PORT
}

fn default_dmr_port() -> u16 {
    sony_api::DEFAULT_DMR_PORT
}

fn default_ircc_port() -> u16 {
    sony_api::DEFAULT_IRCC_PORT
}

fn default_pin() -> String {
    DEFAULT_PIN.to_string()
}

fn default_update_interval() -> u64 {
    DEFAULT_UPDATE_INTERVAL_SECS
}

/// Persisted configuration record for one device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Device IP address
    pub host: String,
    /// Optional display-name override for the device
    #[serde(default)]
    pub name: Option<String>,
    /// MAC address, needed for wake-on-LAN
    #[serde(default)]
    pub mac_address: Option<String>,
    /// Broadcast address for wake-on-LAN
    #[serde(default = "default_broadcast_address")]
    pub broadcast_address: String,
    /// Port of the app/registration service
    #[serde(default = "default_app_port")]
    pub app_port: u16,
    /// Port of the DMR service
    #[serde(default = "default_dmr_port")]
    pub dmr_port: u16,
    /// Port of the IRCC service
    #[serde(default = "default_ircc_port")]
    pub ircc_port: u16,
    /// Pairing PIN; `"0000"` means not yet paired
    #[serde(default = "default_pin")]
    pub pin: String,
    /// Polling interval in seconds
    #[serde(default = "default_update_interval")]
    pub update_interval: u64,
    /// Whether pairing has completed successfully
    #[serde(default)]
    pub authenticated: bool,
}

impl DeviceConfig {
    /// Config with defaults for everything but the host
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            name: None,
            mac_address: None,
            broadcast_address: default_broadcast_address(),
            app_port: default_app_port(),
            dmr_port: default_dmr_port(),
            ircc_port: default_ircc_port(),
            pin: default_pin(),
            update_interval: default_update_interval(),
            authenticated: false,
        }
    }

    /// Whether this record still carries the "not yet paired" sentinel
    pub fn needs_pairing(&self) -> bool {
        self.pin.is_empty() || self.pin == DEFAULT_PIN
    }

    /// Validate addresses before attempting a connection
    pub fn validate(&self) -> Result<(), SdkError> {
        if !is_valid_ip(&self.host) {
            return Err(SdkError::InvalidConfig(format!(
                "invalid host address: {}",
                self.host
            )));
        }
        if !is_valid_ip(&self.broadcast_address) {
            return Err(SdkError::InvalidConfig(format!(
                "invalid broadcast address: {}",
                self.broadcast_address
            )));
        }
        if let Some(mac) = &self.mac_address {
            if !is_valid_mac(mac) {
                return Err(SdkError::InvalidConfig(format!(
                    "invalid MAC address: {}",
                    mac
                )));
            }
        }
        Ok(())
    }

    /// Load a config record from a JSON file
    pub fn load(path: &Path) -> Result<Self, SdkError> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Save this config record as JSON, creating parent directories
    pub fn save(&self, path: &Path) -> Result<(), SdkError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text)?;
        Ok(())
    }

    /// Default location for this device's config record
    pub fn default_path(&self) -> Result<PathBuf, SdkError> {
        let base = dirs::config_dir().ok_or(SdkError::NoConfigDir)?;
        Ok(base.join("sony-sdk").join(format!("{}.json", self.host)))
    }
}

fn is_valid_ip(address: &str) -> bool {
    address.parse::<IpAddr>().is_ok()
}

fn is_valid_mac(address: &str) -> bool {
    static MAC_RE: OnceLock<Regex> = OnceLock::new();
    let re = MAC_RE.get_or_init(|| {
        Regex::new("^[0-9a-f]{2}(:[0-9a-f]{2}){5}$|^[0-9a-f]{2}(-[0-9a-f]{2}){5}$")
            .expect("static regex")
    });
    re.is_match(&address.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DeviceConfig::new("192.168.0.23");
        assert_eq!(config.broadcast_address, "255.255.255.255");
        assert_eq!(config.app_port, 50202);
        assert_eq!(config.dmr_port, 52323);
        assert_eq!(config.ircc_port, 50001);
        assert_eq!(config.pin, "0000");
        assert_eq!(config.update_interval, 5);
        assert!(!config.authenticated);
        assert!(config.needs_pairing());
    }

    #[test]
    fn test_needs_pairing_sentinel() {
        let mut config = DeviceConfig::new("192.168.0.23");
        config.pin = "1234".to_string();
        assert!(!config.needs_pairing());

        config.pin = String::new();
        assert!(config.needs_pairing());
    }

    #[test]
    fn test_validate_addresses() {
        let mut config = DeviceConfig::new("192.168.0.23");
        assert!(config.validate().is_ok());

        config.mac_address = Some("00:24:be:4a:bc:de".to_string());
        assert!(config.validate().is_ok());

        config.mac_address = Some("not-a-mac".to_string());
        assert!(matches!(
            config.validate(),
            Err(SdkError::InvalidConfig(_))
        ));

        config.mac_address = None;
        config.host = "not an ip".to_string();
        assert!(matches!(
            config.validate(),
            Err(SdkError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_mac_forms() {
        assert!(is_valid_mac("00:24:BE:4A:BC:DE"));
        assert!(is_valid_mac("00-24-be-4a-bc-de"));
        assert!(!is_valid_mac("00:24:be-4a:bc:de"));
        assert!(!is_valid_mac("00:24:be:4a:bc"));
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: DeviceConfig = serde_json::from_str(r#"{"host": "10.0.0.9"}"#).unwrap();
        assert_eq!(config.host, "10.0.0.9");
        assert_eq!(config.pin, "0000");
        assert_eq!(config.dmr_port, 52323);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("device.json");

        let mut config = DeviceConfig::new("192.168.0.23");
        config.pin = "9876".to_string();
        config.authenticated = true;
        config.save(&path).unwrap();

        let loaded = DeviceConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }
}
