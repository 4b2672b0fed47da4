//! The seam between the coordinator and the device client.
//!
//! The coordinator polls through this trait so its tick policy can be
//! exercised against a scripted device in tests. The real implementation is
//! `sony_api::SonyDevice`.

use sony_api::SonyDevice;

/// Device operations the poll loop depends on
pub trait DeviceControl: Send + Sync {
    /// Lightweight reachability probe against a fixed device endpoint
    fn probe(&self) -> sony_api::Result<()>;

    /// Full initialization: read description, control URLs, command catalog
    fn init(&self) -> sony_api::Result<()>;

    /// Whether the device reports as powered on; any failure reads as off
    fn power_status(&self) -> bool;

    /// Current volume, 0..=100
    fn volume(&self) -> sony_api::Result<u8>;

    /// Current mute state
    fn mute_status(&self) -> sony_api::Result<bool>;

    /// Current transport state string
    fn playing_status(&self) -> sony_api::Result<String>;

    /// Apply a configured display-name override after initialization
    fn set_friendly_name(&self, _name: &str) {}
}

impl DeviceControl for SonyDevice {
    fn probe(&self) -> sony_api::Result<()> {
        SonyDevice::probe(self)
    }

    fn init(&self) -> sony_api::Result<()> {
        self.init_device()
    }

    fn power_status(&self) -> bool {
        self.get_power_status()
    }

    fn volume(&self) -> sony_api::Result<u8> {
        self.get_volume()
    }

    fn mute_status(&self) -> sony_api::Result<bool> {
        self.get_mute()
    }

    fn playing_status(&self) -> sony_api::Result<String> {
        self.get_playing_status()
    }

    fn set_friendly_name(&self, name: &str) {
        SonyDevice::set_friendly_name(self, name)
    }
}
