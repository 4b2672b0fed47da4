//! Device setup and lifetime management.
//!
//! `SonySystem::connect` drives the whole setup flow from a config record:
//! validate, register with the device, and start the background poll
//! worker. Devices that enforce pairing interrupt the flow with
//! [`SetupOutcome::PinRequired`]; the caller reads the PIN off the TV
//! screen and resumes with [`PendingPairing::submit_pin`].

use std::sync::Arc;
use std::time::Duration;

use sony_api::{RegistrationResult, SonyDevice};
use sony_state::{CoordinatorHandle, DeviceSnapshot, PollConfig};

use crate::config::DeviceConfig;
use crate::error::SdkError;
use crate::media_player::MediaPlayer;
use crate::remote::Remote;

/// Name this SDK registers itself under on the device
pub const DEFAULT_CLIENT_NAME: &str = "sony-sdk";

/// Result of a setup attempt
pub enum SetupOutcome {
    /// Registration went through; the system is polling
    Ready(SonySystem),
    /// The device wants a PIN before it accepts commands
    PinRequired(PendingPairing),
}

/// Setup paused waiting for the on-screen PIN
pub struct PendingPairing {
    device: Arc<SonyDevice>,
    config: DeviceConfig,
}

impl PendingPairing {
    /// Complete pairing with the PIN shown on the device
    ///
    /// On success the updated config (PIN stored, `authenticated` set) is
    /// available through [`SonySystem::config`] for the caller to persist.
    pub fn submit_pin(mut self, pin: &str) -> Result<SonySystem, SdkError> {
        if !self.device.send_authentication(pin)? {
            return Err(SdkError::AuthenticationFailed);
        }

        self.config.pin = pin.to_string();
        self.config.authenticated = true;
        Ok(SonySystem::start(self.device, self.config))
    }

    /// Host of the device being paired
    pub fn host(&self) -> &str {
        self.device.host()
    }
}

/// Static identity of a connected device
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceInfo {
    /// MAC address when known, host otherwise
    pub identifier: String,
    pub name: String,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
}

/// A connected device with its poll worker running
pub struct SonySystem {
    device: Arc<SonyDevice>,
    coordinator: CoordinatorHandle,
    config: DeviceConfig,
}

impl SonySystem {
    /// Set up a device from a config record
    ///
    /// Already-paired configs re-authenticate with the stored PIN, which
    /// also renews the registration on the device side.
    pub fn connect(config: DeviceConfig) -> Result<SetupOutcome, SdkError> {
        config.validate()?;
        let device = Arc::new(build_device(&config));

        if config.needs_pairing() {
            match device.register()? {
                RegistrationResult::PinNeeded => {
                    tracing::info!(host = %config.host, "Device requires pairing");
                    return Ok(SetupOutcome::PinRequired(PendingPairing { device, config }));
                }
                RegistrationResult::Success => {
                    tracing::debug!(host = %config.host, "Registered without a PIN");
                }
            }
        } else if !device.send_authentication(&config.pin)? {
            return Err(SdkError::AuthenticationFailed);
        }

        Ok(SetupOutcome::Ready(Self::start(device, config)))
    }

    fn start(device: Arc<SonyDevice>, config: DeviceConfig) -> Self {
        let poll_config = PollConfig {
            update_interval: Duration::from_secs(config.update_interval),
        };
        let coordinator =
            CoordinatorHandle::spawn(Arc::clone(&device), config.name.clone(), poll_config);

        Self {
            device,
            coordinator,
            config,
        }
    }

    /// Media-player view, subscribed to state changes
    pub fn media_player(&self) -> MediaPlayer {
        MediaPlayer::new(
            Arc::clone(&self.device),
            self.coordinator.subscribe(),
            self.coordinator.snapshot(),
        )
    }

    /// Remote-control view, subscribed to state changes
    pub fn remote(&self) -> Remote {
        Remote::new(
            Arc::clone(&self.device),
            self.coordinator.subscribe(),
            self.coordinator.snapshot(),
        )
    }

    /// Identity of the device, from config and init-time metadata
    pub fn device_info(&self) -> DeviceInfo {
        DeviceInfo {
            identifier: self
                .device
                .mac()
                .unwrap_or_else(|| self.device.host().to_string()),
            name: self.device.friendly_name(),
            manufacturer: self.device.manufacturer(),
            model: self.device.model_name(),
        }
    }

    /// The latest snapshot published by the poll worker
    pub fn snapshot(&self) -> DeviceSnapshot {
        self.coordinator.snapshot()
    }

    /// Config record for this connection, updated by pairing
    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    /// Direct access to the underlying device handle
    pub fn device(&self) -> Arc<SonyDevice> {
        Arc::clone(&self.device)
    }

    /// Stop the poll worker and wait for it to finish
    pub fn shutdown(self) -> Result<(), SdkError> {
        Ok(self.coordinator.shutdown()?)
    }
}

fn build_device(config: &DeviceConfig) -> SonyDevice {
    let device = SonyDevice::new(&config.host, DEFAULT_CLIENT_NAME)
        .with_ports(config.app_port, config.dmr_port, config.ircc_port)
        .with_broadcast_address(&config.broadcast_address);

    if let Some(mac) = &config.mac_address {
        device.set_mac(mac);
    }
    if !config.needs_pairing() {
        device.set_pin(&config.pin);
    }

    device
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_device_applies_config() {
        let mut config = DeviceConfig::new("192.168.0.23");
        config.app_port = 8001;
        config.dmr_port = 8002;
        config.ircc_port = 8003;
        config.mac_address = Some("00:24:be:4a:bc:de".to_string());
        config.pin = "9876".to_string();

        let device = build_device(&config);
        assert_eq!(device.host(), "192.168.0.23");
        assert_eq!(device.dmr_url(), "http://192.168.0.23:8002/dmr.xml");
        assert_eq!(device.mac().as_deref(), Some("00:24:be:4a:bc:de"));
        assert_eq!(device.pin(), "9876");
    }

    #[test]
    fn test_build_device_skips_sentinel_pin() {
        let config = DeviceConfig::new("192.168.0.23");
        let device = build_device(&config);
        assert_eq!(device.pin(), "");
    }

    #[test]
    fn test_connect_rejects_invalid_config() {
        let config = DeviceConfig::new("not an ip");
        assert!(matches!(
            SonySystem::connect(config),
            Err(SdkError::InvalidConfig(_))
        ));
    }
}
