//! Device status and snapshot types

use serde::{Deserialize, Serialize};

/// Coarse device status derived from power and transport state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceStatus {
    /// Device is off or unreachable
    Off,
    /// Powered on, not playing anything (or playback state unknown)
    On,
    /// Currently playing media
    Playing,
    /// Playback is paused
    Paused,
}

impl DeviceStatus {
    /// Map a transport state string from a powered-on device
    ///
    /// Anything other than the two known playback states reads as plain On:
    /// the device used for testing reports "STOPPED" and "NO_MEDIA_PRESENT"
    /// among others.
    pub fn from_transport_state(state: &str) -> Self {
        match state {
            "PLAYING" => DeviceStatus::Playing,
            "PAUSED_PLAYBACK" => DeviceStatus::Paused,
            _ => DeviceStatus::On,
        }
    }

    /// Whether the device is powered at all
    pub fn is_on(&self) -> bool {
        !matches!(self, DeviceStatus::Off)
    }
}

impl Default for DeviceStatus {
    fn default() -> Self {
        DeviceStatus::Off
    }
}

/// The authoritative device state, recomputed once per poll tick
///
/// Replaced wholesale at the end of a successful tick, so readers never see
/// a partially updated snapshot. When `initialized` is false the status is
/// always `Off`; volume and mute then hold their last observed values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceSnapshot {
    /// Coarse device status
    pub status: DeviceStatus,
    /// Normalized volume, 0.0..=1.0
    pub volume: f32,
    /// Whether the device is muted
    pub muted: bool,
    /// Whether the device has completed initialization
    pub initialized: bool,
}

impl DeviceSnapshot {
    /// Force the snapshot to off and require re-initialization
    ///
    /// Volume and mute keep their last values; they are stale but harmless
    /// while the status reads off.
    pub fn mark_off(&mut self) {
        self.status = DeviceStatus::Off;
        self.initialized = false;
    }
}
