//! Poll tick policy.
//!
//! One `Coordinator` owns the authoritative `DeviceSnapshot` for one device
//! and recomputes it on every tick. The policy per error kind:
//!
//! - connection error during the initial probe: the device is off or still
//!   booting; stay uninitialized and retry next tick, silently
//! - other request error during probe/init: log, abort the tick, retry next
//!   tick without changing state
//! - power reported off: snapshot goes off and initialization is reset so
//!   the next cycle re-probes (a device reboot invalidates what init read)
//! - any error in the volume/playback phase: fail closed. The snapshot goes
//!   off, initialization is reset, and the error escalates as a refresh
//!   failure

use std::sync::Arc;

use crate::control::DeviceControl;
use crate::error::{Result, StateError};
use crate::snapshot::{DeviceSnapshot, DeviceStatus};

/// Owns the poll tick sequencing and the authoritative snapshot
pub struct Coordinator<C: DeviceControl> {
    client: Arc<C>,
    friendly_name: Option<String>,
    snapshot: DeviceSnapshot,
}

impl<C: DeviceControl> Coordinator<C> {
    /// Create a coordinator for the given device client
    pub fn new(client: Arc<C>) -> Self {
        Self {
            client,
            friendly_name: None,
            snapshot: DeviceSnapshot::default(),
        }
    }

    /// Set a display-name override, applied once after initialization
    pub fn with_friendly_name(mut self, name: Option<String>) -> Self {
        self.friendly_name = name;
        self
    }

    /// The last computed snapshot
    pub fn snapshot(&self) -> DeviceSnapshot {
        self.snapshot
    }

    /// Run one poll tick and return the fresh snapshot
    ///
    /// Errors escalate only out of the steady-state volume/playback phase;
    /// every other failure degrades to "device appears off" and relies on
    /// the next tick for recovery.
    pub fn tick(&mut self) -> Result<DeviceSnapshot> {
        if !self.snapshot.initialized {
            self.try_init();
        }

        if !self.snapshot.initialized {
            return Ok(self.snapshot);
        }

        if !self.client.power_status() {
            self.snapshot.mark_off();
            return Ok(self.snapshot);
        }

        match self.read_powered_state() {
            Ok(snapshot) => {
                self.snapshot = snapshot;
                Ok(self.snapshot)
            }
            Err(e) => {
                tracing::error!("Sony device error during update: {}", e);
                self.snapshot.mark_off();
                Err(StateError::RefreshFailed(e))
            }
        }
    }

    /// Probe the device and run full initialization once it answers
    fn try_init(&mut self) {
        match self.client.probe() {
            Ok(()) => {
                tracing::debug!("Sony device connection ready, proceeding to init");
            }
            Err(e) if e.is_connection_error() => {
                tracing::debug!("Sony device connection not ready, waiting next tick");
                return;
            }
            Err(e) => {
                tracing::error!("Failed to reach device description: {}", e);
                return;
            }
        }

        match self.client.init() {
            Ok(()) => {
                if let Some(name) = self.friendly_name.take() {
                    self.client.set_friendly_name(&name);
                }
                self.snapshot.initialized = true;
            }
            Err(e) => {
                tracing::error!("Failed to get device information: {}, waiting next tick", e);
            }
        }
    }

    /// Query volume, mute and transport state from a powered-on device
    fn read_powered_state(&self) -> sony_api::Result<DeviceSnapshot> {
        let volume = f32::from(self.client.volume()?) / 100.0;
        let muted = self.client.mute_status()?;
        let status = DeviceStatus::from_transport_state(&self.client.playing_status()?);

        Ok(DeviceSnapshot {
            status,
            volume,
            muted,
            initialized: true,
        })
    }
}
