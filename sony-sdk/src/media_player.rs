//! Media-player view of a device.
//!
//! Reads come from the cached coordinator snapshot and never touch the
//! network; call [`MediaPlayer::refresh`] to pull in the latest poll
//! results. Writes go straight to the device and rely on the next poll
//! tick to observe their effect.

use std::sync::mpsc::Receiver;
use std::sync::Arc;

use sony_api::SonyDevice;
use sony_state::{DeviceSnapshot, DeviceStatus, StateChange};

use crate::entity::EntityState;
use crate::error::SdkError;

/// Playback and volume control for one device
pub struct MediaPlayer {
    device: Arc<SonyDevice>,
    changes: Receiver<StateChange>,
    state: EntityState,
    /// Tracks play/pause commands issued through this handle; the snapshot
    /// lags by up to one poll interval, so play-pause toggling cannot rely
    /// on it.
    playing: bool,
}

impl MediaPlayer {
    pub(crate) fn new(
        device: Arc<SonyDevice>,
        changes: Receiver<StateChange>,
        snapshot: DeviceSnapshot,
    ) -> Self {
        Self {
            device,
            changes,
            state: EntityState::new(snapshot),
            playing: false,
        }
    }

    /// Pull in any poll results published since the last refresh
    pub fn refresh(&mut self) {
        self.state.refresh(&self.changes);
    }

    // ======================== Reads ========================

    /// Playback state as of the last refresh
    pub fn state(&self) -> DeviceStatus {
        self.state.snapshot.status
    }

    pub fn is_on(&self) -> bool {
        self.state.snapshot.status.is_on()
    }

    /// Volume as a 0.0..=1.0 fraction
    ///
    /// Retains the last known value while the device is off.
    pub fn volume_level(&self) -> f32 {
        self.state.snapshot.volume
    }

    pub fn is_volume_muted(&self) -> bool {
        self.state.snapshot.muted
    }

    /// Display name of the device
    pub fn name(&self) -> String {
        self.device.friendly_name()
    }

    /// Why the last poll tick failed, if it did
    pub fn last_error(&self) -> Option<&str> {
        self.state.last_error.as_deref()
    }

    // ======================== Writes ========================

    pub fn turn_on(&self) -> Result<(), SdkError> {
        Ok(self.device.power(true)?)
    }

    pub fn turn_off(&mut self) -> Result<(), SdkError> {
        self.playing = false;
        Ok(self.device.power(false)?)
    }

    pub fn media_play(&mut self) -> Result<(), SdkError> {
        self.playing = true;
        Ok(self.device.play()?)
    }

    pub fn media_pause(&mut self) -> Result<(), SdkError> {
        self.playing = false;
        Ok(self.device.pause()?)
    }

    /// Pause when the last issued command was play, play otherwise
    pub fn media_play_pause(&mut self) -> Result<(), SdkError> {
        if self.playing {
            self.media_pause()
        } else {
            self.media_play()
        }
    }

    pub fn media_stop(&mut self) -> Result<(), SdkError> {
        self.playing = false;
        Ok(self.device.stop()?)
    }

    pub fn media_next_track(&self) -> Result<(), SdkError> {
        Ok(self.device.next()?)
    }

    pub fn media_previous_track(&self) -> Result<(), SdkError> {
        Ok(self.device.prev()?)
    }

    pub fn volume_up(&self) -> Result<(), SdkError> {
        Ok(self.device.volume_up()?)
    }

    pub fn volume_down(&self) -> Result<(), SdkError> {
        Ok(self.device.volume_down()?)
    }

    /// Toggle mute; the device exposes no absolute set-mute call
    pub fn mute_volume(&self) -> Result<(), SdkError> {
        Ok(self.device.mute()?)
    }
}
