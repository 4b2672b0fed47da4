//! Remote-control view of a device.
//!
//! Sends named commands from the device's catalog, falling back to raw
//! IRCC codes for names the device never published. Sequences are paced
//! with a configurable inter-command delay because most devices drop
//! IRCC codes that arrive back to back.

use std::sync::mpsc::Receiver;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use sony_api::{ApiError, SonyDevice};
use sony_state::{DeviceSnapshot, StateChange};

use crate::entity::EntityState;
use crate::error::SdkError;

/// Default number of times a command sequence is repeated
pub const DEFAULT_NUM_REPEATS: u32 = 1;
/// Default pause between consecutive commands
pub const DEFAULT_DELAY: Duration = Duration::from_millis(400);

/// IRCC remote control for one device
pub struct Remote {
    device: Arc<SonyDevice>,
    changes: Receiver<StateChange>,
    state: EntityState,
}

impl Remote {
    pub(crate) fn new(
        device: Arc<SonyDevice>,
        changes: Receiver<StateChange>,
        snapshot: DeviceSnapshot,
    ) -> Self {
        Self {
            device,
            changes,
            state: EntityState::new(snapshot),
        }
    }

    /// Pull in any poll results published since the last refresh
    pub fn refresh(&mut self) {
        self.state.refresh(&self.changes);
    }

    /// Whether the device reads as on, as of the last refresh
    pub fn is_on(&self) -> bool {
        self.state.snapshot.status.is_on()
    }

    pub fn turn_on(&self) -> Result<(), SdkError> {
        Ok(self.device.power(true)?)
    }

    pub fn turn_off(&self) -> Result<(), SdkError> {
        Ok(self.device.power(false)?)
    }

    /// Turn the device off when the cached state says on, on otherwise
    pub fn toggle(&self) -> Result<(), SdkError> {
        if self.is_on() {
            self.turn_off()
        } else {
            self.turn_on()
        }
    }

    /// Send a command sequence with the default pacing
    pub fn send_command(&self, commands: &[&str]) -> Result<(), SdkError> {
        self.send_command_repeated(commands, DEFAULT_NUM_REPEATS, DEFAULT_DELAY)
    }

    /// Send a command sequence, repeating the whole sequence `num_repeats`
    /// times with `delay` after every command
    ///
    /// Each entry is tried as a catalog name first; unrecognized names are
    /// sent as raw IRCC codes.
    pub fn send_command_repeated(
        &self,
        commands: &[&str],
        num_repeats: u32,
        delay: Duration,
    ) -> Result<(), SdkError> {
        send_sequence(commands, num_repeats, delay, |command| {
            self.send_single(command)
        })
    }

    fn send_single(&self, command: &str) -> Result<(), SdkError> {
        match self.device.send_command(command) {
            Err(ApiError::UnknownCommand(_)) => {
                tracing::debug!(command, "Not in command catalog, sending as raw IRCC code");
                Ok(self.device.send_ircc(command)?)
            }
            result => Ok(result?),
        }
    }
}

fn send_sequence<F>(
    commands: &[&str],
    num_repeats: u32,
    delay: Duration,
    mut send: F,
) -> Result<(), SdkError>
where
    F: FnMut(&str) -> Result<(), SdkError>,
{
    for _ in 0..num_repeats {
        for command in commands {
            send(command)?;
            if !delay.is_zero() {
                thread::sleep(delay);
            }
        }
    }
    Ok(())
}
