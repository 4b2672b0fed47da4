//! Shared entity-side view of the coordinator state.

use std::sync::mpsc::Receiver;

use sony_state::{DeviceSnapshot, StateChange};

/// Cached projection of the coordinator snapshot
///
/// Mutated only by draining the entity's change receiver; reads between
/// refreshes see the last applied snapshot.
#[derive(Debug)]
pub(crate) struct EntityState {
    pub snapshot: DeviceSnapshot,
    pub last_error: Option<String>,
}

impl EntityState {
    pub fn new(snapshot: DeviceSnapshot) -> Self {
        Self {
            snapshot,
            last_error: None,
        }
    }

    /// Apply all pending coordinator notifications
    pub fn refresh(&mut self, changes: &Receiver<StateChange>) {
        for change in changes.try_iter() {
            match change {
                StateChange::SnapshotUpdated(snapshot) => {
                    self.snapshot = snapshot;
                    self.last_error = None;
                }
                StateChange::RefreshFailed { reason } => {
                    // The coordinator already forced its snapshot off
                    self.snapshot.mark_off();
                    self.last_error = Some(reason);
                }
            }
        }
    }
}
