//! Polling state reconciliation for Sony devices
//!
//! This crate owns the poll loop that keeps a `DeviceSnapshot` in sync with
//! a device: probe-then-init sequencing for devices that come and go, a
//! small status state machine (off / on / playing / paused), and fan-out of
//! per-tick notifications to any number of subscribers.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use sony_api::SonyDevice;
//! use sony_state::{CoordinatorHandle, PollConfig, StateChange};
//!
//! let device = Arc::new(SonyDevice::new("192.168.0.23", "media-center"));
//! let handle = CoordinatorHandle::spawn(device, None, PollConfig::default());
//!
//! let changes = handle.subscribe();
//! for change in changes {
//!     match change {
//!         StateChange::SnapshotUpdated(snapshot) => {
//!             println!("device is {:?}", snapshot.status);
//!         }
//!         StateChange::RefreshFailed { reason } => {
//!             eprintln!("device unavailable: {}", reason);
//!         }
//!     }
//! }
//! ```

mod control;
mod coordinator;
mod error;
mod snapshot;
mod worker;

pub use control::DeviceControl;
pub use coordinator::Coordinator;
pub use error::{Result, StateError};
pub use snapshot::{DeviceSnapshot, DeviceStatus};
pub use worker::{CoordinatorHandle, PollConfig, StateChange, DEFAULT_UPDATE_INTERVAL};
