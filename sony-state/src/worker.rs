//! Background poll worker.
//!
//! Owns the coordinator on a dedicated thread and runs one tick per
//! interval. The next tick is only scheduled once the previous one has
//! completed or failed, so ticks never overlap. A failed tick is reported
//! and never stops the loop.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use parking_lot::{Mutex, RwLock};

use crate::control::DeviceControl;
use crate::coordinator::Coordinator;
use crate::error::{Result, StateError};
use crate::snapshot::DeviceSnapshot;

/// Default polling interval
pub const DEFAULT_UPDATE_INTERVAL: Duration = Duration::from_secs(5);

/// Configuration for the poll worker
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Time between poll ticks, measured from the end of the previous tick
    pub update_interval: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            update_interval: DEFAULT_UPDATE_INTERVAL,
        }
    }
}

/// Notification fanned out to subscribers after every tick
#[derive(Debug, Clone)]
pub enum StateChange {
    /// A tick completed and produced a fresh snapshot
    SnapshotUpdated(DeviceSnapshot),
    /// A tick failed; the device reads as off until a later tick succeeds
    RefreshFailed { reason: String },
}

type Subscribers = Arc<Mutex<Vec<Sender<StateChange>>>>;

/// Handle to a running poll worker
///
/// Cloneable view of the shared snapshot plus subscription management. The
/// worker thread stops when `shutdown` is called or the handle is dropped.
pub struct CoordinatorHandle {
    snapshot: Arc<RwLock<DeviceSnapshot>>,
    subscribers: Subscribers,
    shutdown_tx: Sender<()>,
    worker: Option<JoinHandle<()>>,
}

impl CoordinatorHandle {
    /// Spawn the poll worker for a device client
    ///
    /// The first tick runs immediately; subsequent ticks follow the
    /// configured interval.
    pub fn spawn<C: DeviceControl + 'static>(
        client: Arc<C>,
        friendly_name: Option<String>,
        config: PollConfig,
    ) -> Self {
        let snapshot: Arc<RwLock<DeviceSnapshot>> = Arc::new(RwLock::new(DeviceSnapshot::default()));
        let subscribers: Subscribers = Arc::new(Mutex::new(Vec::new()));
        let (shutdown_tx, shutdown_rx) = mpsc::channel();

        let thread_snapshot = Arc::clone(&snapshot);
        let thread_subscribers = Arc::clone(&subscribers);
        let interval = config.update_interval;

        let worker = thread::Builder::new()
            .name("sony-poll".to_string())
            .spawn(move || {
                let mut coordinator = Coordinator::new(client).with_friendly_name(friendly_name);
                run_poll_loop(
                    &mut coordinator,
                    interval,
                    &shutdown_rx,
                    &thread_snapshot,
                    &thread_subscribers,
                );
            })
            .expect("failed to spawn poll worker thread");

        Self {
            snapshot,
            subscribers,
            shutdown_tx,
            worker: Some(worker),
        }
    }

    /// The last snapshot published by the worker
    pub fn snapshot(&self) -> DeviceSnapshot {
        *self.snapshot.read()
    }

    /// Subscribe to per-tick notifications
    ///
    /// Each subscriber gets its own channel; dropping the receiver
    /// unsubscribes on the next fan-out.
    pub fn subscribe(&self) -> Receiver<StateChange> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.lock().push(tx);
        rx
    }

    /// Stop the worker and wait for the thread to finish
    pub fn shutdown(mut self) -> Result<()> {
        let _ = self.shutdown_tx.send(());
        if let Some(worker) = self.worker.take() {
            worker.join().map_err(|_| StateError::ShutdownFailed)?;
        }
        Ok(())
    }
}

impl Drop for CoordinatorHandle {
    fn drop(&mut self) {
        // Best effort: the worker also exits when the channel disconnects
        let _ = self.shutdown_tx.send(());
    }
}

fn run_poll_loop<C: DeviceControl>(
    coordinator: &mut Coordinator<C>,
    interval: Duration,
    shutdown_rx: &Receiver<()>,
    snapshot: &RwLock<DeviceSnapshot>,
    subscribers: &Mutex<Vec<Sender<StateChange>>>,
) {
    tracing::debug!("Poll worker started");

    loop {
        let change = match coordinator.tick() {
            Ok(fresh) => {
                *snapshot.write() = fresh;
                StateChange::SnapshotUpdated(fresh)
            }
            Err(e) => {
                *snapshot.write() = coordinator.snapshot();
                tracing::warn!("Poll tick failed: {}", e);
                StateChange::RefreshFailed {
                    reason: e.to_string(),
                }
            }
        };

        fan_out(subscribers, change);

        match shutdown_rx.recv_timeout(interval) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            Err(RecvTimeoutError::Timeout) => {}
        }
    }

    tracing::debug!("Poll worker stopped");
}

fn fan_out(subscribers: &Mutex<Vec<Sender<StateChange>>>, change: StateChange) {
    subscribers
        .lock()
        .retain(|tx| tx.send(change.clone()).is_ok());
}
