//! High-level SDK for Sony networked TV/AV devices.
//!
//! Wraps the lower layers into a small setup-and-use surface: a persisted
//! [`DeviceConfig`], a two-step pairing flow, and per-device
//! [`MediaPlayer`] and [`Remote`] views backed by a background poll
//! worker.
//!
//! ```no_run
//! use sony_sdk::{DeviceConfig, SetupOutcome, SonySystem};
//!
//! # fn main() -> Result<(), sony_sdk::SdkError> {
//! let config = DeviceConfig::new("192.168.0.23");
//!
//! let system = match SonySystem::connect(config)? {
//!     SetupOutcome::Ready(system) => system,
//!     SetupOutcome::PinRequired(pairing) => {
//!         // Read the PIN off the TV screen
//!         pairing.submit_pin("1234")?
//!     }
//! };
//!
//! let mut player = system.media_player();
//! player.refresh();
//! println!("{} is {:?}", player.name(), player.state());
//! # Ok(())
//! # }
//! ```

mod config;
mod entity;
mod error;
mod logging;
mod media_player;
mod remote;
mod system;

pub use config::{DeviceConfig, DEFAULT_PIN, DEFAULT_UPDATE_INTERVAL_SECS};
pub use error::SdkError;
pub use logging::{init_logging, init_logging_from_env, LoggingError, LoggingMode};
pub use media_player::MediaPlayer;
pub use remote::{Remote, DEFAULT_DELAY, DEFAULT_NUM_REPEATS};
pub use system::{DeviceInfo, PendingPairing, SetupOutcome, SonySystem, DEFAULT_CLIENT_NAME};

pub use sony_api::{ApiError, SonyDevice};
pub use sony_state::{DeviceSnapshot, DeviceStatus, StateChange};
