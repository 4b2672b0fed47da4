//! High-level Sony device API
//!
//! This crate provides a typed client for the proprietary local control
//! services of Sony networked TV/AV devices (Bravia and friends): the IRCC
//! remote-control SOAP service, the DMR media-renderer services
//! (AVTransport, RenderingControl), the registration/pairing endpoint, and
//! wake-on-LAN. It uses the private `soap-client` crate for the low-level
//! SOAP/HTTP communication.
//!
//! # Quick start
//!
//! ```no_run
//! use sony_api::SonyDevice;
//!
//! let device = SonyDevice::new("192.168.0.23", "media-center");
//!
//! // One-time pairing (shows a PIN on the device when required)
//! match device.register()? {
//!     sony_api::RegistrationResult::Success => {}
//!     sony_api::RegistrationResult::PinNeeded => {
//!         device.send_authentication("1234")?;
//!     }
//! }
//!
//! device.init_device()?;
//! println!("volume: {}", device.get_volume()?);
//! device.send_command("VolumeUp")?;
//! # Ok::<(), sony_api::ApiError>(())
//! ```

pub mod commands;
pub mod description;
pub mod device;
pub mod error;
pub mod registration;
pub mod wol;

pub use device::{
    SonyDevice, DEFAULT_APP_PORT, DEFAULT_BROADCAST_ADDRESS, DEFAULT_DMR_PORT, DEFAULT_IRCC_PORT,
};
pub use error::{ApiError, Result};
pub use registration::RegistrationResult;
pub use soap_client::HttpMethod;
