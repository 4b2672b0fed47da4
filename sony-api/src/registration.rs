//! Device registration (pairing) support.
//!
//! First contact with a device requires registering this client against the
//! app service. Devices that enforce pairing answer the plain registration
//! request with HTTP 401 and display a PIN on screen; the client then repeats
//! the request with the PIN as HTTP Basic credentials (empty username).

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Outcome of a registration attempt against the device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationResult {
    /// Registration accepted; the client is paired
    Success,
    /// The device wants a PIN before accepting this client
    PinNeeded,
}

/// Build the `Authorization` header value for PIN authentication.
///
/// The device expects Basic credentials with an empty username and the PIN
/// as the password.
pub fn basic_auth_header(pin: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!(":{}", pin)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_auth_header() {
        // base64(":1234") == "OjEyMzQ="
        assert_eq!(basic_auth_header("1234"), "Basic OjEyMzQ=");
    }

    #[test]
    fn test_basic_auth_header_empty_pin() {
        // base64(":") == "Og=="
        assert_eq!(basic_auth_header(""), "Basic Og==");
    }
}
