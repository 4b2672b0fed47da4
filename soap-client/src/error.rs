//! Error types for the SOAP client

use thiserror::Error;

/// Errors that can occur during device communication
///
/// The `Connection` variant is kept separate from `Http` on purpose: callers
/// treat an unreachable device differently from a device that answered with
/// an error status.
#[derive(Debug, Error)]
pub enum SoapError {
    /// The device could not be reached (refused, unreachable, timeout, DNS)
    #[error("Connection error: {0}")]
    Connection(String),

    /// The device answered with an HTTP error status
    #[error("HTTP error status {0}")]
    Http(u16),

    /// XML parsing error
    #[error("XML parsing error: {0}")]
    Parse(String),

    /// SOAP fault returned by the device
    #[error("SOAP fault: error code {0}")]
    Fault(u16),
}

impl SoapError {
    /// Whether this error means the device was unreachable at the transport
    /// level, as opposed to reachable but unhappy with the request.
    pub fn is_connection(&self) -> bool {
        matches!(self, SoapError::Connection(_))
    }
}

impl From<ureq::Error> for SoapError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(code, _) => SoapError::Http(code),
            ureq::Error::Transport(t) => SoapError::Connection(t.to_string()),
        }
    }
}
