use soap_client::SoapError;
use thiserror::Error;

/// High-level API errors for Sony device operations
///
/// This enum abstracts the underlying SOAP/HTTP details into the error kinds
/// the polling layer bases its policy on: unreachable device, reachable but
/// failing request, malformed response, device-reported fault.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The device could not be reached at the transport level
    ///
    /// Connection refused, host unreachable, timeout. The polling layer
    /// treats this as "device not ready yet" rather than a failure.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The device answered with an HTTP error status
    #[error("Request error: HTTP status {0}")]
    RequestError(u16),

    /// Response parsing error
    ///
    /// The device returned a response that could not be parsed into the
    /// expected format: malformed XML, missing fields, unexpected values.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// SOAP fault returned by the device
    #[error("SOAP fault: error code {0}")]
    SoapFault(u16),

    /// The device handle has not been initialized yet
    ///
    /// Control URLs and the command catalog are only known after
    /// `init_device` has run against a reachable device.
    #[error("Device not initialized: {0}")]
    NotInitialized(String),

    /// No such command in the device's command catalog
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    /// Registration or PIN authentication failed
    #[error("Registration error: {0}")]
    RegistrationError(String),

    /// Invalid parameter value (malformed MAC address, bad broadcast address)
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

impl ApiError {
    /// Whether the device was unreachable, as opposed to reachable but
    /// failing the request. Callers retry connection errors silently.
    pub fn is_connection_error(&self) -> bool {
        matches!(self, ApiError::ConnectionError(_))
    }
}

/// Type alias for results that can return an ApiError
pub type Result<T> = std::result::Result<T, ApiError>;

impl From<SoapError> for ApiError {
    fn from(error: SoapError) -> Self {
        match error {
            SoapError::Connection(msg) => ApiError::ConnectionError(msg),
            SoapError::Http(code) => ApiError::RequestError(code),
            SoapError::Parse(msg) => ApiError::ParseError(msg),
            SoapError::Fault(code) => ApiError::SoapFault(code),
        }
    }
}
