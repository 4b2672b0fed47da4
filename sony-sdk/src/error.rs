use thiserror::Error;

#[derive(Error, Debug)]
pub enum SdkError {
    #[error("State management error: {0}")]
    State(#[from] sony_state::StateError),

    #[error("API error: {0}")]
    Api(#[from] sony_api::ApiError),

    #[error("Device rejected the PIN")]
    AuthenticationFailed,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Config I/O error: {0}")]
    ConfigIo(#[from] std::io::Error),

    #[error("Config format error: {0}")]
    ConfigFormat(#[from] serde_json::Error),

    #[error("No config directory available on this platform")]
    NoConfigDir,
}
