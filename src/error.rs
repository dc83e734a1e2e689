use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("invalid tracking number: must be 7 to 40 alphanumeric characters")]
    InvalidTrackingNumber,

    #[error("invalid carrier '{0}': expected one of DHL, FEDEX, UPS, USPS")]
    InvalidCarrier(String),

    #[error("unknown time zone '{0}'")]
    InvalidTimeZone(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request failed: {0}")]
    Transport(String),

    #[error("HTTP request returned status {0}")]
    HttpStatus(u16),

    #[error("tracking page could not be read: {0}")]
    SourceFormat(#[source] std::io::Error),

    #[error("failed to encode result: {0}")]
    Encode(String),

    #[error("failed to write output: {0}")]
    Output(#[source] std::io::Error),
}

impl From<reqwest::Error> for TrackerError {
    fn from(err: reqwest::Error) -> Self {
        TrackerError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for TrackerError {
    fn from(err: serde_json::Error) -> Self {
        TrackerError::Encode(err.to_string())
    }
}

impl From<ciborium::ser::Error<std::io::Error>> for TrackerError {
    fn from(err: ciborium::ser::Error<std::io::Error>) -> Self {
        TrackerError::Encode(err.to_string())
    }
}

impl From<toml::de::Error> for TrackerError {
    fn from(err: toml::de::Error) -> Self {
        TrackerError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TrackerError>;
