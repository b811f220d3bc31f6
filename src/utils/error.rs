use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Upstream returned {status} for {url}")]
    UpstreamStatus {
        url: String,
        status: u16,
        body: String,
    },

    #[error("No region found for {city}, {state}")]
    RegionNotFound { state: String, city: String },

    #[error("No listings to write")]
    EmptyDataset,

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

impl EtlError {
    /// Process exit status for this error. Usage, configuration and primary
    /// upstream failures exit 2; everything else is an unhandled fault.
    pub fn exit_code(&self) -> i32 {
        match self {
            EtlError::ApiError(_)
            | EtlError::UpstreamStatus { .. }
            | EtlError::RegionNotFound { .. }
            | EtlError::ConfigError { .. }
            | EtlError::InvalidConfigValueError { .. } => 2,
            EtlError::CsvError(_)
            | EtlError::IoError(_)
            | EtlError::SerializationError(_)
            | EtlError::EmptyDataset => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
