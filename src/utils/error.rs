use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Unknown place '{name}'")]
    UnknownPlace { name: String },

    #[error("Invalid command '{input}': {reason}")]
    InvalidCommand { input: String, reason: String },

    #[error("Document generation failed: {message}")]
    DocumentGeneration { message: String },
}

impl AppError {
    pub fn user_friendly_message(&self) -> String {
        match self {
            AppError::ApiError(_) => "Could not reach the geocoding service".to_string(),
            AppError::IoError(e) => format!("File operation failed: {}", e),
            AppError::SerializationError(_) => "Received malformed data".to_string(),
            AppError::ConfigValidationError { field, .. }
            | AppError::InvalidConfigValueError { field, .. }
            | AppError::MissingConfigError { field } => {
                format!("Please check the '{}' setting", field)
            }
            AppError::UnknownPlace { name } => {
                format!("'{}' is not in the list of supported places", name)
            }
            AppError::InvalidCommand { reason, .. } => format!("{} (type 'help')", reason),
            AppError::DocumentGeneration { .. } => {
                "The history report could not be generated".to_string()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

/// Why a place name could not be turned into a coordinate.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FailureReason {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("lookup returned no candidates")]
    EmptyResult,

    #[error("field '{field}' is not a usable number: {value}")]
    NonNumeric { field: &'static str, value: String },
}

/// A lookup that produced nothing usable. All failure modes collapse to
/// this one signal; the reason is kept for logging only.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("could not resolve '{place}': {reason}")]
pub struct ResolutionFailure {
    pub place: String,
    pub reason: FailureReason,
}

impl ResolutionFailure {
    pub fn new(place: impl Into<String>, reason: FailureReason) -> Self {
        Self {
            place: place.into(),
            reason,
        }
    }
}
