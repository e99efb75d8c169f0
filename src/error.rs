use thiserror::Error;

#[derive(Error, Debug)]
pub enum PodTrustError {
    #[error("invalid input: {0}")]
    Validation(String),

    #[error("capability unavailable: {0}")]
    Capability(String),

    #[error("invalid verification transition: {event} while {from}")]
    InvalidTransition { from: String, event: String },

    #[error("config parse error: {0}")]
    ConfigParse(String),

    #[error("path does not exist: {0}")]
    PathNotFound(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("toml parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("pattern error: {0}")]
    Pattern(#[from] regex::Error),
}

impl PodTrustError {
    /// Errors the caller can fix by changing the request.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::Validation(_)
                | Self::InvalidTransition { .. }
                | Self::PathNotFound(_)
                | Self::Json(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, PodTrustError>;
