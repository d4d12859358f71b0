use thiserror::Error;

use crate::core::models::ReadStatus;

/// Everything that can end a single vision interaction early.
#[derive(Debug, Error)]
pub enum VisionError {
    #[error("Vision service request failed: {0}")]
    Transport(String),

    #[error("Vision service returned {status}: {message}")]
    ServiceStatus { status: u16, message: String },

    #[error("Could not decode image: {0}")]
    Decode(String),

    #[error("Text extraction finished with status '{status}'")]
    ExtractionFailed { status: ReadStatus },

    #[error("Text extraction still running after {attempts} status checks")]
    PollBudgetExhausted { attempts: u32 },

    #[error("Request cancelled")]
    Cancelled,

    #[error("Read response is missing the Operation-Location header")]
    MissingOperationLocation,

    #[error("Unexpected response from vision service: {0}")]
    InvalidResponse(String),

    #[error("Could not read image file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Vision service is not configured: {0}")]
    Config(String),
}

impl VisionError {
    /// True for failures of the HTTP exchange itself, as opposed to failures in what came back.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            VisionError::Transport(_) | VisionError::ServiceStatus { .. }
        )
    }
}

impl From<reqwest::Error> for VisionError {
    fn from(error: reqwest::Error) -> Self {
        VisionError::Transport(error.to_string())
    }
}

impl From<image::ImageError> for VisionError {
    fn from(error: image::ImageError) -> Self {
        VisionError::Decode(error.to_string())
    }
}
