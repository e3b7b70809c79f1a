use thiserror::Error;

/// Failure classes a transcription job can end in. The `Display` text of
/// each variant is what ends up in the error envelope, so messages are
/// written for the caller, not for a stack trace.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("no audio input provided; use `audio` (base64) or `audio_url`")]
    MissingInput,

    #[error("invalid base64 audio data: {0}")]
    InvalidInput(String),

    #[error("failed to download audio from URL: {0}")]
    Download(String),

    #[error("failed to call Whisper service: {0}")]
    Backend(String),

    #[error("whisper model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn download(message: impl Into<String>) -> Self {
        Self::Download(message.into())
    }

    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }

    pub fn model_unavailable(message: impl Into<String>) -> Self {
        Self::ModelUnavailable(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}
