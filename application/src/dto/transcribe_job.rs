use serde::{Deserialize, Serialize};
use validator::Validate;

use transcriber_domain::{Task, Transcription};

/// One unit of work as submitted by the invocation platform. Unknown keys
/// are ignored so callers can carry their own metadata alongside `input`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct JobRequest {
    #[serde(default)]
    #[validate(nested)]
    pub input: JobInput,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct JobInput {
    #[serde(default)]
    pub audio: Option<AudioPayload>,
    #[serde(default)]
    pub audio_url: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, max = 16))]
    pub language: Option<String>,
    #[serde(default)]
    pub task: Option<Task>,
    #[serde(default)]
    pub return_timestamps: Option<bool>,
    #[serde(default)]
    #[validate(length(min = 1, max = 64))]
    pub model: Option<String>,
}

/// Inline audio, either base64 text or a raw byte array.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AudioPayload {
    Encoded(String),
    Raw(Vec<u8>),
}

/// The only externally observable output of a job.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ResponseEnvelope {
    Success { transcription: Transcription },
    Error { error: String },
}
