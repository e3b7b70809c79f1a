use async_trait::async_trait;

use transcriber_domain::{DomainError, Transcription, TranscriptionPort, TranscriptionRequest};

/// Stands in for the local model when the binary was built without the
/// `whisper-runtime` feature. Selected only when no remote backend is
/// configured either, so the error tells the operator both ways out.
pub struct MissingRuntimeAdapter;

#[async_trait]
impl TranscriptionPort for MissingRuntimeAdapter {
    async fn transcribe(
        &self,
        _request: TranscriptionRequest,
    ) -> Result<Transcription, DomainError> {
        Err(DomainError::model_unavailable(
            "local whisper runtime is not compiled in and no WHISPER_SERVICE_URL is configured; \
             rebuild with the `whisper-runtime` feature or configure the remote Whisper service",
        ))
    }
}
