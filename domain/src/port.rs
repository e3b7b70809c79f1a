use async_trait::async_trait;

use crate::{DomainError, Transcription, TranscriptionRequest};

#[async_trait]
pub trait TranscriptionPort: Send + Sync {
    async fn transcribe(
        &self,
        request: TranscriptionRequest,
    ) -> Result<Transcription, DomainError>;
}

#[async_trait]
pub trait AudioFetchPort: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, DomainError>;
}
