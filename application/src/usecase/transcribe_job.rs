use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use validator::Validate;

use transcriber_domain::{
    AudioFetchPort, Transcription, TranscriptionOptions, TranscriptionPort, TranscriptionRequest,
};

use crate::dto::{JobRequest, ResponseEnvelope};
use crate::error::ApplicationError;
use crate::usecase::resolve_audio::resolve_audio;

#[async_trait]
pub trait TranscribeJobUseCase: Send + Sync {
    /// Runs one job to completion. Every failure becomes an error
    /// envelope; this never returns `Err` and never panics on bad input.
    async fn handle(&self, job: JobRequest) -> ResponseEnvelope;
}

pub struct TranscribeJobUseCaseImpl {
    transcription: Arc<dyn TranscriptionPort>,
    audio_fetch: Arc<dyn AudioFetchPort>,
}

impl TranscribeJobUseCaseImpl {
    pub fn new(
        transcription: Arc<dyn TranscriptionPort>,
        audio_fetch: Arc<dyn AudioFetchPort>,
    ) -> Self {
        Self {
            transcription,
            audio_fetch,
        }
    }

    async fn run(&self, job: JobRequest) -> Result<Transcription, ApplicationError> {
        job.validate()
            .map_err(|err| ApplicationError::Validation(err.to_string()))?;
        let input = job.input;

        tracing::info!(
            has_inline_audio = input.audio.is_some(),
            has_audio_url = input.audio_url.is_some(),
            language = input.language.as_deref().unwrap_or("auto"),
            "processing transcription job"
        );

        let audio = resolve_audio(&input, self.audio_fetch.as_ref()).await?;
        tracing::info!(audio_bytes = audio.len(), "audio input resolved");

        let options = TranscriptionOptions {
            language: input.language,
            task: input.task.unwrap_or_default(),
            word_timestamps: input.return_timestamps.unwrap_or(true),
            model_override: input.model,
        };

        let started = Instant::now();
        let transcription = self
            .transcription
            .transcribe(TranscriptionRequest { audio, options })
            .await?;
        tracing::info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            segment_count = transcription.segments.len(),
            "transcription completed"
        );

        Ok(transcription)
    }
}

#[async_trait]
impl TranscribeJobUseCase for TranscribeJobUseCaseImpl {
    async fn handle(&self, job: JobRequest) -> ResponseEnvelope {
        match self.run(job).await {
            Ok(transcription) => ResponseEnvelope::Success { transcription },
            Err(error) => {
                tracing::error!(error = %error, "transcription job failed");
                ResponseEnvelope::Error {
                    error: error.to_string(),
                }
            }
        }
    }
}
