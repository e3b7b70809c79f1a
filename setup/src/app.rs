use std::sync::Arc;

use transcriber_application::{
    JobRequest, ResponseEnvelope, TranscribeJobUseCase, TranscribeJobUseCaseImpl,
};
use transcriber_configuration::AppConfig;
use transcriber_domain::{AudioFetchPort, DomainError, TranscriptionPort};
use transcriber_infra_asr_remote::{RemoteWhisperAdapter, RemoteWhisperConfig};
use transcriber_infra_audio::HttpAudioFetcher;

/// One wired worker. Construction decides the remote/local dispatch once,
/// from configuration; jobs only flow through the chosen path afterwards.
pub struct Application {
    usecase: Arc<dyn TranscribeJobUseCase>,
}

impl Application {
    pub fn new(config: &AppConfig) -> Result<Self, DomainError> {
        let transcription = build_transcription_port(config)?;
        let audio_fetch: Arc<dyn AudioFetchPort> = Arc::new(HttpAudioFetcher::new()?);
        let usecase: Arc<dyn TranscribeJobUseCase> =
            Arc::new(TranscribeJobUseCaseImpl::new(transcription, audio_fetch));
        Ok(Self { usecase })
    }

    /// Runs one job document and always yields an envelope; a malformed
    /// document is a per-job failure like any other, never a crash.
    pub async fn handle_job(&self, raw_job: &str) -> ResponseEnvelope {
        let job: JobRequest = match serde_json::from_str(raw_job) {
            Ok(job) => job,
            Err(err) => {
                tracing::error!(error = %err, "rejecting malformed job document");
                return ResponseEnvelope::Error {
                    error: format!("invalid job document: {err}"),
                };
            }
        };
        self.usecase.handle(job).await
    }
}

fn build_transcription_port(config: &AppConfig) -> Result<Arc<dyn TranscriptionPort>, DomainError> {
    if let Some(service_url) = config.backend.service_url() {
        tracing::info!(service_url = %service_url, "using remote whisper service");
        return Ok(Arc::new(RemoteWhisperAdapter::new(RemoteWhisperConfig {
            service_url: service_url.to_string(),
            api_token: config.backend.api_token.clone(),
        })?));
    }

    #[cfg(feature = "whisper-runtime")]
    {
        tracing::warn!(
            model = %config.whisper.model,
            "no WHISPER_SERVICE_URL configured; using the local whisper model"
        );
        Ok(Arc::new(
            transcriber_infra_asr_whisper::LocalWhisperAdapter::new(
                transcriber_infra_asr_whisper::LocalWhisperConfig {
                    model: config.whisper.model.clone(),
                    model_dir: config.whisper.model_dir.clone(),
                    threads: config.whisper.threads,
                    temperature: config.whisper.temperature,
                },
            ),
        ))
    }

    #[cfg(not(feature = "whisper-runtime"))]
    {
        tracing::warn!(
            "no WHISPER_SERVICE_URL configured and the `whisper-runtime` feature is disabled; \
             every job will fail until one of the two is provided"
        );
        Ok(Arc::new(transcriber_infra_asr_whisper::MissingRuntimeAdapter))
    }
}
