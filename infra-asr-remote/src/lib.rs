use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart;

use transcriber_domain::{DomainError, Transcription, TranscriptionPort, TranscriptionRequest};

const TRANSCRIBE_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Debug, Clone)]
pub struct RemoteWhisperConfig {
    pub service_url: String,
    pub api_token: Option<String>,
}

/// Delegates transcription to an external Whisper-compatible HTTP service.
/// The response body is trusted and passed through verbatim.
pub struct RemoteWhisperAdapter {
    client: reqwest::Client,
    config: RemoteWhisperConfig,
}

impl RemoteWhisperAdapter {
    pub fn new(config: RemoteWhisperConfig) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(TRANSCRIBE_TIMEOUT)
            .build()
            .map_err(|err| DomainError::internal(format!("failed to build HTTP client: {err}")))?;
        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/transcribe",
            self.config.service_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl TranscriptionPort for RemoteWhisperAdapter {
    async fn transcribe(
        &self,
        request: TranscriptionRequest,
    ) -> Result<Transcription, DomainError> {
        let TranscriptionRequest { audio, options } = request;
        let url = self.endpoint();

        tracing::info!(
            url = %url,
            audio_bytes = audio.len(),
            task = options.task.as_str(),
            "calling whisper service"
        );

        let file_part = multipart::Part::bytes(audio)
            .file_name("audio.wav")
            .mime_str("audio/wav")
            .map_err(|err| DomainError::backend(format!("mime: {err}")))?;
        let mut form = multipart::Form::new()
            .text("task", options.task.as_str())
            .text(
                "return_timestamps",
                if options.word_timestamps { "true" } else { "false" },
            )
            .part("audio", file_part);
        if let Some(language) = options.language {
            form = form.text("language", language);
        }

        let mut builder = self.client.post(&url).multipart(form);
        if let Some(token) = &self.config.api_token {
            builder = builder.bearer_auth(token);
        }

        let response = builder
            .send()
            .await
            .map_err(|err| DomainError::backend(format!("request: {err}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(DomainError::backend(format!("status {status}: {body}")));
        }

        let transcription = response
            .json::<Transcription>()
            .await
            .map_err(|err| DomainError::backend(format!("invalid response body: {err}")))?;

        tracing::info!(
            segment_count = transcription.segments.len(),
            "whisper service responded"
        );
        Ok(transcription)
    }
}
