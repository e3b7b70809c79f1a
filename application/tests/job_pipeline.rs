use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde_json::json;

use transcriber_application::{
    JobRequest, ResponseEnvelope, TranscribeJobUseCase, TranscribeJobUseCaseImpl,
};
use transcriber_domain::{
    AudioFetchPort, DomainError, Task, Transcription, TranscriptionPort, TranscriptionRequest,
};

#[derive(Default)]
struct RecordingTranscriptionPort {
    calls: AtomicUsize,
    last_request: Mutex<Option<TranscriptionRequest>>,
}

#[async_trait]
impl TranscriptionPort for RecordingTranscriptionPort {
    async fn transcribe(
        &self,
        request: TranscriptionRequest,
    ) -> Result<Transcription, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let language = request.options.language.clone();
        *self.last_request.lock().expect("lock") = Some(request);
        Ok(Transcription {
            text: "hello world".to_string(),
            segments: vec![json!({"id": 0, "start": 0.0, "end": 1.0, "text": "hello world"})],
            language,
            extra: serde_json::Map::new(),
        })
    }
}

struct FailingFetcher;

#[async_trait]
impl AudioFetchPort for FailingFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, DomainError> {
        Err(DomainError::download(format!("{url} returned status 404")))
    }
}

struct UnusedFetcher;

#[async_trait]
impl AudioFetchPort for UnusedFetcher {
    async fn fetch(&self, _url: &str) -> Result<Vec<u8>, DomainError> {
        panic!("fetcher must not be called for inline audio");
    }
}

fn job(value: serde_json::Value) -> JobRequest {
    serde_json::from_value(value).expect("valid job document")
}

#[tokio::test]
async fn inline_base64_job_reaches_transcription_with_original_bytes() {
    let port = Arc::new(RecordingTranscriptionPort::default());
    let usecase = TranscribeJobUseCaseImpl::new(port.clone(), Arc::new(UnusedFetcher));

    let audio = b"fake-wav-content".to_vec();
    let envelope = usecase
        .handle(job(json!({
            "input": {"audio": BASE64.encode(&audio), "language": "en"},
        })))
        .await;

    match envelope {
        ResponseEnvelope::Success { transcription } => {
            assert_eq!(transcription.text, "hello world");
            assert_eq!(transcription.language.as_deref(), Some("en"));
        }
        ResponseEnvelope::Error { error } => panic!("unexpected error: {error}"),
    }

    let request = port
        .last_request
        .lock()
        .expect("lock")
        .take()
        .expect("port was called");
    assert_eq!(request.audio, audio);
    assert_eq!(request.options.language.as_deref(), Some("en"));
}

#[tokio::test]
async fn options_default_to_transcribe_with_timestamps() {
    let port = Arc::new(RecordingTranscriptionPort::default());
    let usecase = TranscribeJobUseCaseImpl::new(port.clone(), Arc::new(UnusedFetcher));

    usecase
        .handle(job(json!({"input": {"audio": BASE64.encode(b"x")}})))
        .await;

    let request = port
        .last_request
        .lock()
        .expect("lock")
        .take()
        .expect("port was called");
    assert_eq!(request.options.task, Task::Transcribe);
    assert!(request.options.word_timestamps);
    assert!(request.options.language.is_none());
    assert!(request.options.model_override.is_none());
}

#[tokio::test]
async fn explicit_options_are_forwarded() {
    let port = Arc::new(RecordingTranscriptionPort::default());
    let usecase = TranscribeJobUseCaseImpl::new(port.clone(), Arc::new(UnusedFetcher));

    usecase
        .handle(job(json!({
            "input": {
                "audio": BASE64.encode(b"x"),
                "task": "translate",
                "return_timestamps": false,
                "model": "large-v3",
            },
        })))
        .await;

    let request = port
        .last_request
        .lock()
        .expect("lock")
        .take()
        .expect("port was called");
    assert_eq!(request.options.task, Task::Translate);
    assert!(!request.options.word_timestamps);
    assert_eq!(request.options.model_override.as_deref(), Some("large-v3"));
}

#[tokio::test]
async fn missing_audio_sources_yield_error_envelope() {
    let port = Arc::new(RecordingTranscriptionPort::default());
    let usecase = TranscribeJobUseCaseImpl::new(port.clone(), Arc::new(UnusedFetcher));

    let envelope = usecase.handle(job(json!({"input": {}}))).await;

    match envelope {
        ResponseEnvelope::Error { error } => assert!(
            error.contains("no audio input provided"),
            "unexpected message: {error}"
        ),
        ResponseEnvelope::Success { .. } => panic!("must not succeed without audio"),
    }
    assert_eq!(port.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn invalid_base64_yields_error_envelope() {
    let port = Arc::new(RecordingTranscriptionPort::default());
    let usecase = TranscribeJobUseCaseImpl::new(port.clone(), Arc::new(UnusedFetcher));

    let envelope = usecase
        .handle(job(json!({"input": {"audio": "!!!not-base64!!!"}})))
        .await;

    assert!(matches!(envelope, ResponseEnvelope::Error { .. }));
    assert_eq!(port.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn failed_download_skips_transcription() {
    let port = Arc::new(RecordingTranscriptionPort::default());
    let usecase = TranscribeJobUseCaseImpl::new(port.clone(), Arc::new(FailingFetcher));

    let envelope = usecase
        .handle(job(json!({
            "input": {"audio_url": "https://example.com/missing.wav"},
        })))
        .await;

    match envelope {
        ResponseEnvelope::Error { error } => assert!(
            error.contains("failed to download audio"),
            "unexpected message: {error}"
        ),
        ResponseEnvelope::Success { .. } => panic!("must not succeed on download failure"),
    }
    assert_eq!(port.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn inline_audio_wins_over_audio_url() {
    let port = Arc::new(RecordingTranscriptionPort::default());
    let usecase = TranscribeJobUseCaseImpl::new(port.clone(), Arc::new(UnusedFetcher));

    let envelope = usecase
        .handle(job(json!({
            "input": {
                "audio": BASE64.encode(b"inline"),
                "audio_url": "https://example.com/a.wav",
            },
        })))
        .await;

    assert!(matches!(envelope, ResponseEnvelope::Success { .. }));
    assert_eq!(port.calls.load(Ordering::SeqCst), 1);
}
