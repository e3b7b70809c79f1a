use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use transcriber_domain::{
    DomainError, Task, Transcription, TranscriptionPort, TranscriptionRequest,
};

#[derive(Debug, Clone)]
pub struct LocalWhisperConfig {
    /// Model name; resolved to `{model_dir}/ggml-{model}.bin`.
    pub model: String,
    pub model_dir: String,
    pub threads: usize,
    pub temperature: f32,
}

/// In-process transcription via whisper.cpp. The loaded context is kept
/// across invocations and only reloaded when a job asks for a different
/// model; loading a ggml model per request would dominate every job.
pub struct LocalWhisperAdapter {
    config: LocalWhisperConfig,
    runtime: Mutex<WhisperRuntime>,
}

struct WhisperRuntime {
    model_path: Option<PathBuf>,
    context: Option<WhisperContext>,
}

impl LocalWhisperAdapter {
    pub fn new(config: LocalWhisperConfig) -> Self {
        Self {
            config,
            runtime: Mutex::new(WhisperRuntime {
                model_path: None,
                context: None,
            }),
        }
    }

    fn resolve_model_path(&self, override_name: Option<&str>) -> PathBuf {
        let model = override_name.unwrap_or(&self.config.model);
        PathBuf::from(&self.config.model_dir).join(format!("ggml-{model}.bin"))
    }

    fn transcribe_with_runtime(
        &self,
        request: TranscriptionRequest,
    ) -> Result<Transcription, DomainError> {
        let TranscriptionRequest { audio, options } = request;

        let model_path = self.resolve_model_path(options.model_override.as_deref());
        if !model_path.is_file() {
            return Err(DomainError::model_unavailable(format!(
                "whisper model file not found at {}; download a ggml model there or configure \
                 WHISPER_SERVICE_URL",
                model_path.display()
            )));
        }

        // Scoped temp file; removed on drop no matter how we leave this fn.
        let mut audio_file = tempfile::Builder::new()
            .suffix(".wav")
            .tempfile()
            .map_err(|err| DomainError::internal(format!("failed to create temp file: {err}")))?;
        audio_file
            .write_all(&audio)
            .and_then(|()| audio_file.flush())
            .map_err(|err| DomainError::internal(format!("failed to write temp file: {err}")))?;
        let samples = read_wav_samples(audio_file.path())?;

        let mut runtime = self
            .runtime
            .lock()
            .map_err(|_| DomainError::internal("whisper runtime lock poisoned"))?;

        if runtime.model_path.as_deref() != Some(model_path.as_path()) {
            tracing::info!(model_path = %model_path.display(), "loading whisper model");
            let path_str = model_path
                .to_str()
                .ok_or_else(|| DomainError::internal("model path is not valid UTF-8"))?;
            let context =
                WhisperContext::new_with_params(path_str, WhisperContextParameters::default())
                    .map_err(|err| {
                        DomainError::model_unavailable(format!("failed to load model: {err}"))
                    })?;
            runtime.context = Some(context);
            runtime.model_path = Some(model_path);
        }

        let context = runtime
            .context
            .as_ref()
            .ok_or_else(|| DomainError::internal("whisper context unavailable"))?;
        let mut state = context
            .create_state()
            .map_err(|err| DomainError::internal(format!("failed to create state: {err}")))?;

        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        params.set_n_threads(self.config.threads as i32);
        params.set_language(options.language.as_deref());
        params.set_translate(matches!(options.task, Task::Translate));
        params.set_no_timestamps(false);
        params.set_token_timestamps(options.word_timestamps);
        params.set_split_on_word(true);
        params.set_temperature(self.config.temperature);
        params.set_single_segment(false);
        params.set_print_realtime(false);
        params.set_print_progress(false);
        params.set_print_timestamps(false);

        state
            .full(params, &samples)
            .map_err(|err| DomainError::internal(format!("whisper decode failed: {err}")))?;

        let mut segments = Vec::new();
        let mut text = String::new();
        for idx in 0..state.full_n_segments() {
            let Some(segment) = state.get_segment(idx) else {
                continue;
            };
            let segment_text = segment
                .to_str_lossy()
                .map(|cow| cow.to_string())
                .unwrap_or_default();

            let trimmed = segment_text.trim();
            if !trimmed.is_empty() {
                if !text.is_empty() {
                    text.push(' ');
                }
                text.push_str(trimmed);
            }

            let mut record = json!({
                "id": idx,
                "start": centiseconds_to_seconds(segment.start_timestamp()),
                "end": centiseconds_to_seconds(segment.end_timestamp()),
                "text": segment_text,
            });

            if options.word_timestamps {
                let mut words = Vec::new();
                for token_idx in 0..segment.n_tokens().max(0) {
                    let Some(token) = segment.get_token(token_idx) else {
                        continue;
                    };
                    let token_text = token
                        .to_str_lossy()
                        .map(|cow| cow.to_string())
                        .unwrap_or_default();
                    // Markers like [_BEG_] are decoder bookkeeping, not words.
                    if token_text.starts_with("[_") {
                        continue;
                    }
                    let token_data = token.token_data();
                    words.push(json!({
                        "word": token_text,
                        "start": centiseconds_to_seconds(token_data.t0),
                        "end": centiseconds_to_seconds(token_data.t1),
                        "probability": token.token_probability(),
                    }));
                }
                record["words"] = Value::Array(words);
            }

            segments.push(record);
        }

        Ok(Transcription {
            text,
            segments,
            language: options.language,
            extra: Map::new(),
        })
    }
}

#[async_trait]
impl TranscriptionPort for LocalWhisperAdapter {
    async fn transcribe(
        &self,
        request: TranscriptionRequest,
    ) -> Result<Transcription, DomainError> {
        self.transcribe_with_runtime(request)
    }
}

fn centiseconds_to_seconds(raw: i64) -> f64 {
    raw.max(0) as f64 / 100.0
}

/// Reads the buffered WAV into mono f32 samples the way whisper.cpp
/// expects them. Multi-channel input is averaged down.
fn read_wav_samples(path: &Path) -> Result<Vec<f32>, DomainError> {
    let mut reader = hound::WavReader::open(path).map_err(|err| {
        DomainError::invalid_input(format!("audio buffer is not a readable WAV file: {err}"))
    })?;
    let spec = reader.spec();
    if spec.bits_per_sample == 0 {
        return Err(DomainError::invalid_input("WAV header reports zero bits per sample"));
    }

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<Result<_, _>>()
            .map_err(|err| {
                DomainError::invalid_input(format!("failed to read WAV samples: {err}"))
            })?,
        hound::SampleFormat::Int => {
            let scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|sample| sample.map(|value| value as f32 / scale))
                .collect::<Result<_, _>>()
                .map_err(|err| {
                    DomainError::invalid_input(format!("failed to read WAV samples: {err}"))
                })?
        }
    };

    let channels = spec.channels.max(1) as usize;
    if channels == 1 {
        return Ok(samples);
    }
    Ok(samples
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect())
}
