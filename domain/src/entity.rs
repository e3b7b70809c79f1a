use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Task {
    #[default]
    Transcribe,
    Translate,
}

impl Task {
    pub fn as_str(&self) -> &'static str {
        match self {
            Task::Transcribe => "transcribe",
            Task::Translate => "translate",
        }
    }
}

#[derive(Debug, Clone)]
pub struct TranscriptionOptions {
    pub language: Option<String>,
    pub task: Task,
    pub word_timestamps: bool,
    /// Per-job model name; only meaningful for the local whisper path.
    pub model_override: Option<String>,
}

impl Default for TranscriptionOptions {
    fn default() -> Self {
        Self {
            language: None,
            task: Task::Transcribe,
            word_timestamps: true,
            model_override: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TranscriptionRequest {
    pub audio: Vec<u8>,
    pub options: TranscriptionOptions,
}

/// Transcription output as produced by the backend. Only `text`,
/// `segments` and `language` are part of the contract; whatever else the
/// backend returns rides along in `extra` untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcription {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub segments: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn task_defaults_to_transcribe() {
        assert_eq!(Task::default(), Task::Transcribe);
        assert_eq!(Task::default().as_str(), "transcribe");
    }

    #[test]
    fn task_deserializes_from_lowercase() {
        let task: Task = serde_json::from_value(json!("translate")).expect("valid task");
        assert_eq!(task, Task::Translate);
        assert!(serde_json::from_value::<Task>(json!("summarize")).is_err());
    }

    #[test]
    fn transcription_round_trips_unknown_fields() {
        let body = json!({
            "text": "hello",
            "segments": [{"id": 0, "start": 0.0, "end": 1.5, "text": "hello"}],
            "language": "en",
            "duration": 1.5,
        });
        let transcription: Transcription =
            serde_json::from_value(body.clone()).expect("valid transcription");
        assert_eq!(transcription.text, "hello");
        assert_eq!(transcription.segments.len(), 1);
        assert_eq!(
            serde_json::to_value(&transcription).expect("serializes"),
            body
        );
    }

    #[test]
    fn transcription_tolerates_missing_contract_fields() {
        let transcription: Transcription =
            serde_json::from_value(json!({})).expect("empty body parses");
        assert_eq!(transcription.text, "");
        assert!(transcription.segments.is_empty());
        assert!(transcription.language.is_none());
    }
}
