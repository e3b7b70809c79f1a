use serde::{Deserialize, Serialize};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Process-wide configuration, read once at startup and immutable after
/// that. Constructors take it explicitly; nothing reads the environment
/// past this point.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub whisper: WhisperRuntimeConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default)]
    pub service_url: Option<String>,
    #[serde(default)]
    pub api_token: Option<String>,
}

impl BackendConfig {
    /// The remote backend URL, if one is configured. Blank values count
    /// as absent so an empty env var does not select the remote path.
    pub fn service_url(&self) -> Option<&str> {
        self.service_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhisperRuntimeConfig {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_model_dir")]
    pub model_dir: String,
    #[serde(default = "default_threads")]
    pub threads: usize,
    #[serde(default)]
    pub temperature: f32,
}

impl Default for WhisperRuntimeConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            model_dir: default_model_dir(),
            threads: default_threads(),
            temperature: 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

impl AppConfig {
    /// Builds the configuration from a key lookup. Kept separate from
    /// [`load_config`] so tests can feed values without touching process
    /// env vars.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let whisper_defaults = WhisperRuntimeConfig::default();
        Self {
            backend: BackendConfig {
                service_url: lookup("WHISPER_SERVICE_URL"),
                api_token: lookup("WHISPER_API_TOKEN"),
            },
            whisper: WhisperRuntimeConfig {
                model: lookup("WHISPER_MODEL").unwrap_or(whisper_defaults.model),
                model_dir: lookup("WHISPER_MODEL_DIR").unwrap_or(whisper_defaults.model_dir),
                threads: lookup("WHISPER_THREADS")
                    .and_then(|raw| raw.parse().ok())
                    .unwrap_or(whisper_defaults.threads),
                temperature: lookup("WHISPER_TEMPERATURE")
                    .and_then(|raw| raw.parse().ok())
                    .unwrap_or(whisper_defaults.temperature),
            },
            logging: LoggingConfig {
                filter: lookup("LOG_FILTER").unwrap_or_else(default_log_filter),
            },
        }
    }
}

pub fn load_config() -> AppConfig {
    AppConfig::from_lookup(|key| std::env::var(key).ok())
}

/// Installs the global tracing subscriber. `RUST_LOG` wins over the
/// configured filter when set.
pub fn setup_logging(config: &AppConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.filter.clone()));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true))
        .init();

    tracing::info!(
        external_service = config.backend.service_url().is_some(),
        model = %config.whisper.model,
        "transcription worker configured"
    );
}

fn default_model() -> String {
    "base".to_string()
}

fn default_model_dir() -> String {
    "models".to_string()
}

fn default_threads() -> usize {
    4
}

fn default_log_filter() -> String {
    "info".to_string()
}
