use std::time::Duration;

use async_trait::async_trait;

use transcriber_domain::{AudioFetchPort, DomainError};

const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(60);

/// Downloads job audio from a caller-supplied URL. One bounded GET, no
/// retries, whole body materialized in memory.
pub struct HttpAudioFetcher {
    client: reqwest::Client,
}

impl HttpAudioFetcher {
    pub fn new() -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(DOWNLOAD_TIMEOUT)
            .build()
            .map_err(|err| DomainError::internal(format!("failed to build HTTP client: {err}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl AudioFetchPort for HttpAudioFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, DomainError> {
        tracing::info!(url = %url, "downloading audio");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| DomainError::download(err.to_string()))?;

        if !response.status().is_success() {
            return Err(DomainError::download(format!(
                "{url} returned status {}",
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|err| DomainError::download(err.to_string()))?;
        tracing::debug!(audio_bytes = bytes.len(), "audio download completed");
        Ok(bytes.to_vec())
    }
}
