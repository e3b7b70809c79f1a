use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use transcriber_domain::{AudioFetchPort, DomainError};

use crate::dto::{AudioPayload, JobInput};

/// Turns the job input into a raw audio buffer. Inline audio wins over
/// `audio_url` when both are present.
pub(crate) async fn resolve_audio(
    input: &JobInput,
    fetcher: &dyn AudioFetchPort,
) -> Result<Vec<u8>, DomainError> {
    match (&input.audio, &input.audio_url) {
        (Some(AudioPayload::Encoded(encoded)), _) => BASE64
            .decode(encoded)
            .map_err(|err| DomainError::invalid_input(err.to_string())),
        (Some(AudioPayload::Raw(bytes)), _) => Ok(bytes.clone()),
        (None, Some(url)) => fetcher.fetch(url).await,
        (None, None) => Err(DomainError::MissingInput),
    }
}
