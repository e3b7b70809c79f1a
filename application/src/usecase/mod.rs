mod resolve_audio;
mod transcribe_job;

pub use transcribe_job::{TranscribeJobUseCase, TranscribeJobUseCaseImpl};
