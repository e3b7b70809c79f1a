mod unavailable;

pub use unavailable::MissingRuntimeAdapter;

#[cfg(feature = "whisper-runtime")]
mod runtime;
#[cfg(feature = "whisper-runtime")]
pub use runtime::{LocalWhisperAdapter, LocalWhisperConfig};
