mod transcribe_job;

pub use transcribe_job::*;
