use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("{0:?} was not found. Install it or point SIZEFIT_FFMPEG/SIZEFIT_FFPROBE at it.")]
    ToolNotFound(PathBuf),

    #[error("Could not read media metadata from {path:?}: {reason}")]
    ProbeFailed { path: PathBuf, reason: String },

    #[error("Media duration must be positive, got {0}s.")]
    InvalidDuration(f64),

    #[error("Target size is too small for the audio settings ({audio_kbps} kbps audio alone needs {audio_bits} of {target_bits} bits).")]
    InsufficientBudget {
        target_bits: u64,
        audio_bits: u64,
        audio_kbps: u32,
    },

    #[error("Calculated video bitrate ({video_kbps} kbps) is too low for usable quality. Increase the target size.")]
    BitrateTooLow { video_kbps: u64 },

    #[error("Could not start {program:?}: {source}")]
    ProcessSpawnFailed {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Encoder exited with {}:\n{tail}", describe_code(.code))]
    ProcessExitedNonZero { code: Option<i32>, tail: String },

    #[error("Output file {0:?} was not created.")]
    OutputMissing(PathBuf),

    #[error("Encoding was cancelled.")]
    Cancelled,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {}", code),
        None => String::from("no status (terminated by signal)"),
    }
}

pub type Result<T> = std::result::Result<T, EncodeError>;
