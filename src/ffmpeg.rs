use std::path::PathBuf;
use std::process::{Command, Stdio};

use crate::error::{EncodeError, Result};

pub mod pass_factories;
pub mod pass_plan;
pub mod progress;
pub mod supervisor;

pub struct FFmpeg {
    program: PathBuf,
}

impl FFmpeg {
    pub fn new(program: PathBuf) -> Self {
        FFmpeg { program }
    }

    pub fn is_installed(&self) -> bool {
        let cmd = Command::new(&self.program)
            .arg("-version")
            .stdin(Stdio::null())
            .output();
        match cmd {
            Ok(output) => output.status.success(),
            Err(_) => false,
        }
    }

    pub fn ensure_installed(&self) -> Result<()> {
        match self.is_installed() {
            true => Ok(()),
            false => Err(EncodeError::ToolNotFound(self.program.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_binary() {
        let ffmpeg = FFmpeg::new(PathBuf::from("/nonexistent/ffmpeg"));
        assert!(!ffmpeg.is_installed());
        assert!(matches!(ffmpeg.ensure_installed(), Err(EncodeError::ToolNotFound(_))));
    }
}
