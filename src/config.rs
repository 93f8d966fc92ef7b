use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

pub const FFMPEG_ENV: &str = "SIZEFIT_FFMPEG";
pub const FFPROBE_ENV: &str = "SIZEFIT_FFPROBE";

#[derive(Clone, Debug)]
pub struct EncoderConfig {
    pub ffmpeg: PathBuf,
    pub ffprobe: PathBuf,
    /// Bytes requested per read of the encoder's diagnostic stream.
    pub chunk_size: usize,
    /// Characters of diagnostic output kept for failure reports.
    pub tail_len: usize,
    pub passlog_name: String,
    pub null_sink: PathBuf,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        EncoderConfig {
            ffmpeg: PathBuf::from("ffmpeg"),
            ffprobe: PathBuf::from("ffprobe"),
            chunk_size: 256,
            tail_len: 500,
            passlog_name: String::from("ffmpeg2pass"),
            null_sink: PathBuf::from(if cfg!(windows) { "NUL" } else { "/dev/null" }),
        }
    }
}

impl EncoderConfig {
    pub fn from_env() -> Self {
        let mut config = EncoderConfig::default();
        if let Some(ffmpeg) = env::var_os(FFMPEG_ENV) {
            config.ffmpeg = PathBuf::from(ffmpeg);
        }
        if let Some(ffprobe) = env::var_os(FFPROBE_ENV) {
            config.ffprobe = PathBuf::from(ffprobe);
        }
        config
    }

    pub fn ffmpeg(mut self, ffmpeg: PathBuf) -> Self {
        self.ffmpeg = ffmpeg;
        self
    }

    pub fn ffprobe(mut self, ffprobe: PathBuf) -> Self {
        self.ffprobe = ffprobe;
        self
    }

    /// Pass-log base beside the output file, `<dir>/ffmpeg2pass-<output stem>`.
    /// Sessions writing into one directory get disjoint sidecars.
    pub fn passlog_base(&self, output: &Path) -> PathBuf {
        let mut name = OsString::from(&self.passlog_name);
        if let Some(stem) = output.file_stem() {
            name.push("-");
            name.push(stem);
        }
        match output.parent() {
            Some(dir) => dir.join(name),
            None => PathBuf::from(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passlog_base() {
        let config = EncoderConfig::default();
        assert_eq!(config.passlog_base(Path::new("/videos/out.mp4")), PathBuf::from("/videos/ffmpeg2pass-out"));
        assert_eq!(config.passlog_base(Path::new("out.mp4")), PathBuf::from("ffmpeg2pass-out"));
        assert_ne!(config.passlog_base(Path::new("/videos/a.mp4")), config.passlog_base(Path::new("/videos/b.mp4")));
    }

    #[test]
    fn test_defaults() {
        let config = EncoderConfig::default();
        assert_eq!(config.chunk_size, 256);
        assert_eq!(config.tail_len, 500);
    }
}
