use std::fmt::Display;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use human_repr::{HumanCount, HumanDuration};
use log::debug;
use serde::Deserialize;

use crate::error::{EncodeError, Result};

/// Audio bitrate assumed when a stream doesn't report one.
pub const DEFAULT_AUDIO_KBPS: u32 = 128;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StreamKind {
    Video,
    Audio,
    Other,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameRate {
    pub num: u32,
    pub den: u32,
}

impl FrameRate {
    pub fn parse(s: &str) -> Option<Self> {
        let (num, den) = s.split_once('/')?;
        let num = num.trim().parse().ok()?;
        let den = den.trim().parse().ok()?;
        match den {
            0 => None,
            _ => Some(FrameRate { num, den }),
        }
    }

    pub fn as_f64(&self) -> f64 {
        self.num as f64 / self.den as f64
    }
}

impl Display for FrameRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1}", self.as_f64())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct StreamInfo {
    pub kind: StreamKind,
    pub codec: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub frame_rate: Option<FrameRate>,
    /// Bits per second.
    pub bitrate: Option<u64>,
    pub channels: Option<u32>,
    pub sample_rate: Option<u32>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MediaInfo {
    pub duration: f64,
    pub bitrate: Option<u64>,
    pub streams: Vec<StreamInfo>,
}

impl MediaInfo {
    pub fn first_stream(&self, kind: StreamKind) -> Option<&StreamInfo> {
        self.streams.iter().find(|s| s.kind == kind)
    }

    /// Bitrate of the first audio stream, if it reports one.
    pub fn audio_bitrate_kbps(&self) -> Option<u32> {
        self.first_stream(StreamKind::Audio)
            .and_then(|s| s.bitrate)
            .and_then(|bps| u32::try_from(bps / 1000).ok())
    }

    pub fn summary(&self, file_size: Option<u64>) -> String {
        let mut parts = vec![];
        if let Some(size) = file_size {
            parts.push(format!("Size: {}", size.human_count_bytes()));
        }
        parts.push(format!("Duration: {}", self.duration.human_duration()));
        if let Some(video) = self.first_stream(StreamKind::Video) {
            parts.push(format!("Video: {}x{} {} {} fps",
                or_unknown(video.width),
                or_unknown(video.height),
                video.codec.as_deref().unwrap_or("?"),
                or_unknown(video.frame_rate)));
        }
        if let Some(audio) = self.first_stream(StreamKind::Audio) {
            parts.push(format!("Audio: {} {} Hz {}ch",
                audio.codec.as_deref().unwrap_or("?"),
                or_unknown(audio.sample_rate),
                or_unknown(audio.channels)));
        }
        if let Some(bitrate) = self.bitrate {
            parts.push(format!("Bitrate: {} kbps", bitrate / 1000));
        }
        parts.join(" | ")
    }
}

fn or_unknown<T: Display>(value: Option<T>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => String::from("?"),
    }
}

pub trait MediaProber {
    fn probe(&self, path: &Path) -> Result<MediaInfo>;
}

pub struct FFprobe {
    program: PathBuf,
}

impl FFprobe {
    pub fn new(program: PathBuf) -> Self {
        FFprobe { program }
    }
}

impl MediaProber for FFprobe {
    fn probe(&self, path: &Path) -> Result<MediaInfo> {
        debug!("probing {:?} with {:?}", path, self.program);
        let output = Command::new(&self.program)
            .args(["-v", "quiet", "-print_format", "json", "-show_format", "-show_streams"])
            .arg(path)
            .stdin(Stdio::null())
            .output()
            .map_err(|err| match err.kind() {
                io::ErrorKind::NotFound => EncodeError::ToolNotFound(self.program.clone()),
                _ => probe_failed(path, &format!("could not run ffprobe: {}", err)),
            })?;
        if !output.status.success() {
            return Err(probe_failed(path, "ffprobe did not exit successfully."));
        }
        let utf8 = String::from_utf8_lossy(&output.stdout);
        parse_probe_output(path, &utf8)
    }
}

#[derive(Deserialize, Debug)]
struct FFProbeJsonOutput {
    #[serde(default)]
    pub streams: Vec<FFProbeJsonStream>,
    pub format: Option<FFProbeJsonFormat>,
}

#[derive(Deserialize, Debug)]
struct FFProbeJsonFormat {
    pub duration: Option<String>,
    pub bit_rate: Option<String>,
}

#[derive(Deserialize, Debug)]
struct FFProbeJsonStream {
    pub codec_type: Option<String>,
    pub codec_name: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub r_frame_rate: Option<String>,
    pub bit_rate: Option<String>,
    pub channels: Option<u32>,
    pub sample_rate: Option<String>,
}

impl From<FFProbeJsonStream> for StreamInfo {
    fn from(stream: FFProbeJsonStream) -> Self {
        StreamInfo {
            kind: match stream.codec_type.as_deref() {
                Some("video") => StreamKind::Video,
                Some("audio") => StreamKind::Audio,
                _ => StreamKind::Other,
            },
            codec: stream.codec_name,
            width: stream.width,
            height: stream.height,
            frame_rate: stream.r_frame_rate.as_deref().and_then(FrameRate::parse),
            bitrate: stream.bit_rate.and_then(|b| b.parse().ok()),
            channels: stream.channels,
            sample_rate: stream.sample_rate.and_then(|r| r.parse().ok()),
        }
    }
}

pub fn parse_probe_output(path: &Path, json: &str) -> Result<MediaInfo> {
    let deserialized = serde_json::from_str::<FFProbeJsonOutput>(json)
        .map_err(|err| probe_failed(path, &format!("invalid ffprobe output: {}", err)))?;
    let format = deserialized.format
        .ok_or_else(|| probe_failed(path, "ffprobe reported no format section."))?;
    let duration: f64 = format.duration
        .as_deref()
        .and_then(|d| d.trim().parse().ok())
        .ok_or_else(|| probe_failed(path, "could not determine duration."))?;
    if !(duration > 0.0) {
        return Err(EncodeError::InvalidDuration(duration));
    }

    Ok(MediaInfo {
        duration,
        bitrate: format.bit_rate.and_then(|b| b.parse().ok()),
        streams: deserialized.streams.into_iter().map(StreamInfo::from).collect(),
    })
}

fn probe_failed(path: &Path, reason: &str) -> EncodeError {
    EncodeError::ProbeFailed {
        path: PathBuf::from(path),
        reason: String::from(reason),
    }
}
