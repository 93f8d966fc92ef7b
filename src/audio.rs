#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AudioCodec {
    Aac,
    Opus,
}

impl AudioCodec {
    pub fn ca_parameter(&self) -> &'static str {
        match self {
            AudioCodec::Aac => "aac",
            AudioCodec::Opus => "libopus",
        }
    }
}

/// What happens to the source audio.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AudioPolicy {
    Encode { codec: AudioCodec, kbps: u32 },
    Copy,
    None,
}

impl Default for AudioPolicy {
    fn default() -> Self {
        AudioPolicy::Encode { codec: AudioCodec::Aac, kbps: 128 }
    }
}

impl AudioPolicy {
    pub fn from_str(s: &str, kbps: u32) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "aac" => Some(AudioPolicy::Encode { codec: AudioCodec::Aac, kbps }),
            "opus" | "libopus" => Some(AudioPolicy::Encode { codec: AudioCodec::Opus, kbps }),
            "copy" => Some(AudioPolicy::Copy),
            "none" | "an" => Some(AudioPolicy::None),
            _ => None,
        }
    }

    pub fn parameters(&self) -> Vec<String> {
        match self {
            AudioPolicy::Encode { codec, kbps } => vec![
                String::from("-c:a"), String::from(codec.ca_parameter()),
                String::from("-b:a"), format!("{}k", kbps),
            ],
            AudioPolicy::Copy => vec![String::from("-c:a"), String::from("copy")],
            AudioPolicy::None => vec![String::from("-an")],
        }
    }
}
