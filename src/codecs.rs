use std::fmt::Display;

/// Pass structure shared by a group of encoders.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CodecFamily {
    /// Analysis pass to a discard sink, then a bitrate-targeted final pass.
    TwoPassBitrate,
    /// Two passes with different speed settings per pass.
    ConstrainedRateAnalysis,
    /// One pass with the target rate embedded in encoder tuning parameters.
    SingleShotTargetRate,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VideoCodec {
    H264,
    HEVC,
    VP9,
    AV1,
}

impl VideoCodec {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "h264" | "x264" | "avc" => Some(VideoCodec::H264),
            "hevc" | "h265" | "x265" => Some(VideoCodec::HEVC),
            "vp9" => Some(VideoCodec::VP9),
            "av1" => Some(VideoCodec::AV1),
            _ => None,
        }
    }

    pub fn cv_parameter(&self) -> &'static str {
        match self {
            VideoCodec::H264 => "libx264",
            VideoCodec::HEVC => "libx265",
            VideoCodec::VP9 => "libvpx-vp9",
            VideoCodec::AV1 => "libsvtav1",
        }
    }

    pub fn family(&self) -> CodecFamily {
        match self {
            VideoCodec::H264 | VideoCodec::HEVC => CodecFamily::TwoPassBitrate,
            VideoCodec::VP9 => CodecFamily::ConstrainedRateAnalysis,
            VideoCodec::AV1 => CodecFamily::SingleShotTargetRate,
        }
    }
}

impl Default for VideoCodec {
    fn default() -> Self {
        VideoCodec::H264
    }
}

impl Display for VideoCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", format!("{:?}", self).to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", VideoCodec::AV1), "av1");
        assert_eq!(format!("{}", VideoCodec::HEVC), "hevc");
        assert_eq!(format!("{}", VideoCodec::H264), "h264");
        assert_eq!(format!("{}", VideoCodec::VP9), "vp9");
    }

    #[test]
    fn test_from_str() {
        assert_eq!(VideoCodec::from_str("H265"), Some(VideoCodec::HEVC));
        assert_eq!(VideoCodec::from_str("vp9"), Some(VideoCodec::VP9));
        assert_eq!(VideoCodec::from_str("mpeg2"), None);
    }

    #[test]
    fn test_family() {
        assert_eq!(VideoCodec::H264.family(), CodecFamily::TwoPassBitrate);
        assert_eq!(VideoCodec::HEVC.family(), CodecFamily::TwoPassBitrate);
        assert_eq!(VideoCodec::VP9.family(), CodecFamily::ConstrainedRateAnalysis);
        assert_eq!(VideoCodec::AV1.family(), CodecFamily::SingleShotTargetRate);
    }
}
