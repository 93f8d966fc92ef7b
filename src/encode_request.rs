use std::path::PathBuf;

use crate::{
    audio::AudioPolicy,
    codecs::VideoCodec,
    containers::Container,
    preset::Preset,
    resolution::TargetResolution,
};

#[derive(Clone, Debug, PartialEq)]
pub struct EncodeRequest {
    pub input: PathBuf,
    pub output: PathBuf,
    pub target_mb: f64,
    pub codec: VideoCodec,
    pub audio: AudioPolicy,
    pub preset: Preset,
    pub resolution: TargetResolution,
    pub container: Container,
}

impl EncodeRequest {
    pub fn new(input: PathBuf, output: PathBuf, target_mb: f64) -> Self {
        EncodeRequest {
            input,
            output,
            target_mb,
            codec: VideoCodec::default(),
            audio: AudioPolicy::default(),
            preset: Preset::default(),
            resolution: TargetResolution::default(),
            container: Container::default(),
        }
    }

    pub fn codec(mut self, codec: VideoCodec) -> Self {
        self.codec = codec;
        self
    }

    pub fn audio(mut self, audio: AudioPolicy) -> Self {
        self.audio = audio;
        self
    }

    pub fn preset(mut self, preset: Preset) -> Self {
        self.preset = preset;
        self
    }

    pub fn resolution(mut self, resolution: TargetResolution) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn container(mut self, container: Container) -> Self {
        self.container = container;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let request = EncodeRequest::new(PathBuf::from("in.mkv"), PathBuf::from("out.mp4"), 25.0);
        assert_eq!(request.codec, VideoCodec::H264);
        assert_eq!(request.preset, Preset::Medium);
        assert_eq!(request.resolution, TargetResolution::Original);
        assert_eq!(request.container, Container::MP4);
    }

    #[test]
    fn test_configure() {
        let request = EncodeRequest::new(PathBuf::from("in.mkv"), PathBuf::from("out.webm"), 8.0)
            .codec(VideoCodec::VP9)
            .audio(AudioPolicy::None)
            .preset(Preset::Slow)
            .resolution(TargetResolution::Height(720))
            .container(Container::WebM);
        assert_eq!(request.codec, VideoCodec::VP9);
        assert_eq!(request.audio, AudioPolicy::None);
        assert_eq!(request.preset, Preset::Slow);
        assert_eq!(request.resolution, TargetResolution::Height(720));
        assert_eq!(request.container, Container::WebM);
    }
}
