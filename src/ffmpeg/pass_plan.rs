use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use crate::codecs::CodecFamily;
use crate::config::EncoderConfig;
use crate::encode_request::EncodeRequest;
use crate::planner::BitratePlan;
use super::pass_factories::{PassContext, PassFactory, constrained::ConstrainedPassFactory, single_shot::SingleShotPassFactory, two_pass::TwoPassFactory};

/// Files ffmpeg may leave behind for a given `-passlogfile` base.
pub const PASSLOG_SUFFIXES: [&str; 5] = ["", "-0.log", "-0.log.mbtree", ".log", ".log.mbtree"];

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PassSink {
    Output(PathBuf),
    Discard(PathBuf),
}

impl PassSink {
    pub fn path(&self) -> &Path {
        match self {
            PassSink::Output(path) | PassSink::Discard(path) => path,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PassDescriptor {
    /// 1-based.
    pub index: usize,
    pub total: usize,
    pub args: Vec<OsString>,
    pub sink: PassSink,
    pub sidecars: Vec<PathBuf>,
}

impl PassDescriptor {
    pub fn writes_output(&self) -> bool {
        matches!(self.sink, PassSink::Output(_))
    }

    pub fn command_line(&self, program: &Path) -> String {
        let name = program.file_name().unwrap_or(program.as_os_str());
        let mut line = name.to_string_lossy().into_owned();
        for arg in &self.args {
            line.push(' ');
            line.push_str(&arg.to_string_lossy());
        }
        line
    }
}

pub fn create_pass_factory(family: CodecFamily) -> Box<dyn PassFactory> {
    match family {
        CodecFamily::TwoPassBitrate => Box::new(TwoPassFactory {}),
        CodecFamily::ConstrainedRateAnalysis => Box::new(ConstrainedPassFactory {}),
        CodecFamily::SingleShotTargetRate => Box::new(SingleShotPassFactory {}),
    }
}

/// Computes the ordered passes for `request`. Pure: touches no files.
pub fn build(
    family: CodecFamily,
    plan: &BitratePlan,
    request: &EncodeRequest,
    config: &EncoderConfig,
) -> Vec<PassDescriptor> {
    let context = PassContext {
        request,
        plan,
        passlog: config.passlog_base(&request.output),
        null_sink: config.null_sink.clone(),
    };
    let mut passes = create_pass_factory(family).passes(&context);
    let total = passes.len();
    for (i, pass) in passes.iter_mut().enumerate() {
        pass.index = i + 1;
        pass.total = total;
    }
    passes
}

pub fn passlog_sidecars(base: &Path) -> Vec<PathBuf> {
    PASSLOG_SUFFIXES
        .iter()
        .map(|suffix| {
            let mut path = base.as_os_str().to_os_string();
            path.push(suffix);
            PathBuf::from(path)
        })
        .collect()
}

pub(super) fn os(s: impl AsRef<OsStr>) -> OsString {
    s.as_ref().to_os_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{AudioCodec, AudioPolicy};
    use crate::codecs::VideoCodec;
    use crate::containers::Container;
    use crate::preset::Preset;
    use crate::resolution::TargetResolution;

    fn request(codec: VideoCodec) -> EncodeRequest {
        EncodeRequest::new(PathBuf::from("/in/source.mkv"), PathBuf::from("/out/small.mp4"), 25.0)
            .codec(codec)
            .audio(AudioPolicy::Encode { codec: AudioCodec::Aac, kbps: 128 })
            .preset(Preset::Slow)
    }

    fn config() -> EncoderConfig {
        EncoderConfig {
            null_sink: PathBuf::from("/dev/null"),
            ..EncoderConfig::default()
        }
    }

    const PLAN: BitratePlan = BitratePlan { video_kbps: 221, audio_kbps: 128 };

    fn strings(args: &[OsString]) -> Vec<String> {
        args.iter().map(|a| a.to_string_lossy().into_owned()).collect()
    }

    #[test]
    fn test_two_pass_bitrate() {
        let request = request(VideoCodec::H264);
        let passes = build(CodecFamily::TwoPassBitrate, &PLAN, &request, &config());
        assert_eq!(passes.len(), 2);

        let first = &passes[0];
        assert_eq!((first.index, first.total), (1, 2));
        assert_eq!(first.sink, PassSink::Discard(PathBuf::from("/dev/null")));
        assert_eq!(strings(&first.args), vec![
            "-y", "-hide_banner", "-i", "/in/source.mkv",
            "-c:v", "libx264", "-b:v", "221k",
            "-preset", "slow",
            "-pass", "1", "-passlogfile", "/out/ffmpeg2pass-small",
            "-an", "-f", "null", "/dev/null",
        ]);
        assert!(first.sidecars.contains(&PathBuf::from("/out/ffmpeg2pass-small-0.log")));
        assert!(first.sidecars.contains(&PathBuf::from("/out/ffmpeg2pass-small-0.log.mbtree")));
        assert!(first.sidecars.contains(&PathBuf::from("/out/ffmpeg2pass-small")));

        let second = &passes[1];
        assert_eq!((second.index, second.total), (2, 2));
        assert_eq!(second.sink, PassSink::Output(PathBuf::from("/out/small.mp4")));
        assert!(second.sidecars.is_empty());
        assert_eq!(strings(&second.args), vec![
            "-y", "-hide_banner", "-i", "/in/source.mkv",
            "-c:v", "libx264", "-b:v", "221k",
            "-preset", "slow",
            "-pass", "2", "-passlogfile", "/out/ffmpeg2pass-small",
            "-c:a", "aac", "-b:a", "128k",
            "-movflags", "+faststart", "-f", "mp4",
            "/out/small.mp4",
        ]);
    }

    #[test]
    fn test_constrained_rate_analysis() {
        let request = request(VideoCodec::VP9).container(Container::WebM).audio(AudioPolicy::Copy);
        let passes = build(CodecFamily::ConstrainedRateAnalysis, &PLAN, &request, &config());
        assert_eq!(passes.len(), 2);

        let first = strings(&passes[0].args);
        assert!(first.windows(2).any(|w| w == ["-speed", "4"]));
        assert!(first.ends_with(&[String::from("-an"), String::from("-f"), String::from("webm"), String::from("/dev/null")]));
        assert!(!first.contains(&String::from("-preset")));

        let second = strings(&passes[1].args);
        assert!(second.windows(2).any(|w| w == ["-speed", "2"]));
        assert!(second.windows(2).any(|w| w == ["-c:a", "copy"]));
        assert_eq!(second.last().unwrap(), "/out/small.mp4");
    }

    #[test]
    fn test_single_shot_target_rate() {
        let request = request(VideoCodec::AV1).audio(AudioPolicy::None);
        let passes = build(CodecFamily::SingleShotTargetRate, &PLAN, &request, &config());
        assert_eq!(passes.len(), 1);

        let only = &passes[0];
        assert_eq!((only.index, only.total), (1, 1));
        assert!(only.writes_output());
        assert!(only.sidecars.is_empty());
        let args = strings(&only.args);
        assert!(args.windows(2).any(|w| w == ["-c:v", "libsvtav1"]));
        assert!(args.windows(2).any(|w| w == ["-svtav1-params", "tbr=221"]));
        assert!(args.windows(2).any(|w| w == ["-preset", "5"]));
        assert!(args.contains(&String::from("-an")));
        assert!(!args.contains(&String::from("-pass")));
    }

    #[test]
    fn test_scale_filter_in_every_pass() {
        let request = request(VideoCodec::HEVC).resolution(TargetResolution::Height(720));
        for pass in build(CodecFamily::TwoPassBitrate, &PLAN, &request, &config()) {
            let args = strings(&pass.args);
            assert!(args.windows(2).any(|w| w == ["-vf", "scale=-2:720"]));
        }

        let request = request.resolution(TargetResolution::Original);
        for pass in build(CodecFamily::TwoPassBitrate, &PLAN, &request, &config()) {
            assert!(!strings(&pass.args).contains(&String::from("-vf")));
        }
    }

    #[test]
    fn test_build_is_deterministic() {
        for codec in [VideoCodec::H264, VideoCodec::HEVC, VideoCodec::VP9, VideoCodec::AV1] {
            let request = request(codec).resolution(TargetResolution::Height(480));
            let first = build(codec.family(), &PLAN, &request, &config());
            let second = build(codec.family(), &PLAN, &request, &config());
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_sidecars_are_per_output() {
        let a = EncodeRequest::new(PathBuf::from("/v/in.mkv"), PathBuf::from("/v/a.mp4"), 25.0);
        let b = EncodeRequest::new(PathBuf::from("/v/in.mkv"), PathBuf::from("/v/b.mp4"), 25.0);
        let sidecars = |request: &EncodeRequest| -> Vec<PathBuf> {
            build(CodecFamily::TwoPassBitrate, &PLAN, request, &config())
                .into_iter()
                .flat_map(|p| p.sidecars)
                .collect()
        };
        let (a, b) = (sidecars(&a), sidecars(&b));
        assert!(!a.is_empty());
        assert!(a.iter().all(|path| !b.contains(path)));
        assert!(a.contains(&PathBuf::from("/v/ffmpeg2pass-a-0.log")));
    }

    #[test]
    fn test_command_line() {
        let passes = build(CodecFamily::SingleShotTargetRate, &PLAN, &request(VideoCodec::AV1), &config());
        let line = passes[0].command_line(Path::new("/usr/bin/ffmpeg"));
        assert!(line.starts_with("ffmpeg -y -hide_banner -i /in/source.mkv"));
        assert!(line.ends_with("/out/small.mp4"));
    }
}
