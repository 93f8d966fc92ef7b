pub mod audio;
pub mod cancel;
pub mod codecs;
pub mod config;
pub mod containers;
pub mod encode_request;
pub mod error;
pub mod events;
pub mod ffmpeg;
pub mod fstools;
pub mod planner;
pub mod preset;
pub mod probe;
pub mod report;
pub mod resolution;
pub mod session;

use std::path::PathBuf;
use std::process::ExitCode;

use kdam::{term, tqdm, BarExt};
use log::{error, warn, Level};
use rustop::opts;

use audio::AudioPolicy;
use codecs::VideoCodec;
use config::EncoderConfig;
use containers::Container;
use encode_request::EncodeRequest;
use events::{EncodeEvent, LogLine};
use ffmpeg::FFmpeg;
use fstools::{classify_file, generate_output_filename, DirEntryCategory};
use preset::Preset;
use probe::FFprobe;
use resolution::TargetResolution;
use session::{EncodeSession, SessionOutcome, SessionState};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let (args, _rest) = opts! {
        synopsis "Compress a video to a target file size with two-pass ffmpeg encoding.";
        opt size:f64=25.0, desc:"Target output size in megabytes.";
        opt codec:String=String::from("h264"), desc:"Video codec. [h264, hevc, vp9, av1]";
        opt audio:String=String::from("aac"), desc:"Audio handling. [aac, opus, copy, none]";
        opt audio_bitrate:u32=128, desc:"Audio bitrate in kbps when encoding audio.";
        opt preset:String=String::from("medium"), desc:"Encoder preset. [ultrafast .. veryslow]";
        opt resolution:String=String::from("original"), desc:"Output height. [original, 2160p, 1440p, 1080p, 720p, 480p, 360p]";
        opt format:String=String::from("mp4"), desc:"Output container. [mp4, mkv, webm]";
        param infile:String, desc:"Input file";
        param outfile:Option<String>, desc:"Output file (default: <input>_compressed.<format>)";
    }.parse_or_exit();

    let Some(codec) = VideoCodec::from_str(&args.codec) else {
        error!("Unsupported video codec: {}.", args.codec);
        return ExitCode::FAILURE;
    };
    let Some(audio) = AudioPolicy::from_str(&args.audio, args.audio_bitrate) else {
        error!("Unsupported audio mode: {}.", args.audio);
        return ExitCode::FAILURE;
    };
    let Some(preset) = Preset::from_str(&args.preset) else {
        error!("Unknown preset: {}.", args.preset);
        return ExitCode::FAILURE;
    };
    let Some(resolution) = TargetResolution::from_str(&args.resolution) else {
        error!("Unknown resolution: {}.", args.resolution);
        return ExitCode::FAILURE;
    };
    let Some(container) = Container::from_str(&args.format) else {
        error!("Unsupported output format: {}.", args.format);
        return ExitCode::FAILURE;
    };

    let config = EncoderConfig::from_env();
    if let Err(err) = FFmpeg::new(config.ffmpeg.clone()).ensure_installed() {
        error!("{}", err);
        return ExitCode::FAILURE;
    }

    let input = PathBuf::from(&args.infile);
    match classify_file(&input) {
        DirEntryCategory::RegularFile => (),
        DirEntryCategory::DoesNotExist => {
            error!("{:?} does not exist.", input);
            return ExitCode::FAILURE;
        },
        DirEntryCategory::Directory => {
            error!("{:?} is a directory.", input);
            return ExitCode::FAILURE;
        },
        DirEntryCategory::SymbolicLink | DirEntryCategory::Unknown => {
            error!("{:?} is not a regular file.", input);
            return ExitCode::FAILURE;
        },
    }
    let output = match &args.outfile {
        Some(outfile) => PathBuf::from(outfile),
        None => generate_output_filename(&input, container),
    };

    let request = EncodeRequest::new(input, output.clone(), args.size)
        .codec(codec)
        .audio(audio)
        .preset(preset)
        .resolution(resolution)
        .container(container);
    let prober = FFprobe::new(config.ffprobe.clone());
    let handle = EncodeSession::new(request, config, prober).spawn();
    if let Err(err) = handle.cancel.cancel_on_interrupt() {
        warn!("Ctrl-C will not cancel cleanly: {}", err);
    }

    term::init(false);
    let mut pbar = tqdm!(
        total = 100,
        desc = "waiting",
        position = 0,
        force_refresh = true
    );
    let mut finished = false;
    for event in handle.events.iter() {
        match event {
            EncodeEvent::State(state @ SessionState::Encoding { .. }) => {
                pbar.reset(Some(100));
                pbar.set_description(state.to_string());
            },
            EncodeEvent::State(state) if state.is_terminal() => {
                let _ = pbar.refresh();
                eprintln!();
                finished = true;
            },
            EncodeEvent::Log(line) if !finished => {
                let _ = pbar.write(bar_line(line));
            },
            EncodeEvent::Progress(progress) => {
                let _ = pbar.update_to(progress.percent as usize);
            },
            _ => (),
        }
    }

    match handle.join() {
        Ok(record) => match record.outcome {
            SessionOutcome::Completed(report) => {
                println!("{}\n{}", output.display(), report);
                ExitCode::SUCCESS
            },
            SessionOutcome::Cancelled => {
                println!("Cancelled.");
                ExitCode::FAILURE
            },
            SessionOutcome::Failed(err) => {
                println!("Failure -__-\n{}", err);
                ExitCode::FAILURE
            },
        },
        Err(_) => {
            error!("encode session panicked");
            ExitCode::FAILURE
        },
    }
}

/// Text written above the progress bar for a session log line.
fn bar_line(line: LogLine) -> String {
    match line.level {
        Level::Warn | Level::Error => format!("warning: {}", line.text),
        _ => line.text,
    }
}
