use crate::audio::AudioPolicy;
use crate::error::{EncodeError, Result};
use crate::probe::DEFAULT_AUDIO_KBPS;

pub const MIN_VIDEO_KBPS: u64 = 50;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BitratePlan {
    pub video_kbps: u64,
    pub audio_kbps: u32,
}

/// Splits the bit budget implied by `target_mb` over `duration_s` between
/// audio and video.
pub fn plan(
    target_mb: f64,
    duration_s: f64,
    audio: &AudioPolicy,
    source_audio_kbps: Option<u32>,
) -> Result<BitratePlan> {
    if !(duration_s > 0.0) {
        return Err(EncodeError::InvalidDuration(duration_s));
    }

    let audio_kbps = match audio {
        AudioPolicy::None => 0,
        AudioPolicy::Encode { kbps, .. } => *kbps,
        AudioPolicy::Copy => source_audio_kbps.unwrap_or(DEFAULT_AUDIO_KBPS),
    };

    let target_bits = target_mb * 8.0 * 1024.0 * 1024.0;
    let audio_bits = audio_kbps as f64 * 1000.0 * duration_s;
    let video_bits = target_bits - audio_bits;
    if !(video_bits > 0.0) {
        return Err(EncodeError::InsufficientBudget {
            target_bits: target_bits.max(0.0) as u64,
            audio_bits: audio_bits as u64,
            audio_kbps,
        });
    }

    let video_kbps = (video_bits / duration_s / 1000.0).floor() as u64;
    if video_kbps < MIN_VIDEO_KBPS {
        return Err(EncodeError::BitrateTooLow { video_kbps });
    }

    Ok(BitratePlan { video_kbps, audio_kbps })
}
