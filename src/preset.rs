#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Preset {
    Ultrafast,
    Superfast,
    Veryfast,
    Faster,
    Fast,
    Medium,
    Slow,
    Slower,
    Veryslow,
}

impl Default for Preset {
    fn default() -> Self {
        Preset::Medium
    }
}

impl Preset {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "ultrafast" => Some(Preset::Ultrafast),
            "superfast" => Some(Preset::Superfast),
            "veryfast" => Some(Preset::Veryfast),
            "faster" => Some(Preset::Faster),
            "fast" => Some(Preset::Fast),
            "medium" => Some(Preset::Medium),
            "slow" => Some(Preset::Slow),
            "slower" => Some(Preset::Slower),
            "veryslow" => Some(Preset::Veryslow),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Preset::Ultrafast => "ultrafast",
            Preset::Superfast => "superfast",
            Preset::Veryfast => "veryfast",
            Preset::Faster => "faster",
            Preset::Fast => "fast",
            Preset::Medium => "medium",
            Preset::Slow => "slow",
            Preset::Slower => "slower",
            Preset::Veryslow => "veryslow",
        }
    }

    /// SVT-AV1 presets run from 0 (slowest) to 13; the x264 labels map onto 2..=12.
    pub fn svtav1_preset(&self) -> u8 {
        match self {
            Preset::Ultrafast => 12,
            Preset::Superfast => 11,
            Preset::Veryfast => 10,
            Preset::Faster => 9,
            Preset::Fast => 8,
            Preset::Medium => 6,
            Preset::Slow => 5,
            Preset::Slower => 4,
            Preset::Veryslow => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_round_trips_label() {
        for label in ["ultrafast", "superfast", "veryfast", "faster", "fast", "medium", "slow", "slower", "veryslow"] {
            assert_eq!(Preset::from_str(label).unwrap().label(), label);
        }
        assert_eq!(Preset::from_str("placebo"), None);
    }

    #[test]
    fn test_svtav1_preset_slows_down() {
        assert!(Preset::Veryslow.svtav1_preset() < Preset::Medium.svtav1_preset());
        assert!(Preset::Medium.svtav1_preset() < Preset::Ultrafast.svtav1_preset());
    }
}
