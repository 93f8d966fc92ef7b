use std::fmt::Display;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetResolution {
    Original,
    Height(u32),
}

impl Default for TargetResolution {
    fn default() -> Self {
        TargetResolution::Original
    }
}

impl TargetResolution {
    /// Accepts "original"/"source" or a height label such as "720p" or "720".
    pub fn from_str(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        match s.as_str() {
            "original" | "source" | "" => Some(TargetResolution::Original),
            _ => match s.trim_end_matches('p').parse::<u32>() {
                Ok(0) | Err(_) => None,
                Ok(height) => Some(TargetResolution::Height(height)),
            },
        }
    }

    /// Fixes the height; `-2` makes the scaler pick the aspect-preserving width
    /// rounded to an even value.
    pub fn scale_filter(&self) -> Option<String> {
        match self {
            TargetResolution::Original => None,
            TargetResolution::Height(height) => Some(format!("scale=-2:{}", height)),
        }
    }
}

impl Display for TargetResolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetResolution::Original => write!(f, "original"),
            TargetResolution::Height(height) => write!(f, "{}p", height),
        }
    }
}
