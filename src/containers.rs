#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Container {
    MP4,
    Matroska,
    WebM,
}

impl ToString for Container {
    fn to_string(&self) -> String {
        match self {
            Container::MP4 => String::from("mp4"),
            Container::Matroska => String::from("matroska"),
            Container::WebM => String::from("webm"),
        }
    }
}

impl Default for Container {
    fn default() -> Self {
        Container::MP4
    }
}

impl Container {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim_start_matches('.').to_lowercase().as_str() {
            "mp4" | "m4v" => Some(Container::MP4),
            "mkv" | "matroska" => Some(Container::Matroska),
            "webm" => Some(Container::WebM),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Container::MP4 => "mp4",
            Container::Matroska => "mkv",
            Container::WebM => "webm",
        }
    }

    pub fn parameters(&self) -> Vec<String> {
        match self {
            Container::MP4 => vec![
                String::from("-movflags"),
                String::from("+faststart"),
                String::from("-f"),
                self.to_string(),
            ],
            Container::Matroska | Container::WebM => vec![
                String::from("-f"),
                self.to_string(),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_string() {
        assert_eq!(Container::Matroska.to_string(), String::from("matroska"));
        assert_eq!(Container::MP4.to_string(), String::from("mp4"));
        assert_eq!(Container::WebM.to_string(), String::from("webm"));
    }

    #[test]
    fn test_from_str() {
        assert_eq!(Container::from_str(".mkv"), Some(Container::Matroska));
        assert_eq!(Container::from_str("WEBM"), Some(Container::WebM));
        assert_eq!(Container::from_str("avi"), None);
    }

    #[test]
    fn test_parameters() {
        assert_eq!(Container::MP4.parameters(), vec!["-movflags", "+faststart", "-f", "mp4"]);
        assert_eq!(Container::Matroska.parameters(), vec!["-f", "matroska"]);
    }
}
