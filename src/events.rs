use log::Level;

use crate::session::SessionState;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProgressEvent {
    pub pass: usize,
    pub total_passes: usize,
    /// 0..=100, never decreasing within a pass.
    pub percent: u8,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogLine {
    pub level: Level,
    pub text: String,
}

impl LogLine {
    pub fn info(text: impl Into<String>) -> Self {
        LogLine { level: Level::Info, text: text.into() }
    }

    pub fn warn(text: impl Into<String>) -> Self {
        LogLine { level: Level::Warn, text: text.into() }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum EncodeEvent {
    State(SessionState),
    Progress(ProgressEvent),
    Log(LogLine),
}
