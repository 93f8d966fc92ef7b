use std::collections::VecDeque;
use std::sync::LazyLock;

use regex::Regex;

static TIMESTAMP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"time=\s*(\d+):(\d{2}):(\d{2})\.(\d+)").expect("timestamp pattern is valid")
});

const ERROR_KEYWORDS: [&str; 4] = ["error", "invalid", "failed", "unknown"];

#[derive(Debug, PartialEq)]
pub struct DiagnosticLine {
    pub text: String,
    pub percent: Option<u8>,
    pub is_error: bool,
}

/// Reassembles ffmpeg's stderr into lines. The stats line is rewritten in
/// place with `\r`, so chunks are split on `\r` and the unterminated tail is
/// carried into the next chunk.
pub struct DiagnosticParser {
    pending: Vec<u8>,
    duration: f64,
    last_percent: u8,
}

impl DiagnosticParser {
    pub fn new(duration: f64) -> Self {
        DiagnosticParser {
            pending: Vec::new(),
            duration,
            last_percent: 0,
        }
    }

    pub fn last_percent(&self) -> u8 {
        self.last_percent
    }

    pub fn feed(&mut self, chunk: &[u8]) -> Vec<DiagnosticLine> {
        self.pending.extend_from_slice(chunk);
        let mut lines = vec![];
        while let Some(pos) = self.pending.iter().position(|b| *b == b'\r') {
            let segment: Vec<u8> = self.pending.drain(..=pos).collect();
            self.parse_segment(&segment[..pos], &mut lines);
        }
        lines
    }

    /// Flushes whatever is left once the stream has ended.
    pub fn finish(&mut self) -> Vec<DiagnosticLine> {
        let rest = std::mem::take(&mut self.pending);
        let mut lines = vec![];
        self.parse_segment(&rest, &mut lines);
        lines
    }

    fn parse_segment(&mut self, segment: &[u8], lines: &mut Vec<DiagnosticLine>) {
        let text = String::from_utf8_lossy(segment);
        for line in text.split('\n').map(str::trim).filter(|l| !l.is_empty()) {
            let percent = self.percent_for(line);
            lines.push(DiagnosticLine {
                text: String::from(line),
                percent,
                is_error: is_error_line(line),
            });
        }
    }

    fn percent_for(&mut self, line: &str) -> Option<u8> {
        let elapsed = parse_timestamp(line)?;
        let percent = percent_complete(elapsed, self.duration).max(self.last_percent);
        self.last_percent = percent;
        Some(percent)
    }
}

/// Whole seconds of the `time=H:MM:SS.ff` stamp in `line`.
pub fn parse_timestamp(line: &str) -> Option<u64> {
    let caps = TIMESTAMP.captures(line)?;
    let hours: u64 = caps[1].parse().ok()?;
    let minutes: u64 = caps[2].parse().ok()?;
    let seconds: u64 = caps[3].parse().ok()?;
    Some(hours * 3600 + minutes * 60 + seconds)
}

pub fn percent_complete(elapsed: u64, duration: f64) -> u8 {
    match duration > 0.0 {
        true => (elapsed as f64 / duration * 100.0).floor().min(100.0) as u8,
        false => 0,
    }
}

pub fn is_error_line(line: &str) -> bool {
    let lower = line.to_lowercase();
    ERROR_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

/// Last `limit` characters of the diagnostic stream, for failure reports.
pub struct DiagnosticTail {
    bytes: VecDeque<u8>,
    limit: usize,
}

impl DiagnosticTail {
    pub fn new(limit: usize) -> Self {
        DiagnosticTail {
            bytes: VecDeque::new(),
            limit,
        }
    }

    pub fn push(&mut self, chunk: &[u8]) {
        self.bytes.extend(chunk);
        // a UTF-8 char is at most four bytes
        let cap = self.limit.saturating_mul(4);
        while self.bytes.len() > cap {
            self.bytes.pop_front();
        }
    }

    pub fn text(&self) -> String {
        let bytes: Vec<u8> = self.bytes.iter().copied().collect();
        let text = String::from_utf8_lossy(&bytes).replace('\r', "\n");
        let text = text.trim();
        let count = text.chars().count();
        let tail: String = text.chars().skip(count.saturating_sub(self.limit)).collect();
        String::from(tail.trim_start())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timestamp() {
        assert_eq!(parse_timestamp("frame=  240 fps= 48 q=28.0 size=    512kB time=00:01:05.12 bitrate= 64.4kbits/s"), Some(65));
        assert_eq!(parse_timestamp("time=01:00:00.00"), Some(3600));
        assert_eq!(parse_timestamp("Press [q] to stop"), None);
    }

    #[test]
    fn test_percent_complete() {
        assert_eq!(percent_complete(30, 600.0), 5);
        assert_eq!(percent_complete(599, 600.0), 99);
        assert_eq!(percent_complete(700, 600.0), 100);
        assert_eq!(percent_complete(10, 0.0), 0);
    }

    #[test]
    fn test_timestamp_split_across_chunks() {
        let mut parser = DiagnosticParser::new(100.0);
        let first = parser.feed(b"frame=10 fps=0.0 time=00:00:");
        assert!(first.is_empty());
        let second = parser.feed(b"25.04 bitrate=1.0kbits/s\rframe=20");
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].percent, Some(25));
        assert_eq!(parser.finish(), vec![DiagnosticLine {
            text: String::from("frame=20"),
            percent: None,
            is_error: false,
        }]);
    }

    #[test]
    fn test_percent_never_decreases() {
        let mut parser = DiagnosticParser::new(100.0);
        let lines = parser.feed(b"time=00:00:50.00\rtime=00:00:40.00\rtime=00:01:00.00\r");
        let percents: Vec<Option<u8>> = lines.iter().map(|l| l.percent).collect();
        assert_eq!(percents, vec![Some(50), Some(50), Some(60)]);
        assert_eq!(parser.last_percent(), 60);
    }

    #[test]
    fn test_error_lines_within_segment() {
        let mut parser = DiagnosticParser::new(10.0);
        let lines = parser.feed(b"Input #0, matroska\n[libx264 @ 0x1] Invalid argument\nConversion FAILED\r");
        let errors: Vec<&str> = lines.iter().filter(|l| l.is_error).map(|l| l.text.as_str()).collect();
        assert_eq!(errors, vec!["[libx264 @ 0x1] Invalid argument", "Conversion FAILED"]);
    }

    #[test]
    fn test_is_error_line() {
        assert!(is_error_line("Unknown encoder 'libfoo'"));
        assert!(is_error_line("Error while opening encoder"));
        assert!(!is_error_line("frame=  100 fps=25 time=00:00:04.00"));
    }

    #[test]
    fn test_diagnostic_tail_bounded() {
        let mut tail = DiagnosticTail::new(5);
        tail.push(b"abcdefgh");
        tail.push(b"ij\r");
        assert_eq!(tail.text(), "fghij");
    }
}
