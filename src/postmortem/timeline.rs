use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

static TIMESTAMP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{4}-\d{2}-\d{2}[ T]\d{2}:\d{2}:\d{2}(?:\.\d+)?(?:Z)?)")
        .expect("timestamp pattern is valid")
});

const NOT_AVAILABLE: &str = "N/A";

/// First ISO-8601-like timestamp of each line that has one, in input order
pub fn extract_timestamps<S: AsRef<str>>(lines: &[S]) -> Vec<String> {
    lines
        .iter()
        .filter_map(|line| TIMESTAMP.find(line.as_ref()))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// First and last timestamp seen in the input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: Option<String>,
    pub end: Option<String>,
}

impl TimeWindow {
    pub fn from_lines<S: AsRef<str>>(lines: &[S]) -> Self {
        let mut timestamps = extract_timestamps(lines);
        let end = timestamps.pop();
        let start = if timestamps.is_empty() {
            end.clone()
        } else {
            Some(timestamps.swap_remove(0))
        };
        Self { start, end }
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {}",
            self.start.as_deref().unwrap_or(NOT_AVAILABLE),
            self.end.as_deref().unwrap_or(NOT_AVAILABLE)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_one_per_line_in_order() {
        let lines = [
            "2024-03-05T10:00:00Z start",
            "no timestamp here",
            "2024-03-05 10:00:07.123 retry at 2024-03-05T10:00:09Z",
            "2024-03-05T10:01:00.5Z done",
        ];
        assert_eq!(
            extract_timestamps(&lines),
            vec!["2024-03-05T10:00:00Z", "2024-03-05 10:00:07.123", "2024-03-05T10:01:00.5Z"]
        );
    }

    #[test]
    fn test_window_bounds() {
        let window = TimeWindow::from_lines(&[
            "2024-01-01T00:00:00Z a",
            "2024-01-01T00:05:00Z b",
            "2024-01-01T00:09:00Z c",
        ]);
        assert_eq!(window.to_string(), "2024-01-01T00:00:00Z -> 2024-01-01T00:09:00Z");
    }

    #[test]
    fn test_single_timestamp_is_both_ends() {
        let window = TimeWindow::from_lines(&["2024-01-01T00:00:00Z OutOfMemory"]);
        assert_eq!(window.to_string(), "2024-01-01T00:00:00Z -> 2024-01-01T00:00:00Z");
    }

    #[test]
    fn test_no_timestamps() {
        let window = TimeWindow::from_lines(&["nothing", "at 10:00:00 only"]);
        assert_eq!(window, TimeWindow::default());
        assert_eq!(window.to_string(), "N/A -> N/A");
    }
}
