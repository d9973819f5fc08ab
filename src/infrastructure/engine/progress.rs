//! Turns ffmpeg stderr (log + `-progress` key/values) into percentages.

use crate::common::timecode::parse_time;
use std::time::Duration;

/// What a single engine line amounted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observed {
    /// A new, higher percentage to forward.
    Percentage(u8),
    /// A progress key/value that did not move the percentage.
    Status,
    /// Anything else: log output worth keeping for error reports.
    Diagnostic,
}

/// Tracks expected output length and the last percentage forwarded.
///
/// The expected length is the input duration from the engine's banner,
/// narrowed by the trim window when there is one.
#[derive(Debug, Default)]
pub struct ProgressTracker {
    seek: Duration,
    limit: Option<Duration>,
    input_duration: Option<Duration>,
    last: Option<u8>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_window(seek: Duration, limit: Duration) -> Self {
        Self {
            seek,
            limit: Some(limit),
            ..Self::default()
        }
    }

    fn expected_total(&self) -> Option<Duration> {
        let remaining = self.input_duration.map(|d| d.saturating_sub(self.seek));
        match (remaining, self.limit) {
            (Some(r), Some(l)) => Some(r.min(l)),
            (Some(r), None) => Some(r),
            (None, l) => l,
        }
    }

    pub fn observe(&mut self, line: &str) -> Observed {
        let line = line.trim();

        let Some((key, value)) = status_pair(line) else {
            if self.input_duration.is_none() {
                self.input_duration = banner_duration(line);
            }
            return Observed::Diagnostic;
        };

        match key {
            // ffmpeg reports out_time_ms in microseconds as well.
            "out_time_us" | "out_time_ms" => match value.parse::<i64>() {
                Ok(us) if us >= 0 => self.forward(self.percent_of(us as u64)),
                _ => Observed::Status,
            },
            "progress" if value == "end" => self.forward(Some(100)),
            _ => Observed::Status,
        }
    }

    fn percent_of(&self, out_us: u64) -> Option<u8> {
        let total_us = self.expected_total()?.as_micros();
        if total_us == 0 {
            return None;
        }
        let pct = (out_us as u128 * 100 / total_us).min(100);
        Some(pct as u8)
    }

    fn forward(&mut self, pct: Option<u8>) -> Observed {
        match pct {
            Some(p) if self.last.is_none_or(|last| p > last) => {
                self.last = Some(p);
                Observed::Percentage(p)
            }
            _ => Observed::Status,
        }
    }
}

/// `key=value` lines written by `-progress`; keys are lowercase identifiers.
fn status_pair(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    let is_key = !key.is_empty()
        && key
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_');
    (is_key && !value.contains(' ')).then_some((key, value))
}

/// `  Duration: 00:00:20.05, start: 0.000000, bitrate: 1205 kb/s`
fn banner_duration(line: &str) -> Option<Duration> {
    let rest = line.strip_prefix("Duration:")?;
    let stamp = rest.split(',').next()?.trim();
    parse_time(stamp)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(tracker: &mut ProgressTracker, lines: &[&str]) -> Vec<u8> {
        lines
            .iter()
            .filter_map(|l| match tracker.observe(l) {
                Observed::Percentage(p) => Some(p),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn percentages_follow_out_time_against_banner_duration() {
        let mut tracker = ProgressTracker::new();
        let seen = feed(
            &mut tracker,
            &[
                "Input #0, mov,mp4,m4a,3gp,3g2,mj2, from 'in.mp4':",
                "  Duration: 00:00:20.00, start: 0.000000, bitrate: 1205 kb/s",
                "frame=10",
                "out_time_us=5000000",
                "progress=continue",
                "out_time_us=10000000",
                "out_time_us=20000000",
                "progress=end",
            ],
        );
        assert_eq!(seen, vec![25, 50, 100]);
    }

    #[test]
    fn sequence_is_non_decreasing_and_clamped() {
        let mut tracker = ProgressTracker::new();
        let seen = feed(
            &mut tracker,
            &[
                "Duration: 00:00:10.00, start: 0.0",
                "out_time_us=6000000",
                "out_time_us=-3000",
                "out_time_us=4000000",
                "out_time_us=60000000",
                "progress=end",
            ],
        );
        assert_eq!(seen, vec![60, 100]);
        assert!(seen.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn trim_window_bounds_expected_total() {
        let mut tracker =
            ProgressTracker::with_window(Duration::from_secs(5), Duration::from_secs(3));
        let seen = feed(
            &mut tracker,
            &["Duration: 00:00:20.00, start: 0.0", "out_time_ms=1500000"],
        );
        assert_eq!(seen, vec![50]);

        // Window past the end of the clip: only 2s of output remain.
        let mut tracker =
            ProgressTracker::with_window(Duration::from_secs(18), Duration::from_secs(10));
        let seen = feed(
            &mut tracker,
            &["Duration: 00:00:20.00, start: 0.0", "out_time_us=1000000"],
        );
        assert_eq!(seen, vec![50]);
    }

    #[test]
    fn unknown_duration_only_reports_end() {
        let mut tracker = ProgressTracker::new();
        let seen = feed(
            &mut tracker,
            &["Duration: N/A, bitrate: N/A", "out_time_us=1000000", "progress=end"],
        );
        assert_eq!(seen, vec![100]);
    }

    #[test]
    fn classifies_log_lines_as_diagnostics() {
        let mut tracker = ProgressTracker::new();
        assert_eq!(
            tracker.observe("[h264 @ 0x55] error while decoding MB 3 4"),
            Observed::Diagnostic
        );
        assert_eq!(
            tracker.observe("in.mp4: Invalid data found when processing input"),
            Observed::Diagnostic
        );
        assert_eq!(tracker.observe("speed=1.5x"), Observed::Status);
    }
}
