//! Millisecond duration formatting.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationStyle {
    /// `"02:05"`, `"1:02:05"` once hours appear.
    #[default]
    Digits,
    /// `"1h 2min 5s"`, zero units omitted.
    Words,
}

/// Formats durations in milliseconds. Sub-second remainders are truncated.
#[derive(Debug, Clone, Copy, Default)]
pub struct DurationFormatter {
    style: DurationStyle,
}

impl DurationFormatter {
    pub fn new(style: DurationStyle) -> Self {
        Self { style }
    }

    pub fn digits() -> Self {
        Self::new(DurationStyle::Digits)
    }

    pub fn words() -> Self {
        Self::new(DurationStyle::Words)
    }

    pub fn format(&self, duration_ms: u64) -> String {
        let total_secs = duration_ms / 1000;
        let hours = total_secs / 3600;
        let minutes = (total_secs % 3600) / 60;
        let seconds = total_secs % 60;

        match self.style {
            DurationStyle::Digits => {
                if hours > 0 {
                    format!("{hours}:{minutes:02}:{seconds:02}")
                } else {
                    format!("{minutes:02}:{seconds:02}")
                }
            }
            DurationStyle::Words => {
                let mut parts = Vec::with_capacity(3);
                if hours > 0 {
                    parts.push(format!("{hours}h"));
                }
                if minutes > 0 {
                    parts.push(format!("{minutes}min"));
                }
                if seconds > 0 || parts.is_empty() {
                    parts.push(format!("{seconds}s"));
                }
                parts.join(" ")
            }
        }
    }
}
