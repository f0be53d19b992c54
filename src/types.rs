//! Structured metadata records produced by extraction.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::format::VideoFormat;
use crate::limits::format_size;

/// Metadata extracted from a video buffer.
///
/// Numeric fields default to zero and codec strings to empty when the
/// corresponding structure is absent or unparseable; sub-fields never carry
/// error state. Only format detection can prevent a `VideoInfo` from being
/// produced at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoInfo {
    /// Original filename as supplied by the caller.
    pub filename: String,
    /// Container format derived from the leading bytes.
    pub format: VideoFormat,
    /// Size of the analyzed buffer in bytes.
    pub file_size: i64,
    /// Playback duration; zero when unknown.
    pub duration: Duration,
    /// Frame width in pixels; zero when unknown.
    pub width: u32,
    /// Frame height in pixels; zero when unknown.
    pub height: u32,
    /// Bitrate in bits per second; zero when unknown.
    pub bitrate: i64,
    /// Frame rate in frames per second; zero when unknown.
    pub frame_rate: f64,
    /// Video codec name (e.g. "H.264"); empty when unknown.
    pub video_codec: String,
    /// Audio codec name (e.g. "AAC"); empty when unknown.
    pub audio_codec: String,
    /// Duration as "HH:MM:SS" or "MM:SS".
    pub duration_formatted: String,
    /// Resolution as "WxH".
    pub resolution_formatted: String,
    /// File size with binary prefixes.
    pub file_size_formatted: String,
}

impl VideoInfo {
    pub(crate) fn new(filename: &str, format: VideoFormat, file_size: i64) -> Self {
        Self {
            filename: filename.to_string(),
            format,
            file_size,
            duration: Duration::ZERO,
            width: 0,
            height: 0,
            bitrate: 0,
            frame_rate: 0.0,
            video_codec: String::new(),
            audio_codec: String::new(),
            duration_formatted: String::new(),
            resolution_formatted: String::new(),
            file_size_formatted: String::new(),
        }
    }

    /// Fill the formatted display strings from the numeric fields.
    pub(crate) fn finalize(&mut self) {
        self.duration_formatted = format_duration(self.duration);
        self.resolution_formatted = format_resolution(self.width, self.height);
        self.file_size_formatted = format_size(self.file_size);
    }

    /// Whether the resolution qualifies as high definition (>= 1280x720).
    pub fn is_high_definition(&self) -> bool {
        is_high_definition(self.width, self.height)
    }

    /// Width-to-height ratio; 0 when the height is unknown.
    pub fn aspect_ratio(&self) -> f64 {
        aspect_ratio(self.width, self.height)
    }
}

/// Format a duration as "HH:MM:SS", or "MM:SS" when under an hour.
pub fn format_duration(duration: Duration) -> String {
    if duration.is_zero() {
        return "00:00".to_string();
    }
    let total = duration.as_secs();
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    if hours > 0 {
        format!("{hours:02}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes:02}:{seconds:02}")
    }
}

/// Format a resolution as "WxH".
pub fn format_resolution(width: u32, height: u32) -> String {
    format!("{width}x{height}")
}

/// Whether a resolution qualifies as high definition (>= 1280x720).
pub fn is_high_definition(width: u32, height: u32) -> bool {
    width >= 1280 && height >= 720
}

/// Width-to-height ratio; 0 when the height is zero.
pub fn aspect_ratio(width: u32, height: u32) -> f64 {
    if height == 0 {
        0.0
    } else {
        f64::from(width) / f64::from(height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::ZERO), "00:00");
        assert_eq!(format_duration(Duration::from_secs(5)), "00:05");
        assert_eq!(format_duration(Duration::from_secs(65)), "01:05");
        assert_eq!(format_duration(Duration::from_secs(3600)), "01:00:00");
        assert_eq!(format_duration(Duration::from_secs(3661)), "01:01:01");
    }

    #[test]
    fn test_format_resolution() {
        assert_eq!(format_resolution(1920, 1080), "1920x1080");
        assert_eq!(format_resolution(0, 0), "0x0");
    }

    #[test]
    fn test_high_definition() {
        assert!(is_high_definition(1280, 720));
        assert!(is_high_definition(1920, 1080));
        assert!(!is_high_definition(1280, 719));
        assert!(!is_high_definition(854, 480));
    }

    #[test]
    fn test_aspect_ratio() {
        assert_eq!(aspect_ratio(1920, 1080), 1920.0 / 1080.0);
        assert_eq!(aspect_ratio(640, 0), 0.0);
    }
}
