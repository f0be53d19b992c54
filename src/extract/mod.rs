//! Structural metadata extraction from container headers.
//!
//! Once the format is recognized, extraction never fails: a malformed or
//! absent header field yields a zero/empty value in the result instead of an
//! error, so deep-metadata gaps never block an otherwise-valid upload.

mod avi;
mod cursor;
mod mp4;
mod webm;

use std::time::Duration;

use crate::error::{Error, Result};
use crate::format::{detect_format, VideoFormat};
use crate::types::VideoInfo;

/// Minimum buffer length for extraction: a box header plus a brand.
const MIN_HEADER_LEN: usize = 12;

/// Extract structural metadata from a video buffer.
///
/// Fails only on an empty buffer, a buffer shorter than 12 bytes, or an
/// unrecognized signature; after that a [`VideoInfo`] is always produced,
/// possibly with zero/empty fields for anything the walker could not parse.
pub fn extract_info(data: &[u8], filename: &str) -> Result<VideoInfo> {
    if data.is_empty() {
        return Err(Error::EmptyInput);
    }
    if data.len() < MIN_HEADER_LEN {
        return Err(Error::IncompleteHeader {
            need: MIN_HEADER_LEN,
            have: data.len(),
        });
    }

    let format = detect_format(data)?;
    let mut info = VideoInfo::new(filename, format, data.len() as i64);
    scan(data, format, &mut info);
    info.finalize();
    Ok(info)
}

/// Extract only the playback duration.
pub fn extract_duration(data: &[u8]) -> Result<Duration> {
    header_scan(data).map(|info| info.duration)
}

/// Extract only the frame resolution.
pub fn extract_resolution(data: &[u8]) -> Result<(u32, u32)> {
    header_scan(data).map(|info| (info.width, info.height))
}

/// Extract only the bitrate in bits per second.
pub fn extract_bitrate(data: &[u8]) -> Result<i64> {
    header_scan(data).map(|info| info.bitrate)
}

/// Extract only the frame rate in frames per second.
pub fn extract_frame_rate(data: &[u8]) -> Result<f64> {
    header_scan(data).map(|info| info.frame_rate)
}

fn header_scan(data: &[u8]) -> Result<VideoInfo> {
    if data.len() < MIN_HEADER_LEN {
        return Err(Error::IncompleteHeader {
            need: MIN_HEADER_LEN,
            have: data.len(),
        });
    }
    let format = detect_format(data)?;
    let mut info = VideoInfo::new("", format, data.len() as i64);
    scan(data, format, &mut info);
    Ok(info)
}

fn scan(data: &[u8], format: VideoFormat, info: &mut VideoInfo) {
    match format {
        VideoFormat::Mp4 | VideoFormat::Mov => mp4::scan(data, info),
        VideoFormat::Avi => avi::scan(data, info),
        VideoFormat::Webm => webm::scan(data, info),
        // Detection never yields Unknown, but the dispatch stays exhaustive.
        VideoFormat::Unknown => {}
    }
}

/// First occurrence of `pattern` in `data`.
pub(crate) fn find(data: &[u8], pattern: &[u8]) -> Option<usize> {
    if pattern.is_empty() || pattern.len() > data.len() {
        return None;
    }
    data.windows(pattern.len()).position(|window| window == pattern)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_empty_and_short_buffers() {
        assert_matches!(extract_info(&[], "a.mp4"), Err(Error::EmptyInput));
        assert_matches!(
            extract_info(&[0u8; 11], "a.mp4"),
            Err(Error::IncompleteHeader { need: 12, have: 11 })
        );
    }

    #[test]
    fn test_unrecognized_signature() {
        assert_matches!(
            extract_info(&[0xABu8; 16], "a.mp4"),
            Err(Error::UnrecognizedFormat)
        );
    }

    #[test]
    fn test_find() {
        assert_eq!(find(b"xxavihyy", b"avih"), Some(2));
        assert_eq!(find(b"xxavihyy", b"zzzz"), None);
        assert_eq!(find(b"ab", b"abcd"), None);
        assert_eq!(find(b"ab", b""), None);
    }
}
