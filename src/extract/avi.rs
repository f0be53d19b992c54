//! AVI/RIFF chunk walker.
//!
//! RIFF chunks are little-endian. Only the `avih` main header is consumed:
//! microseconds-per-frame, total frame count, and the frame dimensions.

use std::time::Duration;

use super::cursor::ByteCursor;
use super::find;
use crate::types::VideoInfo;

/// Bytes of `avih` payload the walker reads (48), plus tag and size (8).
const AVIH_SPAN: usize = 56;

pub(crate) fn scan(data: &[u8], info: &mut VideoInfo) {
    let Some(pos) = find(data, b"avih") else {
        return;
    };
    if pos + AVIH_SPAN > data.len() {
        return;
    }

    // Payload starts after the chunk tag and its 4-byte size.
    let payload = pos + 8;
    let mut cursor = ByteCursor::new(data);

    if !cursor.seek(payload) {
        return;
    }
    let Some(micros_per_frame) = cursor.read_u32_le() else {
        return;
    };
    if micros_per_frame > 0 {
        info.frame_rate = 1_000_000.0 / f64::from(micros_per_frame);
    }

    if !cursor.seek(payload + 16) {
        return;
    }
    let Some(total_frames) = cursor.read_u32_le() else {
        return;
    };
    if total_frames > 0 && info.frame_rate > 0.0 {
        info.duration = Duration::from_secs_f64(f64::from(total_frames) / info.frame_rate);
    }

    if !cursor.seek(payload + 32) {
        return;
    }
    let Some(width) = cursor.read_u32_le() else {
        return;
    };
    let Some(height) = cursor.read_u32_le() else {
        return;
    };
    info.width = width;
    info.height = height;
}
