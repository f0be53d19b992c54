//! MP4/MOV box walker.
//!
//! Boxes are length-prefixed, big-endian, four-character-code-tagged units.
//! The walker reads each header, descends into known container boxes, and
//! stops at the first size that cannot hold its own 8-byte header or runs
//! past the buffer; a truncated tail yields a partial result, never an error.

use std::time::Duration;

use tracing::debug;

use super::cursor::ByteCursor;
use super::find;
use crate::types::VideoInfo;

/// Boxes whose payload is a sequence of child boxes.
const CONTAINER_BOXES: [&[u8; 4]; 5] = [b"moov", b"trak", b"mdia", b"minf", b"stbl"];

/// Nesting depth cap against pathological box structures.
const MAX_DEPTH: u8 = 8;

pub(crate) fn scan(data: &[u8], info: &mut VideoInfo) {
    walk_boxes(data, info, 0);
}

fn walk_boxes(data: &[u8], info: &mut VideoInfo, depth: u8) {
    if depth > MAX_DEPTH {
        return;
    }

    let mut cursor = ByteCursor::new(data);
    while cursor.remaining() > 8 {
        let start = cursor.position();
        let Some(size) = cursor.read_u32_be() else {
            break;
        };
        let Some(box_type) = cursor.read_array::<4>() else {
            break;
        };

        let size = size as usize;
        if size < 8 || size > data.len() - start {
            debug!(
                box_type = %String::from_utf8_lossy(&box_type),
                size,
                remaining = data.len() - start,
                "stopping box walk at truncated or undersized box"
            );
            break;
        }

        let body = &data[start..start + size];
        match &box_type {
            b"mvhd" => parse_mvhd(body, info),
            b"tkhd" => parse_tkhd(body, info),
            b"stsd" => parse_stsd(body, info),
            tag if CONTAINER_BOXES.contains(&tag) => {
                walk_boxes(&body[8..], info, depth + 1);
            }
            _ => {}
        }

        if !cursor.seek(start + size) {
            break;
        }
    }
}

/// Movie header: timescale and duration at the version-0 offsets.
fn parse_mvhd(body: &[u8], info: &mut VideoInfo) {
    let mut cursor = ByteCursor::new(body);
    // Box header, version/flags, creation and modification times.
    if !cursor.skip(20) {
        return;
    }
    let Some(timescale) = cursor.read_u32_be() else {
        return;
    };
    let Some(duration) = cursor.read_u32_be() else {
        return;
    };
    if timescale > 0 {
        info.duration = Duration::from_secs_f64(f64::from(duration) / f64::from(timescale));
    }
}

/// Track header: width and height as 16.16 fixed point in the trailing
/// 8 bytes. Version-0 track headers are 92 bytes; anything shorter is
/// ignored.
fn parse_tkhd(body: &[u8], info: &mut VideoInfo) {
    if body.len() < 92 {
        return;
    }
    let mut cursor = ByteCursor::new(body);
    if !cursor.seek(body.len() - 8) {
        return;
    }
    let Some(width) = cursor.read_u32_be() else {
        return;
    };
    let Some(height) = cursor.read_u32_be() else {
        return;
    };
    // Integer part only.
    info.width = width >> 16;
    info.height = height >> 16;
}

/// Sample description: codec identification by FourCC search, without
/// decoding the sample entries themselves.
fn parse_stsd(body: &[u8], info: &mut VideoInfo) {
    if body.len() < 16 {
        return;
    }
    if find(body, b"avc1").is_some() {
        info.video_codec = "H.264".to_string();
    } else if find(body, b"hvc1").is_some() {
        info.video_codec = "H.265".to_string();
    }
    if find(body, b"mp4a").is_some() {
        info.audio_codec = "AAC".to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::VideoFormat;

    fn mvhd_box(timescale: u32, duration: u32) -> Vec<u8> {
        let mut body = vec![0u8; 32];
        body[0..4].copy_from_slice(&32u32.to_be_bytes());
        body[4..8].copy_from_slice(b"mvhd");
        body[20..24].copy_from_slice(&timescale.to_be_bytes());
        body[24..28].copy_from_slice(&duration.to_be_bytes());
        body
    }

    fn tkhd_box(width: u32, height: u32) -> Vec<u8> {
        let mut body = vec![0u8; 92];
        body[0..4].copy_from_slice(&92u32.to_be_bytes());
        body[4..8].copy_from_slice(b"tkhd");
        body[84..88].copy_from_slice(&(width << 16).to_be_bytes());
        body[88..92].copy_from_slice(&(height << 16).to_be_bytes());
        body
    }

    fn stsd_box() -> Vec<u8> {
        let mut body = vec![0u8; 24];
        body[0..4].copy_from_slice(&24u32.to_be_bytes());
        body[4..8].copy_from_slice(b"stsd");
        body[12..16].copy_from_slice(b"avc1");
        body[16..20].copy_from_slice(b"mp4a");
        body
    }

    fn info() -> VideoInfo {
        VideoInfo::new("clip.mp4", VideoFormat::Mp4, 0)
    }

    #[test]
    fn test_flat_boxes() {
        let mut data = Vec::new();
        data.extend_from_slice(&mvhd_box(1000, 60_000));
        data.extend_from_slice(&tkhd_box(1920, 1080));
        data.extend_from_slice(&stsd_box());

        let mut info = info();
        scan(&data, &mut info);
        assert_eq!(info.duration, Duration::from_secs(60));
        assert_eq!((info.width, info.height), (1920, 1080));
        assert_eq!(info.video_codec, "H.264");
        assert_eq!(info.audio_codec, "AAC");
    }

    #[test]
    fn test_nested_under_moov() {
        let mut children = Vec::new();
        children.extend_from_slice(&mvhd_box(600, 3000));
        children.extend_from_slice(&tkhd_box(640, 480));

        let mut data = Vec::new();
        data.extend_from_slice(&(8 + children.len() as u32).to_be_bytes());
        data.extend_from_slice(b"moov");
        data.extend_from_slice(&children);

        let mut info = info();
        scan(&data, &mut info);
        assert_eq!(info.duration, Duration::from_secs(5));
        assert_eq!((info.width, info.height), (640, 480));
    }

    #[test]
    fn test_oversized_box_stops_walk() {
        let mut data = mvhd_box(1000, 10_000);
        // Claim a box larger than the remaining buffer.
        let mut bogus = vec![0u8; 8];
        bogus[0..4].copy_from_slice(&0xFFFF_FFFFu32.to_be_bytes());
        bogus[4..8].copy_from_slice(b"trak");
        data.extend_from_slice(&bogus);
        data.extend_from_slice(&tkhd_box(1280, 720));

        let mut info = info();
        scan(&data, &mut info);
        // The walk stops before the tkhd behind the bogus box.
        assert_eq!(info.duration, Duration::from_secs(10));
        assert_eq!(info.width, 0);
    }

    #[test]
    fn test_undersized_container_box_stops_walk() {
        // A container tag whose declared size cannot hold its own header
        // must stop the walk instead of descending into a short slice.
        let mut data = mvhd_box(1000, 10_000);
        data.extend_from_slice(&5u32.to_be_bytes());
        data.extend_from_slice(b"moov");
        data.extend_from_slice(&tkhd_box(1280, 720));

        let mut info = info();
        scan(&data, &mut info);
        assert_eq!(info.duration, Duration::from_secs(10));
        assert_eq!((info.width, info.height), (0, 0));
    }

    #[test]
    fn test_zero_timescale_leaves_duration_unset() {
        let mut info = info();
        scan(&mvhd_box(0, 5000), &mut info);
        assert_eq!(info.duration, Duration::ZERO);
    }

    #[test]
    fn test_short_tkhd_ignored() {
        let mut body = vec![0u8; 40];
        body[0..4].copy_from_slice(&40u32.to_be_bytes());
        body[4..8].copy_from_slice(b"tkhd");

        let mut info = info();
        scan(&body, &mut info);
        assert_eq!((info.width, info.height), (0, 0));
    }
}
