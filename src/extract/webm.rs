//! WebM/EBML element scanner.
//!
//! EBML elements carry variable-length IDs and sizes; fully decoding them is
//! out of scope for this crate. The scanner only checks whether the known
//! element IDs are present, and the corresponding `VideoInfo` fields stay at
//! their zero values either way.

use tracing::debug;

use super::find;
use crate::types::VideoInfo;

/// Segment Duration element ID.
const DURATION_ID: [u8; 2] = [0x44, 0x89];

/// Video PixelWidth element ID.
const PIXEL_WIDTH_ID: [u8; 1] = [0xB0];

/// Video PixelHeight element ID.
const PIXEL_HEIGHT_ID: [u8; 1] = [0xBA];

pub(crate) fn scan(data: &[u8], _info: &mut VideoInfo) {
    let elements: [(&str, &[u8]); 3] = [
        ("Duration", &DURATION_ID),
        ("PixelWidth", &PIXEL_WIDTH_ID),
        ("PixelHeight", &PIXEL_HEIGHT_ID),
    ];
    for (name, id) in elements {
        if find(data, id).is_some() {
            debug!(element = name, "EBML element present but not decoded");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::VideoFormat;

    #[test]
    fn test_fields_stay_zero() {
        let mut data = vec![0x1A, 0x45, 0xDF, 0xA3];
        data.extend_from_slice(&[0x44, 0x89, 0x84, 0x00]);
        data.extend_from_slice(&[0xB0, 0x82, 0x05, 0x00]);
        data.extend_from_slice(&[0xBA, 0x82, 0x02, 0xD0]);

        let mut info = VideoInfo::new("clip.webm", VideoFormat::Webm, 0);
        scan(&data, &mut info);
        assert_eq!(info.duration, std::time::Duration::ZERO);
        assert_eq!((info.width, info.height), (0, 0));
    }
}
