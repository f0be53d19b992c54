//! # vidgate
//!
//! Pure Rust analysis core for video uploads. Given a byte buffer claiming to
//! be a video file, vidgate:
//!
//! - detects the container format from binary signatures (MP4, MOV, AVI, WebM)
//! - cross-checks filename extension and declared content type against the bytes
//! - enforces configurable byte-size policy, per format and per batch
//! - walks the container structure to extract duration, resolution, frame rate
//!   and codec identifiers
//! - synthesizes an encoded preview raster (a deterministic placeholder, not a
//!   decoded frame)
//!
//! Every operation is a synchronous, CPU-bound transformation of in-memory
//! bytes; nothing here touches the filesystem or the network. Callers are
//! expected to bound the buffers they pass in — signature detection needs only
//! the first 512 bytes, extraction a bounded prefix.
//!
//! ## Example
//!
//! ```no_run
//! use vidgate::{detect_format, extract_info, SizeLimiter};
//!
//! let data: Vec<u8> = std::fs::read("movie.mp4").unwrap();
//!
//! let limiter = SizeLimiter::new();
//! limiter.validate_size(data.len() as i64).unwrap();
//!
//! let format = detect_format(&data).unwrap();
//! println!("container: {format}");
//!
//! let info = extract_info(&data, "movie.mp4").unwrap();
//! println!(
//!     "{} {} {}",
//!     info.duration_formatted, info.resolution_formatted, info.file_size_formatted
//! );
//!
//! let thumb = vidgate::thumbnail::generate_from_video(&data, None).unwrap();
//! println!("preview: {} bytes of {}", thumb.file_size, thumb.format);
//! ```

pub mod error;
pub mod extract;
pub mod format;
pub mod limits;
pub mod thumbnail;
pub mod types;

pub use error::{Error, ErrorCategory, Result};
pub use extract::{
    extract_bitrate, extract_duration, extract_frame_rate, extract_info, extract_resolution,
};
pub use format::{
    detect_format, validate_content_type, validate_format, validate_upload, FormatValidation,
    UploadValidation, VideoFormat,
};
pub use limits::{format_size, SizeLimiter, SizeLimits};
pub use thumbnail::{
    calculate_aspect_ratio, create_placeholder, estimate_file_size, generate_from_video,
    generate_multiple, ThumbnailFormat, ThumbnailOptions, ThumbnailResult,
};
pub use types::{
    aspect_ratio, format_duration, format_resolution, is_high_definition, VideoInfo,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_reexport() {
        let webm = [0x1A, 0x45, 0xDF, 0xA3, 0x00, 0x00, 0x00, 0x00];
        assert_eq!(detect_format(&webm).unwrap(), VideoFormat::Webm);
    }
}
