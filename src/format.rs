//! Container format detection from binary signatures.
//!
//! A format tag is derived only from leading bytes, never from the filename
//! or the client-declared content type; those are cross-checked against the
//! detected tag instead. Detection is a pure function of the byte prefix and
//! is safe for unrestricted concurrent use.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::limits::SizeLimiter;

/// EBML header magic identifying Matroska/WebM.
const EBML_MAGIC: [u8; 4] = [0x1A, 0x45, 0xDF, 0xA3];

/// ISO-BMFF brands treated as plain MP4.
const MP4_BRANDS: [&[u8; 4]; 4] = [b"mp41", b"mp42", b"isom", b"dash"];

/// ISO-BMFF brands treated as QuickTime.
const MOV_BRANDS: [&[u8; 4]; 1] = [b"qt  "];

/// Minimum prefix length needed to attempt detection.
const MIN_SIGNATURE_LEN: usize = 4;

/// Supported container formats.
///
/// The set is closed on purpose: adding a format forces every dispatch site
/// through an exhaustive match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoFormat {
    /// MPEG-4 Part 14 (ISO-BMFF with an MP4 brand).
    Mp4,
    /// QuickTime (ISO-BMFF with the "qt  " brand).
    Mov,
    /// AVI (RIFF).
    Avi,
    /// WebM (Matroska/EBML).
    Webm,
    /// Detection failed; only appears in validation outcomes.
    Unknown,
}

impl VideoFormat {
    /// Canonical filename extension, lowercase without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            VideoFormat::Mp4 => "mp4",
            VideoFormat::Mov => "mov",
            VideoFormat::Avi => "avi",
            VideoFormat::Webm => "webm",
            VideoFormat::Unknown => "",
        }
    }

    /// Canonical MIME type, if the format has one.
    pub fn content_type(&self) -> Option<&'static str> {
        match self {
            VideoFormat::Mp4 => Some("video/mp4"),
            VideoFormat::Mov => Some("video/quicktime"),
            VideoFormat::Avi => Some("video/x-msvideo"),
            VideoFormat::Webm => Some("video/webm"),
            VideoFormat::Unknown => None,
        }
    }

    /// Look up a format by filename extension (without the dot).
    pub fn from_extension(ext: &str) -> Option<VideoFormat> {
        match ext.to_ascii_lowercase().as_str() {
            "mp4" => Some(VideoFormat::Mp4),
            "mov" => Some(VideoFormat::Mov),
            "avi" => Some(VideoFormat::Avi),
            "webm" => Some(VideoFormat::Webm),
            _ => None,
        }
    }

    /// Look up a format by declared content type.
    pub fn from_content_type(content_type: &str) -> Option<VideoFormat> {
        match content_type {
            "video/mp4" => Some(VideoFormat::Mp4),
            "video/webm" => Some(VideoFormat::Webm),
            "video/avi" | "video/x-msvideo" => Some(VideoFormat::Avi),
            "video/quicktime" => Some(VideoFormat::Mov),
            _ => None,
        }
    }
}

impl std::fmt::Display for VideoFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VideoFormat::Mp4 => write!(f, "MP4"),
            VideoFormat::Mov => write!(f, "MOV"),
            VideoFormat::Avi => write!(f, "AVI"),
            VideoFormat::Webm => write!(f, "WebM"),
            VideoFormat::Unknown => write!(f, "unknown"),
        }
    }
}

/// Outcome of [`validate_format`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatValidation {
    /// Whether bytes, extension, and declared type agree.
    pub valid: bool,
    /// Format derived from the leading bytes; `Unknown` if detection failed.
    pub detected: VideoFormat,
    /// Detection failure detail, when `valid` is false.
    pub error: Option<String>,
}

/// Outcome of [`validate_upload`], with one flag per check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadValidation {
    pub valid: bool,
    pub detected_format: VideoFormat,
    pub format_valid: bool,
    pub size_valid: bool,
    pub content_type_valid: bool,
    pub errors: Vec<String>,
}

/// Detect the container format from leading bytes.
///
/// Dispatch order: EBML signature (WebM), RIFF + "AVI " (AVI), then `ftyp`
/// with its brand checked against the MP4 and MOV brand tables. Buffers
/// shorter than 4 bytes fail with [`Error::IncompleteHeader`]; bytes that
/// match nothing fail with [`Error::UnrecognizedFormat`].
pub fn detect_format(data: &[u8]) -> Result<VideoFormat> {
    if data.len() < MIN_SIGNATURE_LEN {
        return Err(Error::IncompleteHeader {
            need: MIN_SIGNATURE_LEN,
            have: data.len(),
        });
    }

    if data.starts_with(&EBML_MAGIC) {
        return Ok(VideoFormat::Webm);
    }

    if data.starts_with(b"RIFF") && data.len() >= 12 && &data[8..12] == b"AVI " {
        return Ok(VideoFormat::Avi);
    }

    if data.len() >= 12 && &data[4..8] == b"ftyp" {
        let brand = &data[8..12];
        if MP4_BRANDS.iter().any(|b| brand == *b) {
            return Ok(VideoFormat::Mp4);
        }
        if MOV_BRANDS.iter().any(|b| brand == *b) {
            return Ok(VideoFormat::Mov);
        }
    }

    Err(Error::UnrecognizedFormat)
}

/// Validate that filename, declared content type, and actual bytes agree.
///
/// The extension must be in the supported set and match the format detected
/// from the bytes; a disagreement fails with [`Error::FormatMismatch`]. That
/// check is security-relevant: it rejects files renamed to smuggle another
/// format past extension-based filters. A detection failure is reported
/// in-band through the returned [`FormatValidation`] rather than as an error.
///
/// The declared content type is not consulted here; the bytes are
/// authoritative. Check it separately with [`validate_content_type`], as
/// [`validate_upload`] does.
pub fn validate_format(
    filename: &str,
    _content_type: &str,
    data: &[u8],
) -> Result<FormatValidation> {
    if data.is_empty() {
        return Err(Error::EmptyInput);
    }

    let ext = file_extension(filename);
    if VideoFormat::from_extension(&ext).is_none() {
        return Err(Error::UnsupportedExtension(ext));
    }

    let detected = match detect_format(data) {
        Ok(format) => format,
        Err(err @ (Error::UnrecognizedFormat | Error::IncompleteHeader { .. })) => {
            return Ok(FormatValidation {
                valid: false,
                detected: VideoFormat::Unknown,
                error: Some(err.to_string()),
            });
        }
        Err(err) => return Err(err),
    };

    if detected.extension() != ext {
        return Err(Error::FormatMismatch {
            extension: ext,
            detected,
        });
    }

    Ok(FormatValidation {
        valid: true,
        detected,
        error: None,
    })
}

/// Validate a declared content type against the supported table.
pub fn validate_content_type(content_type: &str) -> Result<VideoFormat> {
    if content_type.is_empty() {
        return Err(Error::EmptyContentType);
    }
    VideoFormat::from_content_type(content_type)
        .ok_or_else(|| Error::UnsupportedContentType(content_type.to_string()))
}

/// Run size, content-type, and format checks, collecting every failure.
///
/// Unlike [`validate_format`], this does not stop at the first problem; each
/// check gets its own flag and all failure messages are gathered, so an API
/// layer can report everything wrong with an upload at once.
pub fn validate_upload(
    filename: &str,
    content_type: &str,
    data: &[u8],
    size: i64,
    limiter: &SizeLimiter,
) -> UploadValidation {
    let mut result = UploadValidation {
        valid: true,
        detected_format: VideoFormat::Unknown,
        format_valid: false,
        size_valid: false,
        content_type_valid: false,
        errors: Vec::new(),
    };

    match limiter.validate_size(size) {
        Ok(()) => result.size_valid = true,
        Err(err) => {
            result.valid = false;
            result.errors.push(err.to_string());
        }
    }

    match validate_content_type(content_type) {
        Ok(_) => result.content_type_valid = true,
        Err(err) => {
            result.valid = false;
            result.errors.push(err.to_string());
        }
    }

    match validate_format(filename, content_type, data) {
        Ok(outcome) if outcome.valid => {
            result.format_valid = true;
            result.detected_format = outcome.detected;
        }
        Ok(outcome) => {
            result.valid = false;
            if let Some(message) = outcome.error {
                result.errors.push(message);
            }
        }
        Err(err) => {
            result.valid = false;
            result.errors.push(err.to_string());
        }
    }

    result
}

/// Lowercased filename extension without the dot, or empty.
fn file_extension(filename: &str) -> String {
    std::path::Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_ascii_lowercase()
}
