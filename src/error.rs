//! Error types for vidgate.

use thiserror::Error;

use crate::format::VideoFormat;

/// Result type for vidgate operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse error classes, used by callers to pick a rejection or fallback path.
///
/// `Input` and `Format` errors should be surfaced to the uploader as explicit
/// rejections. `Bounds` errors carry the violated limit in their message.
/// `Synthesis` errors should not abort an upload; callers can fall back to
/// [`create_placeholder`](crate::thumbnail::create_placeholder) instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Buffer empty or shorter than the required minimum.
    Input,
    /// Signature, extension, or declared-type problems.
    Format,
    /// Size or option value outside the configured range.
    Bounds,
    /// Raster encoding failure.
    Synthesis,
}

/// Error type for vidgate operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Input buffer is empty.
    #[error("input buffer is empty")]
    EmptyInput,

    /// Input buffer is too short to hold the required header.
    #[error("incomplete header: need {need} bytes, have {have}")]
    IncompleteHeader { need: usize, have: usize },

    /// Leading bytes match no known container signature.
    #[error("unrecognized video format")]
    UnrecognizedFormat,

    /// Filename extension is not in the supported set.
    #[error("unsupported video format: {0:?}")]
    UnsupportedExtension(String),

    /// File bytes and filename extension identify different formats.
    #[error("file content does not match extension: named .{extension}, content is {detected}")]
    FormatMismatch {
        extension: String,
        detected: VideoFormat,
    },

    /// Declared content type is not in the supported table.
    #[error("unsupported content type: {0}")]
    UnsupportedContentType(String),

    /// Declared content type is empty.
    #[error("content type is empty")]
    EmptyContentType,

    /// Byte size is negative.
    #[error("invalid file size: {0}")]
    NegativeSize(i64),

    /// Byte size is below the configured minimum.
    #[error("file is empty")]
    EmptyFile,

    /// Byte size exceeds the configured maximum.
    #[error("file size {size} exceeds the {limit} limit")]
    TooLarge { size: String, limit: String },

    /// Aggregate batch size exceeds the batch cap.
    #[error("batch total {total} exceeds the {limit} limit")]
    BatchTooLarge { total: String, limit: String },

    /// A batch element failed; carries the failing index.
    #[error("item {index}: {source}")]
    BatchItem {
        index: usize,
        #[source]
        source: Box<Error>,
    },

    /// Replacement size limits are inconsistent.
    #[error("invalid size limits: {0}")]
    InvalidLimits(String),

    /// Thumbnail width outside the allowed range.
    #[error("thumbnail width {0} must be between 64 and 1920")]
    WidthOutOfRange(u32),

    /// Thumbnail height outside the allowed range.
    #[error("thumbnail height {0} must be between 64 and 1080")]
    HeightOutOfRange(u32),

    /// JPEG quality outside 1..=100.
    #[error("jpeg quality {0} must be between 1 and 100")]
    QualityOutOfRange(u8),

    /// Negative thumbnail time offset.
    #[error("time offset {0} cannot be negative")]
    NegativeTimeOffset(f64),

    /// Requested output image format is not supported.
    #[error("unsupported image format: {0}")]
    UnsupportedImageFormat(String),

    /// Multi-thumbnail request carried no time offsets.
    #[error("time offset list is empty")]
    EmptyTimeOffsets,

    /// Raster encoding failed.
    #[error("image encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

impl Error {
    /// Classify this error into the coarse taxonomy.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::EmptyInput | Error::IncompleteHeader { .. } => ErrorCategory::Input,
            Error::UnrecognizedFormat
            | Error::UnsupportedExtension(_)
            | Error::FormatMismatch { .. }
            | Error::UnsupportedContentType(_)
            | Error::EmptyContentType => ErrorCategory::Format,
            Error::NegativeSize(_)
            | Error::EmptyFile
            | Error::TooLarge { .. }
            | Error::BatchTooLarge { .. }
            | Error::InvalidLimits(_)
            | Error::WidthOutOfRange(_)
            | Error::HeightOutOfRange(_)
            | Error::QualityOutOfRange(_)
            | Error::NegativeTimeOffset(_)
            | Error::UnsupportedImageFormat(_)
            | Error::EmptyTimeOffsets => ErrorCategory::Bounds,
            Error::Encode(_) => ErrorCategory::Synthesis,
            Error::BatchItem { source, .. } => source.category(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_mapping() {
        assert_eq!(Error::EmptyInput.category(), ErrorCategory::Input);
        assert_eq!(Error::UnrecognizedFormat.category(), ErrorCategory::Format);
        assert_eq!(Error::EmptyFile.category(), ErrorCategory::Bounds);
        assert_eq!(Error::WidthOutOfRange(32).category(), ErrorCategory::Bounds);
    }

    #[test]
    fn test_batch_item_delegates_category() {
        let err = Error::BatchItem {
            index: 2,
            source: Box::new(Error::NegativeSize(-1)),
        };
        assert_eq!(err.category(), ErrorCategory::Bounds);
        assert_eq!(err.to_string(), "item 2: invalid file size: -1");
    }
}
