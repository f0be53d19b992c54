//! Preview raster synthesis.
//!
//! Synthesis is a deterministic placeholder: a per-format background with a
//! centered play glyph, encoded to JPEG or PNG. It stands in for real frame
//! decoding, which this crate does not do; the `time_offset` option is
//! carried through to the result but does not select a frame.

mod raster;

use std::io::Cursor;
use std::str::FromStr;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::format::detect_format;

/// Smallest accepted thumbnail edge.
pub const MIN_DIMENSION: u32 = 64;

/// Largest accepted thumbnail width.
pub const MAX_WIDTH: u32 = 1920;

/// Largest accepted thumbnail height.
pub const MAX_HEIGHT: u32 = 1080;

/// Supported thumbnail output encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThumbnailFormat {
    Jpeg,
    Png,
}

impl ThumbnailFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThumbnailFormat::Jpeg => "jpeg",
            ThumbnailFormat::Png => "png",
        }
    }
}

impl std::fmt::Display for ThumbnailFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThumbnailFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "jpeg" => Ok(ThumbnailFormat::Jpeg),
            "png" => Ok(ThumbnailFormat::Png),
            other => Err(Error::UnsupportedImageFormat(other.to_string())),
        }
    }
}

/// Thumbnail generation options.
///
/// A value object: validated as a whole before any synthesis, never applied
/// partially. `Default` gives 320x240 JPEG at quality 80, offset 0, aspect
/// preserved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThumbnailOptions {
    pub width: u32,
    pub height: u32,
    /// JPEG quality, 1..=100. Ignored for PNG.
    pub quality: u8,
    pub format: ThumbnailFormat,
    /// Requested frame time in seconds; must not be negative.
    pub time_offset: f64,
    pub keep_aspect: bool,
}

impl Default for ThumbnailOptions {
    fn default() -> Self {
        Self {
            width: 320,
            height: 240,
            quality: 80,
            format: ThumbnailFormat::Jpeg,
            time_offset: 0.0,
            keep_aspect: true,
        }
    }
}

impl ThumbnailOptions {
    /// Check every field against its allowed range. Bounds are inclusive.
    pub fn validate(&self) -> Result<()> {
        if self.width < MIN_DIMENSION || self.width > MAX_WIDTH {
            return Err(Error::WidthOutOfRange(self.width));
        }
        if self.height < MIN_DIMENSION || self.height > MAX_HEIGHT {
            return Err(Error::HeightOutOfRange(self.height));
        }
        if self.format == ThumbnailFormat::Jpeg && !(1..=100).contains(&self.quality) {
            return Err(Error::QualityOutOfRange(self.quality));
        }
        if self.time_offset < 0.0 {
            return Err(Error::NegativeTimeOffset(self.time_offset));
        }
        Ok(())
    }
}

/// An encoded preview image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThumbnailResult {
    /// Encoded image bytes in `format`.
    pub image_data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub format: ThumbnailFormat,
    /// Length of `image_data` in bytes.
    pub file_size: i64,
    /// The time offset the thumbnail was requested for.
    pub time_offset: f64,
}

/// Synthesize a preview image for a video buffer.
///
/// The buffer must carry a recognizable container signature; the detected
/// format only selects the background color. Passing `None` for options uses
/// [`ThumbnailOptions::default`]; options are always validated first.
pub fn generate_from_video(
    data: &[u8],
    options: Option<&ThumbnailOptions>,
) -> Result<ThumbnailResult> {
    if data.is_empty() {
        return Err(Error::EmptyInput);
    }
    let format = detect_format(data)?;

    let defaults = ThumbnailOptions::default();
    let options = options.unwrap_or(&defaults);
    options.validate()?;

    let mut img = RgbaImage::from_pixel(
        options.width,
        options.height,
        raster::background_for(format),
    );
    raster::draw_play_glyph(&mut img);
    raster::draw_border(&mut img, Rgba([255, 255, 255, 128]));
    encode(img, options)
}

/// Generate one thumbnail per time offset, preserving input order.
///
/// Each result carries its own offset. Generation aborts at the first
/// failure, reporting the failing offset index via [`Error::BatchItem`].
pub fn generate_multiple(
    data: &[u8],
    time_offsets: &[f64],
    options: &ThumbnailOptions,
) -> Result<Vec<ThumbnailResult>> {
    if data.is_empty() {
        return Err(Error::EmptyInput);
    }
    if time_offsets.is_empty() {
        return Err(Error::EmptyTimeOffsets);
    }

    let mut results = Vec::with_capacity(time_offsets.len());
    for (index, &time_offset) in time_offsets.iter().enumerate() {
        let per_offset = ThumbnailOptions {
            time_offset,
            ..options.clone()
        };
        let result = generate_from_video(data, Some(&per_offset)).map_err(|source| {
            Error::BatchItem {
                index,
                source: Box::new(source),
            }
        })?;
        results.push(result);
    }
    Ok(results)
}

/// Fit a source aspect ratio into a destination box.
///
/// The wider side binds: a source wider than the destination box keeps the
/// destination width and derives the height, and vice versa.
pub fn calculate_aspect_ratio(
    src_width: u32,
    src_height: u32,
    dst_width: u32,
    dst_height: u32,
) -> (u32, u32) {
    let src_aspect = f64::from(src_width) / f64::from(src_height);
    let dst_aspect = f64::from(dst_width) / f64::from(dst_height);

    if src_aspect > dst_aspect {
        (dst_width, (f64::from(dst_width) / src_aspect) as u32)
    } else {
        ((f64::from(dst_height) * src_aspect) as u32, dst_height)
    }
}

/// Rough output size estimate in bytes, before encoding.
pub fn estimate_file_size(width: u32, height: u32, format: ThumbnailFormat, quality: u8) -> i64 {
    let pixels = i64::from(width) * i64::from(height);
    match format {
        ThumbnailFormat::Jpeg => {
            let bytes_per_pixel = 0.5 + (f64::from(quality) / 100.0) * 2.0;
            (pixels as f64 * bytes_per_pixel) as i64
        }
        ThumbnailFormat::Png => (pixels as f64 * 3.0) as i64,
    }
}

/// Produce a neutral placeholder raster independent of any video bytes.
///
/// Used when synthesis or extraction is impossible upstream: light-gray
/// background, border, and a simple camera glyph. The label is accepted for
/// API compatibility and is not rendered.
pub fn create_placeholder(options: &ThumbnailOptions, _label: &str) -> Result<ThumbnailResult> {
    options.validate()?;

    let mut img = RgbaImage::from_pixel(options.width, options.height, Rgba([240, 240, 240, 255]));
    raster::draw_border(&mut img, Rgba([200, 200, 200, 255]));
    raster::draw_camera_glyph(&mut img);
    encode(img, options)
}

fn encode(img: RgbaImage, options: &ThumbnailOptions) -> Result<ThumbnailResult> {
    let mut buf = Cursor::new(Vec::new());
    match options.format {
        ThumbnailFormat::Jpeg => {
            // JPEG has no alpha channel; flatten before encoding.
            let rgb = DynamicImage::ImageRgba8(img).to_rgb8();
            let encoder = JpegEncoder::new_with_quality(&mut buf, options.quality);
            rgb.write_with_encoder(encoder)?;
        }
        ThumbnailFormat::Png => {
            img.write_to(&mut buf, ImageFormat::Png)?;
        }
    }

    let image_data = buf.into_inner();
    Ok(ThumbnailResult {
        file_size: image_data.len() as i64,
        image_data,
        width: options.width,
        height: options.height,
        format: options.format,
        time_offset: options.time_offset,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_default_options() {
        let options = ThumbnailOptions::default();
        assert_eq!((options.width, options.height), (320, 240));
        assert_eq!(options.quality, 80);
        assert_eq!(options.format, ThumbnailFormat::Jpeg);
        assert_eq!(options.time_offset, 0.0);
        assert!(options.keep_aspect);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_validate_width_bounds() {
        let mut options = ThumbnailOptions::default();
        options.width = 32;
        assert_matches!(options.validate(), Err(Error::WidthOutOfRange(32)));
        options.width = 2048;
        assert_matches!(options.validate(), Err(Error::WidthOutOfRange(2048)));
        // Bounds are inclusive.
        options.width = 64;
        assert!(options.validate().is_ok());
        options.width = 1920;
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_validate_height_bounds() {
        let mut options = ThumbnailOptions::default();
        options.height = 63;
        assert_matches!(options.validate(), Err(Error::HeightOutOfRange(63)));
        options.height = 1081;
        assert_matches!(options.validate(), Err(Error::HeightOutOfRange(1081)));
        options.height = 1080;
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_validate_quality_only_for_jpeg() {
        let mut options = ThumbnailOptions::default();
        options.quality = 0;
        assert_matches!(options.validate(), Err(Error::QualityOutOfRange(0)));
        // PNG ignores quality entirely.
        options.format = ThumbnailFormat::Png;
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_validate_time_offset() {
        let mut options = ThumbnailOptions::default();
        options.time_offset = -0.5;
        assert_matches!(options.validate(), Err(Error::NegativeTimeOffset(_)));
    }

    #[test]
    fn test_aspect_ratio_fit() {
        assert_eq!(calculate_aspect_ratio(1920, 1080, 320, 240), (320, 180));
        // Taller-than-destination sources bind to the height.
        assert_eq!(calculate_aspect_ratio(1080, 1920, 320, 240), (135, 240));
        // Matching aspects fill the box.
        assert_eq!(calculate_aspect_ratio(640, 480, 320, 240), (320, 240));
    }

    #[test]
    fn test_estimate_file_size() {
        let pixels = 320 * 240;
        assert_eq!(
            estimate_file_size(320, 240, ThumbnailFormat::Png, 0),
            pixels * 3
        );
        // Quality 100 JPEG estimates 2.5 bytes per pixel.
        assert_eq!(
            estimate_file_size(320, 240, ThumbnailFormat::Jpeg, 100),
            (pixels as f64 * 2.5) as i64
        );
        assert_eq!(
            estimate_file_size(320, 240, ThumbnailFormat::Jpeg, 50),
            (pixels as f64 * 1.5) as i64
        );
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("jpeg".parse::<ThumbnailFormat>().unwrap(), ThumbnailFormat::Jpeg);
        assert_eq!("png".parse::<ThumbnailFormat>().unwrap(), ThumbnailFormat::Png);
        assert_matches!(
            "gif".parse::<ThumbnailFormat>(),
            Err(Error::UnsupportedImageFormat(_))
        );
    }

    #[test]
    fn test_generate_empty_data() {
        assert_matches!(generate_from_video(&[], None), Err(Error::EmptyInput));
    }

    #[test]
    fn test_generate_multiple_empty_offsets() {
        let webm = [0x1A, 0x45, 0xDF, 0xA3, 0x00, 0x00, 0x00, 0x00];
        assert_matches!(
            generate_multiple(&webm, &[], &ThumbnailOptions::default()),
            Err(Error::EmptyTimeOffsets)
        );
    }
}
