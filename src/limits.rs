//! Byte-size policy for uploads.
//!
//! [`SizeLimiter`] is the only component here with shared mutable state.
//! Readers take an [`Arc`] snapshot of the current [`SizeLimits`]; mutators
//! build a complete replacement set and swap the `Arc` under a write lock, so
//! a concurrent reader never observes a partially-updated limit set.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::format::VideoFormat;

/// Default maximum file size: 2 GiB.
const DEFAULT_MAX_FILE_SIZE: i64 = 2 * 1024 * 1024 * 1024;

/// Default minimum file size: 1 byte.
const DEFAULT_MIN_FILE_SIZE: i64 = 1;

/// Default aggregate batch cap, as a multiple of the single-file maximum.
const DEFAULT_BATCH_MULTIPLIER: i64 = 10;

/// One immutable set of size limits.
///
/// Invariant: `min_file_size < max_file_size`. [`SizeLimiter::update_limits`]
/// enforces it for replacements.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SizeLimits {
    /// Global maximum file size in bytes.
    pub max_file_size: i64,
    /// Global minimum file size in bytes.
    pub min_file_size: i64,
    /// Per-format maximums overriding the global one.
    #[serde(default)]
    pub format_limits: HashMap<VideoFormat, i64>,
}

impl Default for SizeLimits {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            min_file_size: DEFAULT_MIN_FILE_SIZE,
            format_limits: HashMap::new(),
        }
    }
}

/// Shared, atomically-replaceable size policy.
///
/// Cheap to share behind an `Arc`; reads are lock-held only long enough to
/// clone the snapshot pointer.
#[derive(Debug)]
pub struct SizeLimiter {
    limits: RwLock<Arc<SizeLimits>>,
    batch_multiplier: i64,
}

impl Default for SizeLimiter {
    fn default() -> Self {
        Self::new()
    }
}

impl SizeLimiter {
    /// Create a limiter with the default limits (2 GiB max, 1 byte min).
    pub fn new() -> Self {
        Self::with_limits(SizeLimits::default())
    }

    /// Create a limiter with an explicit starting limit set.
    pub fn with_limits(limits: SizeLimits) -> Self {
        Self {
            limits: RwLock::new(Arc::new(limits)),
            batch_multiplier: DEFAULT_BATCH_MULTIPLIER,
        }
    }

    /// Override the batch cap multiplier (ignored unless positive).
    pub fn with_batch_multiplier(mut self, multiplier: i64) -> Self {
        if multiplier > 0 {
            self.batch_multiplier = multiplier;
        }
        self
    }

    /// Current limit snapshot.
    pub fn limits(&self) -> Arc<SizeLimits> {
        self.limits.read().clone()
    }

    /// Validate a single byte size against the global limits.
    ///
    /// The maximum is inclusive: `size == max_file_size` passes.
    pub fn validate_size(&self, size: i64) -> Result<()> {
        let limits = self.limits();
        check_size(size, limits.min_file_size, limits.max_file_size)
    }

    /// Validate a byte size against a format override, falling back to the
    /// global maximum when the format has none.
    pub fn validate_size_for_format(&self, format: VideoFormat, size: i64) -> Result<()> {
        let limits = self.limits();
        let max = limits
            .format_limits
            .get(&format)
            .copied()
            .unwrap_or(limits.max_file_size);
        check_size(size, limits.min_file_size, max)
    }

    /// Validate each size in order, then the aggregate against the batch cap.
    ///
    /// A failing element is reported as [`Error::BatchItem`] carrying its
    /// index; the whole batch is rejected as [`Error::BatchTooLarge`] when the
    /// total exceeds `batch_multiplier x max_file_size`.
    pub fn validate_batch_sizes(&self, sizes: &[i64]) -> Result<()> {
        let limits = self.limits();
        let mut total: i64 = 0;
        for (index, &size) in sizes.iter().enumerate() {
            check_size(size, limits.min_file_size, limits.max_file_size).map_err(|source| {
                Error::BatchItem {
                    index,
                    source: Box::new(source),
                }
            })?;
            total = total.saturating_add(size);
        }

        let batch_limit = limits.max_file_size.saturating_mul(self.batch_multiplier);
        if total > batch_limit {
            return Err(Error::BatchTooLarge {
                total: format_size(total),
                limit: format_size(batch_limit),
            });
        }
        Ok(())
    }

    /// Whether a size falls inside the global range.
    pub fn is_valid_size(&self, size: i64) -> bool {
        let limits = self.limits();
        size >= limits.min_file_size && size <= limits.max_file_size
    }

    /// Replace the global maximum (ignored unless positive).
    pub fn set_max_file_size(&self, size: i64) {
        if size > 0 {
            self.replace(|limits| limits.max_file_size = size);
        }
    }

    /// Replace the global minimum (ignored if negative).
    pub fn set_min_file_size(&self, size: i64) {
        if size >= 0 {
            self.replace(|limits| limits.min_file_size = size);
        }
    }

    /// Replace the per-format overrides. Non-positive entries are dropped.
    pub fn set_format_limits(&self, limits: HashMap<VideoFormat, i64>) {
        self.replace(|next| {
            next.format_limits = limits
                .iter()
                .filter(|(_, &limit)| limit > 0)
                .map(|(&format, &limit)| (format, limit))
                .collect();
        });
    }

    /// Replace the whole limit set after validating its invariants.
    pub fn update_limits(&self, limits: SizeLimits) -> Result<()> {
        if limits.max_file_size <= 0 {
            return Err(Error::InvalidLimits(
                "maximum file size must be positive".to_string(),
            ));
        }
        if limits.min_file_size < 0 {
            return Err(Error::InvalidLimits(
                "minimum file size cannot be negative".to_string(),
            ));
        }
        if limits.min_file_size >= limits.max_file_size {
            return Err(Error::InvalidLimits(
                "minimum file size must be below the maximum".to_string(),
            ));
        }
        *self.limits.write() = Arc::new(limits);
        Ok(())
    }

    /// Read-modify-publish under the write lock, so concurrent mutators
    /// cannot lose updates and readers only ever see complete sets.
    fn replace<F: FnOnce(&mut SizeLimits)>(&self, mutate: F) {
        let mut guard = self.limits.write();
        let mut next = (**guard).clone();
        mutate(&mut next);
        *guard = Arc::new(next);
    }
}

/// Human-readable byte size with binary prefixes.
///
/// Two decimal places from KB upward, plain integer bytes below:
/// `format_size(1024) == "1.00 KB"`, `format_size(1023) == "1023 B"`.
pub fn format_size(size: i64) -> String {
    const KB: i64 = 1024;
    const MB: i64 = KB * 1024;
    const GB: i64 = MB * 1024;
    const TB: i64 = GB * 1024;

    match size {
        s if s >= TB => format!("{:.2} TB", s as f64 / TB as f64),
        s if s >= GB => format!("{:.2} GB", s as f64 / GB as f64),
        s if s >= MB => format!("{:.2} MB", s as f64 / MB as f64),
        s if s >= KB => format!("{:.2} KB", s as f64 / KB as f64),
        s => format!("{s} B"),
    }
}

fn check_size(size: i64, min: i64, max: i64) -> Result<()> {
    if size < 0 {
        return Err(Error::NegativeSize(size));
    }
    if size < min {
        return Err(Error::EmptyFile);
    }
    if size > max {
        return Err(Error::TooLarge {
            size: format_size(size),
            limit: format_size(max),
        });
    }
    Ok(())
}
