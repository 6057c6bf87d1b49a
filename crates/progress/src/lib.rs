#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Terminal progress rendering for xcfetch
//!
//! A [`ProgressRenderer`] turns repeated `update(step, total, text)` calls into
//! text written to an [`OutputSink`]. Three modes are supported:
//!
//! - **Percent**: `43% [=========-----] text`, overwritten in place
//! - **Counting**: `[3/10] text`, the line is erased and redrawn on every call
//! - **Counting multiline**: `[3/10] text`, one new line per call
//!
//! A renderer is owned by exactly one operation. Sharing a terminal between
//! two live renderers interleaves their output; callers must serialize.

pub mod ansi;
mod renderer;
mod sink;

pub use renderer::{
    bar_cells, percent_label, title_indent, ProgressMode, ProgressRenderer, ProgressStyle,
    DEFAULT_EMPTY_GLYPH, DEFAULT_FULL_GLYPH, DEFAULT_WIDTH,
};
pub use sink::{MemorySink, OutputSink, TerminalSink};

/// Common progress utilities
pub mod utils {
    use std::time::Duration;

    /// Format bytes with appropriate units
    #[must_use]
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_possible_wrap
    )]
    pub fn format_bytes(bytes: u64) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
        const THRESHOLD: f64 = 1024.0;

        if bytes == 0 {
            return "0 B".to_string();
        }

        let bytes_f = bytes as f64;
        let unit_index = (bytes_f.log10() / THRESHOLD.log10()) as usize;
        let unit_index = unit_index.min(UNITS.len() - 1);

        let value = bytes_f / THRESHOLD.powi(unit_index as i32);

        if unit_index == 0 {
            format!("{bytes} B")
        } else {
            format!("{value:.1} {}", UNITS[unit_index])
        }
    }

    /// Format duration in human-readable form
    #[must_use]
    pub fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();

        if total_seconds < 60 {
            format!("{total_seconds}s")
        } else if total_seconds < 3600 {
            let minutes = total_seconds / 60;
            let seconds = total_seconds % 60;
            format!("{minutes}m {seconds}s")
        } else {
            let hours = total_seconds / 3600;
            let minutes = (total_seconds % 3600) / 60;
            format!("{hours}h {minutes}m")
        }
    }

}
