//! Stateful progress animation

use std::io;

use crate::ansi;
use crate::sink::OutputSink;

pub const DEFAULT_WIDTH: usize = 60;
pub const DEFAULT_FULL_GLYPH: &str = "=";
pub const DEFAULT_EMPTY_GLYPH: &str = "-";

/// Label and opening bracket of a two-digit percent bar. Title centering
/// assumes this width regardless of the actual label.
const PERCENT_PREFIX: &str = "99% [";

/// How `update` calls are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProgressMode {
    /// Glyph bar with a percentage label, overwritten in place
    #[default]
    Percent,
    /// `[step/total] text`, erased and redrawn on every update
    Counting,
    /// `[step/total] text`, one new line per update
    CountingMultiline,
}

/// Bar geometry and glyphs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressStyle {
    pub width: usize,
    pub full_glyph: String,
    pub empty_glyph: String,
}

impl Default for ProgressStyle {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            full_glyph: DEFAULT_FULL_GLYPH.to_string(),
            empty_glyph: DEFAULT_EMPTY_GLYPH.to_string(),
        }
    }
}

/// Filled and empty cell counts for a bar of `width` cells
///
/// `filled = floor(width * step / total)`, capped at `width`. A zero total
/// counts as finished.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn bar_cells(step: u64, total: u64, width: usize) -> (usize, usize) {
    let filled = if total == 0 {
        width
    } else {
        let raw = u128::from(step) * width as u128 / u128::from(total);
        usize::try_from(raw).unwrap_or(usize::MAX).min(width)
    };
    (filled, width - filled)
}

/// `floor(100 * step / total)`; a zero total reads as 100
#[must_use]
pub fn percent_label(step: u64, total: u64) -> u64 {
    if total == 0 {
        return 100;
    }
    let raw = u128::from(step) * 100 / u128::from(total);
    u64::try_from(raw).unwrap_or(u64::MAX)
}

/// Leading spaces that center a title over a percent bar
///
/// Always offsets by the five characters of `"99% ["`, so one- and
/// three-digit labels end up slightly off center.
#[must_use]
pub fn title_indent(width: usize, title_len: usize) -> usize {
    width.saturating_sub(title_len) / 2 + PERCENT_PREFIX.len()
}

/// Animation engine driven by repeated [`update`](Self::update) calls and
/// finished with [`complete`](Self::complete) or [`clear`](Self::clear).
///
/// `step <= total` is the caller's responsibility. Neither `complete` nor
/// `clear` is guarded; calling anything after them just writes more output.
#[derive(Debug)]
pub struct ProgressRenderer<S: OutputSink> {
    sink: S,
    mode: ProgressMode,
    style: ProgressStyle,
    title: Option<String>,
    title_printed: bool,
}

impl<S: OutputSink> ProgressRenderer<S> {
    pub fn new(sink: S, mode: ProgressMode) -> Self {
        Self {
            sink,
            mode,
            style: ProgressStyle::default(),
            title: None,
            title_printed: false,
        }
    }

    /// Print `title` in bold blue above the first frame
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Bar width in cells; zero is bumped to one
    #[must_use]
    pub fn with_width(mut self, width: usize) -> Self {
        self.style.width = width.max(1);
        self
    }

    #[must_use]
    pub fn with_glyphs(mut self, full: impl Into<String>, empty: impl Into<String>) -> Self {
        self.style.full_glyph = full.into();
        self.style.empty_glyph = empty.into();
        self
    }

    #[must_use]
    pub fn with_style(self, style: ProgressStyle) -> Self {
        let ProgressStyle {
            width,
            full_glyph,
            empty_glyph,
        } = style;
        self.with_width(width).with_glyphs(full_glyph, empty_glyph)
    }

    #[must_use]
    pub fn style(&self) -> &ProgressStyle {
        &self.style
    }

    #[must_use]
    pub fn title_printed(&self) -> bool {
        self.title_printed
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Direct access for output outside the frame protocol
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Draw one frame
    ///
    /// # Errors
    ///
    /// Returns an error if the sink cannot be written.
    pub fn update(&mut self, step: u64, total: u64, text: &str) -> io::Result<()> {
        self.print_title_once()?;

        match self.mode {
            ProgressMode::Percent => {
                let (filled, empty) = bar_cells(step, total, self.style.width);
                let mut line = format!(
                    "{}% [{}{}]",
                    percent_label(step, total),
                    self.style.full_glyph.repeat(filled),
                    self.style.empty_glyph.repeat(empty),
                );
                if !text.is_empty() {
                    line.push(' ');
                    line.push_str(text);
                }
                if step >= total {
                    line.push('\n');
                }
                self.sink.write(&line)
            }
            ProgressMode::Counting => {
                self.sink.clear()?;
                let mut line = format!("[{step}/{total}] {text}");
                if step >= total {
                    line.push('\n');
                }
                self.sink.write(&line)
            }
            ProgressMode::CountingMultiline => {
                self.sink.write(&format!("[{step}/{total}] {text}\n"))
            }
        }
    }

    /// Print the final `[ OK ]` or `[ Error ]` marker
    ///
    /// # Errors
    ///
    /// Returns an error if the sink cannot be written.
    pub fn complete(&mut self, success: bool) -> io::Result<()> {
        if success {
            self.sink.write("[ OK ]\n")
        } else {
            self.sink.write("[ Error ]\n")
        }
    }

    /// Erase the current frame, and the title line above it if one was printed
    ///
    /// # Errors
    ///
    /// Returns an error if the sink cannot be written.
    pub fn clear(&mut self) -> io::Result<()> {
        self.sink.clear()?;
        if self.title_printed {
            self.sink.write(ansi::CURSOR_UP)?;
            self.sink.clear()?;
        }
        Ok(())
    }

    fn print_title_once(&mut self) -> io::Result<()> {
        if self.title_printed {
            return Ok(());
        }
        let Some(title) = self.title.as_deref() else {
            return Ok(());
        };

        let indent = match self.mode {
            ProgressMode::Percent => title_indent(self.style.width, title.chars().count()),
            ProgressMode::Counting | ProgressMode::CountingMultiline => 0,
        };
        let line = format!("{}{}\n", " ".repeat(indent), ansi::bold_blue(title));
        self.sink.write(&line)?;
        self.title_printed = true;
        Ok(())
    }
}
