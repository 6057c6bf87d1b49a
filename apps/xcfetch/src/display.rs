//! Output rendering and formatting

use console::Style;
use std::io::{self, Write};
use xcfetch_ops::OperationResult;
use xcfetch_progress::utils::{format_bytes, format_duration};
use xcfetch_types::{DownloadReport, PackageUrls};

/// Output renderer for CLI results
#[derive(Clone)]
pub struct OutputRenderer {
    /// Use JSON output format
    json_output: bool,
    label: Style,
}

impl OutputRenderer {
    /// Create new output renderer
    pub fn new(json_output: bool) -> Self {
        Self {
            json_output,
            label: Style::new().bold(),
        }
    }

    /// Render operation result to stdout
    pub fn render_result(&self, result: &OperationResult) -> io::Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        self.write_result(&mut out, result)
    }

    /// Render operation result to `out`
    pub fn write_result(&self, out: &mut impl Write, result: &OperationResult) -> io::Result<()> {
        if self.json_output {
            let json = result.to_json().map_err(io::Error::other)?;
            writeln!(out, "{json}")
        } else {
            self.write_text(out, result)
        }
    }

    fn write_text(&self, out: &mut impl Write, result: &OperationResult) -> io::Result<()> {
        match result {
            OperationResult::Urls(urls) => self.write_urls(out, urls),
            OperationResult::Authenticated { package } => {
                writeln!(out, "Download authorized for {package}")
            }
            OperationResult::Download(report) => self.write_download(out, report),
        }
    }

    fn write_urls(&self, out: &mut impl Write, urls: &PackageUrls) -> io::Result<()> {
        writeln!(
            out,
            "{} {}",
            self.label.apply_to("Authentication:"),
            urls.authentication
        )?;
        writeln!(out, "{} {}", self.label.apply_to("Download:"), urls.download)
    }

    fn write_download(&self, out: &mut impl Write, report: &DownloadReport) -> io::Result<()> {
        let elapsed = report.duration().to_std().unwrap_or_default();
        writeln!(
            out,
            "{} {} ({}, {})",
            self.label.apply_to("Saved"),
            report.path.display(),
            format_bytes(report.bytes),
            format_duration(elapsed)
        )
    }
}
