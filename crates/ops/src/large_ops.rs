//! Package download: authorize, then stream to disk behind a progress bar

use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use xcfetch_config::Config;
use xcfetch_errors::Error;
use xcfetch_net::download_package;
use xcfetch_progress::utils::format_bytes;
use xcfetch_progress::{ansi, percent_label, OutputSink, ProgressMode, ProgressRenderer};
use xcfetch_types::{DownloadReport, Package};

use crate::OpsCtx;

/// Authorize and download `package`
///
/// `dest` may name a file or an existing directory; without it the package
/// lands in the configured download directory under its own file name.
///
/// Output is a two-step log followed by a percent bar. The bar is redrawn
/// only when the whole percentage changes, and not at all when the server
/// sends no `Content-Length`.
///
/// # Errors
///
/// Returns an error if authorization or the transfer fails, or if no
/// destination file name can be derived.
pub async fn download<S: OutputSink>(
    ctx: &mut OpsCtx<S>,
    package: &Package,
    dest: Option<&Path>,
) -> Result<DownloadReport, Error> {
    let dest = resolve_destination(&ctx.config, package, dest)?;
    let OpsCtx {
        client,
        sink,
        clock,
        config,
    } = ctx;
    let started_at = clock.now();

    let mut steps = ProgressRenderer::new(&mut *sink, ProgressMode::CountingMultiline);
    steps.update(1, 2, &format!("Authenticating for {package}"))?;
    let session = match xcfetch_net::authenticate(
        &**client,
        package,
        config.auth.session_cookie.as_deref(),
    )
    .await
    {
        Ok(session) => session,
        Err(e) => {
            if let Err(render) = steps.complete(false) {
                warn!(error = %render, "Failed to render error marker");
            }
            return Err(e);
        }
    };
    steps.update(2, 2, &format!("Downloading {}", dest.display()))?;
    drop(steps);

    let mut bar = ProgressRenderer::new(&mut *sink, ProgressMode::Percent)
        .with_style(config.progress.style());
    if let Some(title) = config
        .progress
        .title
        .as_deref()
        .or_else(|| package.file_name())
    {
        bar = bar.with_title(title);
    }

    let mut last_percent = None;
    // Set once the 100% frame has ended its line
    let mut line_ended = false;
    let mut render_error = None;
    let result = download_package(&**client, package, &session, &dest, |downloaded, total| {
        let Some(total) = total else {
            return;
        };
        let percent = percent_label(downloaded, total);
        if last_percent == Some(percent) && downloaded < total {
            return;
        }
        last_percent = Some(percent);

        let text = format!("{} / {}", format_bytes(downloaded), format_bytes(total));
        match bar.update(downloaded, total, &text) {
            Ok(()) => line_ended = downloaded >= total,
            Err(e) => {
                render_error.get_or_insert(e);
            }
        }
    })
    .await;

    if let Some(e) = render_error {
        warn!(error = %e, "Progress output failed");
    }

    match result {
        Ok(bytes) => {
            bar.complete(true)?;
            let finished_at = clock.now();
            info!(
                package = %package,
                path = %dest.display(),
                bytes,
                "Download finished"
            );
            Ok(DownloadReport {
                package: package.clone(),
                path: dest,
                bytes,
                started_at,
                finished_at,
            })
        }
        Err(e) => {
            let rendered = erase_bar(&mut bar, line_ended).and_then(|()| bar.complete(false));
            if let Err(render) = rendered {
                warn!(error = %render, "Failed to render error marker");
            }
            Err(e)
        }
    }
}

/// Erase the bar and its title before the error marker
///
/// A finished frame already moved to the next line, so step back onto it
/// first.
fn erase_bar<S: OutputSink>(bar: &mut ProgressRenderer<S>, line_ended: bool) -> io::Result<()> {
    if line_ended {
        bar.sink_mut().write(ansi::CURSOR_UP)?;
    }
    bar.clear()
}

/// Where the package file should be written
///
/// An existing directory gets the package file name appended.
fn resolve_destination(
    config: &Config,
    package: &Package,
    dest: Option<&Path>,
) -> Result<PathBuf, Error> {
    let file_name = || {
        package.file_name().ok_or_else(|| {
            Error::internal(format!("package path '{}' has no file name", package.path()))
        })
    };

    let resolved = match dest {
        Some(dest) if dest.is_dir() => dest.join(file_name()?),
        Some(dest) => dest.to_path_buf(),
        None => config.download_dir().join(file_name()?),
    };
    debug!(path = %resolved.display(), "Resolved download destination");
    Ok(resolved)
}
