//! Streamed package download

use futures::StreamExt;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};
use url::Url;
use xcfetch_errors::{Error, NetworkError};
use xcfetch_types::{AuthSession, Package};

use crate::client::{HttpClient, HttpRequest, HttpResponse};
use crate::urls::download_url;

/// Suffix of the file a transfer is written to before it completes
pub const PARTIAL_SUFFIX: &str = "download";

/// `<dest>.download`
#[must_use]
pub fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest.file_name().unwrap_or_default().to_os_string();
    name.push(".");
    name.push(PARTIAL_SUFFIX);
    dest.with_file_name(name)
}

/// Download `package` with `session` attached, see [`download_to_file`]
///
/// # Errors
///
/// Returns an error if the URL cannot be built or the transfer fails.
pub async fn download_package<C, F>(
    client: &C,
    package: &Package,
    session: &AuthSession,
    dest: &Path,
    on_progress: F,
) -> Result<u64, Error>
where
    C: HttpClient + ?Sized,
    F: FnMut(u64, Option<u64>),
{
    let url = download_url(package)?;
    download_to_file(client, url, session, dest, on_progress).await
}

/// Stream `url` into `dest`
///
/// `on_progress(downloaded, total)` runs after every chunk on the task
/// driving the read loop. The body goes to `<dest>.download` and is renamed
/// into place once complete; a failed transfer removes the partial file.
/// Returns the number of bytes written.
///
/// # Errors
///
/// Returns an error for a non-success status, a transport failure, or an
/// I/O error writing the file.
pub async fn download_to_file<C, F>(
    client: &C,
    url: Url,
    session: &AuthSession,
    dest: &Path,
    mut on_progress: F,
) -> Result<u64, Error>
where
    C: HttpClient + ?Sized,
    F: FnMut(u64, Option<u64>),
{
    let request = HttpRequest::get(url.clone()).with_cookie(session.cookie_header());
    let response = client.send(request).await?;

    if !response.status().is_success() {
        return Err(NetworkError::HttpError {
            status: response.status().as_u16(),
            message: response.status().to_string(),
        }
        .into());
    }

    let total = response.content_length();
    info!(url = %url, total_bytes = ?total, "Download started");

    if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| Error::io_with_path(&e, parent))?;
    }

    let temp_path = partial_path(dest);
    match write_body(response, &temp_path, total, &mut on_progress).await {
        Ok(downloaded) => {
            tokio::fs::rename(&temp_path, dest)
                .await
                .map_err(|e| Error::io_with_path(&e, dest))?;
            info!(url = %url, bytes_downloaded = downloaded, "Download completed");
            Ok(downloaded)
        }
        Err(e) => {
            warn!(url = %url, error = %e, "Download failed");
            if let Err(remove_err) = tokio::fs::remove_file(&temp_path).await {
                debug!(
                    path = %temp_path.display(),
                    error = %remove_err,
                    "Could not remove partial file"
                );
            }
            Err(e)
        }
    }
}

async fn write_body<F>(
    response: HttpResponse,
    path: &Path,
    total: Option<u64>,
    on_progress: &mut F,
) -> Result<u64, Error>
where
    F: FnMut(u64, Option<u64>),
{
    let mut file = File::create(path)
        .await
        .map_err(|e| Error::io_with_path(&e, path))?;
    let mut stream = response.into_stream();
    let mut downloaded = 0u64;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk)
            .await
            .map_err(|e| Error::io_with_path(&e, path))?;

        downloaded += chunk.len() as u64;
        on_progress(downloaded, total);
    }

    file.flush()
        .await
        .map_err(|e| Error::io_with_path(&e, path))?;
    Ok(downloaded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_path() {
        assert_eq!(
            partial_path(Path::new("/tmp/Xcode_15.xip")),
            PathBuf::from("/tmp/Xcode_15.xip.download")
        );
        assert_eq!(
            partial_path(Path::new("Xcode_15.xip")),
            PathBuf::from("Xcode_15.xip.download")
        );
    }
}
