//! Endpoint construction for package downloads

use url::Url;
use xcfetch_errors::{Error, NetworkError};
use xcfetch_types::{Package, PackageUrls};

/// Host serving package binaries
pub const DOWNLOAD_BASE: &str = "https://download.developer.apple.com";

/// Service that hands out the download authorization cookie
pub const AUTHENTICATION_BASE: &str = "https://developerservices2.apple.com/services/download";

/// `https://download.developer.apple.com/<path>`, each segment percent-encoded
///
/// # Errors
///
/// Returns an error if the base URL cannot carry path segments.
pub fn download_url(package: &Package) -> Result<Url, Error> {
    let mut url = parse_base(DOWNLOAD_BASE)?;
    url.path_segments_mut()
        .map_err(|()| NetworkError::InvalidUrl(DOWNLOAD_BASE.to_string()))?
        .pop_if_empty()
        .extend(package.path().split('/').filter(|segment| !segment.is_empty()));
    Ok(url)
}

/// `https://developerservices2.apple.com/services/download?path=<path>`
///
/// # Errors
///
/// Returns an error if the base URL cannot be parsed.
pub fn authentication_url(package: &Package) -> Result<Url, Error> {
    let mut url = parse_base(AUTHENTICATION_BASE)?;
    url.query_pairs_mut().append_pair("path", package.path());
    Ok(url)
}

/// Both endpoints for `package`
///
/// # Errors
///
/// Returns an error if either URL cannot be built.
pub fn package_urls(package: &Package) -> Result<PackageUrls, Error> {
    Ok(PackageUrls {
        authentication: authentication_url(package)?.to_string(),
        download: download_url(package)?.to_string(),
    })
}

fn parse_base(base: &str) -> Result<Url, Error> {
    Url::parse(base).map_err(|e| NetworkError::InvalidUrl(e.to_string()).into())
}
