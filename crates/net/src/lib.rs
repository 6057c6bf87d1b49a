#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Network operations for xcfetch
//!
//! This crate builds the package endpoints, performs the cookie-based
//! authorization handshake and streams package binaries to disk. All HTTP
//! goes through the [`HttpClient`] seam so tests can substitute it.

mod auth;
mod client;
pub mod cookie;
mod download;
mod urls;

pub use auth::{authenticate, AuthCookieExtractor};
pub use client::{BodyStream, HttpClient, HttpRequest, HttpResponse, NetClient, NetConfig};
pub use cookie::{Cookie, CookieOrigin};
pub use download::{download_package, download_to_file, partial_path, PARTIAL_SUFFIX};
pub use urls::{
    authentication_url, download_url, package_urls, AUTHENTICATION_BASE, DOWNLOAD_BASE,
};

// Re-exported so callers and test doubles need not depend on reqwest directly
pub use reqwest::header;
pub use reqwest::StatusCode;

use url::Url;
use xcfetch_errors::{Error, NetworkError};

/// Parse and validate a URL
///
/// # Errors
///
/// Returns an error if the URL string is malformed or invalid according to RFC 3986.
pub fn parse_url(url: &str) -> Result<Url, Error> {
    Url::parse(url).map_err(|e| NetworkError::InvalidUrl(e.to_string()).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_url() {
        assert!(parse_url("https://download.developer.apple.com").is_ok());
        assert!(parse_url("not a url").is_err());
    }
}
