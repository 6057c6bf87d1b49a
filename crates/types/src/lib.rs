#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Core type definitions for xcfetch
//!
//! This crate provides the plain data passed between the network, progress
//! and operations layers: package descriptors, the download session and the
//! reports handed back to the CLI.

pub mod package;
pub mod reports;

// Re-export commonly used types
pub use package::{Package, PackageKind};
pub use reports::{DownloadReport, PackageUrls};

use std::fmt;

/// Name of the cookie that authorizes binary package downloads.
pub const DOWNLOAD_AUTH_COOKIE: &str = "ADCDownloadAuth";

/// Session produced by one successful authentication call.
///
/// Held by the caller for the lifetime of a single download and dropped
/// afterwards. The token is never persisted and never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthSession {
    cookie_value: String,
}

impl AuthSession {
    /// Wrap an extracted `ADCDownloadAuth` cookie value
    pub fn new(cookie_value: impl Into<String>) -> Self {
        Self {
            cookie_value: cookie_value.into(),
        }
    }

    /// The raw cookie value
    #[must_use]
    pub fn cookie_value(&self) -> &str {
        &self.cookie_value
    }

    /// Value for a `Cookie` request header carrying this session
    #[must_use]
    pub fn cookie_header(&self) -> String {
        format!("{DOWNLOAD_AUTH_COOKIE}={}", self.cookie_value)
    }
}

impl fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSession")
            .field("cookie_value", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_cookie_header() {
        let session = AuthSession::new("TOKEN");
        assert_eq!(session.cookie_header(), "ADCDownloadAuth=TOKEN");
        assert_eq!(session.cookie_value(), "TOKEN");
    }

    #[test]
    fn test_session_debug_redacts_token() {
        let session = AuthSession::new("s3cr3t");
        let debug = format!("{session:?}");
        assert!(!debug.contains("s3cr3t"));
        assert!(debug.contains("redacted"));
    }
}
