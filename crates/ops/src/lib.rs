#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! High-level operations orchestration for xcfetch
//!
//! This crate sits between the CLI and the network layer. Each operation
//! takes an [`OpsCtx`] carrying the HTTP client, the progress sink, a clock
//! and the effective configuration, and returns a value the CLI can render.

mod context;
mod large_ops;
mod small_ops;

pub use context::{Clock, FixedClock, OpsContextBuilder, OpsCtx, SystemClock};
pub use large_ops::download;
pub use small_ops::{authenticate, urls};

use serde::Serialize;
use xcfetch_errors::Error;
use xcfetch_types::{DownloadReport, Package, PackageUrls};

/// Operation result that can be serialized for CLI output
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum OperationResult {
    /// Endpoints for a package
    Urls(PackageUrls),
    /// Authorization succeeded; the token itself is never reported
    Authenticated { package: Package },
    /// Finished download
    Download(DownloadReport),
}

impl OperationResult {
    /// Convert to JSON string
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, Error> {
        serde_json::to_string_pretty(self).map_err(Error::from)
    }
}
