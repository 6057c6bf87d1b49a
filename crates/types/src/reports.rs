//! Operation reports handed back to the CLI

use crate::Package;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The two endpoints a package is fetched through
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageUrls {
    pub authentication: String,
    pub download: String,
}

/// Outcome of a completed download
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadReport {
    pub package: Package,
    pub path: PathBuf,
    pub bytes: u64,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl DownloadReport {
    /// Wall-clock duration of the transfer
    #[must_use]
    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}
