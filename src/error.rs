use std::path::PathBuf;

use thiserror::Error;

/// Problems with the local project that stop a run before any network access.
#[derive(Error, Debug)]
pub enum SetupError {
    #[error("No package.json found at or above {path:?}. Run this in a Node.js project folder!")]
    ManifestMissing { path: PathBuf },

    #[error("Failed to parse package.json at {path:?}: {source}")]
    ManifestInvalid {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to read {path:?}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("No packages found in {path:?}. Try running `npm install` first!")]
    NoPackages { path: PathBuf },
}
