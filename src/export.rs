//! Artifact export.

use crate::error::ExportError;
use std::fs;
use std::path::{Path, PathBuf};

pub const RAW_LOG_FILE_NAME: &str = "raw-swiftlint-output.log";

/// Write the unannotated analyzer output into `deploy_dir`.
pub fn export_raw_log(deploy_dir: &Path, raw_output: &[u8]) -> Result<PathBuf, ExportError> {
    let path = deploy_dir.join(RAW_LOG_FILE_NAME);
    fs::create_dir_all(deploy_dir)
        .and_then(|_| fs::write(&path, raw_output))
        .map_err(|source| ExportError {
            path: path.clone(),
            source,
        })?;
    Ok(path)
}
