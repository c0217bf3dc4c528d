use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use tracing::debug;

use crate::error::{Error, Result};

/// Default filename for the map extract.
const DATASET_FILENAME: &str = "map.db";

/// Environment variable overriding the extract location.
pub const DATASET_ENV_VAR: &str = "BEARMAPS_DATASET";

/// Resolve the default extract location using platform-specific project directories.
pub fn default_dataset_path() -> Result<PathBuf> {
    let dirs =
        ProjectDirs::from("org", "bearmaps", "bearmaps").ok_or(Error::ProjectDirsUnavailable)?;
    Ok(dirs.data_dir().join(DATASET_FILENAME))
}

/// Locate the map extract on disk.
///
/// The resolution order is:
/// 1. Explicit `target` argument when provided.
/// 2. `BEARMAPS_DATASET` environment variable.
/// 3. Platform-specific project data directory.
///
/// The chosen file must exist; nothing is downloaded or created.
pub fn resolve_dataset_path(target: Option<&Path>) -> Result<PathBuf> {
    resolve_with(target, env::var_os(DATASET_ENV_VAR))
}

fn resolve_with(target: Option<&Path>, env_value: Option<OsString>) -> Result<PathBuf> {
    let path = match (target, env_value) {
        (Some(explicit), _) => explicit.to_path_buf(),
        (None, Some(value)) if !value.is_empty() => PathBuf::from(value),
        _ => default_dataset_path()?,
    };

    if !path.is_file() {
        return Err(Error::DatasetNotFound { path });
    }
    debug!(path = %path.display(), "resolved map extract");
    Ok(path)
}
