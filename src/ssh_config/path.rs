use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::ConfigError;

/// Where the config is read from when no path is given.
pub const DEFAULT_CONFIG_PATH: &str = "~/.ssh/config";

/// Expand a leading `~` to the home directory.
pub fn expand_tilde(raw: &str) -> Result<PathBuf, ConfigError> {
    if raw == "~" {
        return dirs::home_dir().ok_or(ConfigError::HomeDirUnknown);
    }
    if let Some(rest) = raw.strip_prefix("~/") {
        let home = dirs::home_dir().ok_or(ConfigError::HomeDirUnknown)?;
        return Ok(home.join(rest));
    }
    Ok(PathBuf::from(raw))
}

/// Expand and absolutize a user-supplied config path.
pub fn resolve_config_path(raw: &str) -> Result<PathBuf, ConfigError> {
    let expanded = expand_tilde(raw)?;
    std::path::absolute(&expanded).map_err(|source| ConfigError::UnresolvablePath {
        path: raw.to_string(),
        source,
    })
}

/// Create an empty config (and its directory) if none exists yet.
/// Returns whether a file was created.
pub fn ensure_config_exists(path: &Path) -> Result<bool, ConfigError> {
    if path.exists() {
        return Ok(false);
    }
    let to_error = |source: io::Error| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        create_private_dir(parent).map_err(to_error)?;
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .mode(0o600)
            .open(path)
            .map_err(to_error)?;
    }

    #[cfg(not(unix))]
    fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(to_error)?;

    info!(path = %path.display(), "Created empty SSH config");
    Ok(true)
}

fn create_private_dir(dir: &Path) -> io::Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o700);
    }
    builder.create(dir)
}
