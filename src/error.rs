use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures while locating or reading the SSH config. All of them are fatal
/// for the session.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("SSH config not found at {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Failed to read SSH config at {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Could not resolve config path '{path}' to an absolute location")]
    UnresolvablePath {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Could not determine home directory")]
    HomeDirUnknown,
}

impl ConfigError {
    /// Classify a read failure: a missing file is reported separately from
    /// permission and other IO errors.
    pub fn from_read(path: PathBuf, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            ConfigError::NotFound { path }
        } else {
            ConfigError::Io { path, source }
        }
    }
}

/// Failures before a connection command could run.
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("Could not split command template: {0}")]
    InvalidTemplate(String),

    #[error("Command template is empty")]
    EmptyCommand,

    #[error("Failed to launch '{program}'")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
}

impl LaunchError {
    /// Exit status the process reports when the connection could not start.
    /// Follows the shell convention: 127 for a missing program, 126 when it
    /// is not executable.
    pub fn exit_code(&self) -> i32 {
        match self {
            LaunchError::Spawn { source, .. } => match source.kind() {
                io::ErrorKind::NotFound => 127,
                io::ErrorKind::PermissionDenied => 126,
                _ => 1,
            },
            LaunchError::InvalidTemplate(_) | LaunchError::EmptyCommand => 1,
        }
    }
}
