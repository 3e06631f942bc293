//! Errors of the file layer. The prettifiers themselves never fail.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PrettifyError {
    #[error("File or folder not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Permission denied: {}", path.display())]
    PermissionDenied { path: PathBuf },

    /// The file is not valid UTF-8.
    #[error("Cannot decode {} as UTF-8: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: std::string::FromUtf8Error,
    },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Neither a supported stylesheet/markup file nor a directory.
    #[error("Not a CSS, SCSS or HTML file, nor a folder: {}", path.display())]
    UnsupportedTarget { path: PathBuf },

    #[error("Command `{command}` failed: {reason}")]
    Command { command: String, reason: String },

    /// The file watcher could not be set up or registered on `path`.
    #[error("Cannot watch {}: {source}", path.display())]
    Watch {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },

    #[error("Failed to walk {}: {source}", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

impl PrettifyError {
    /// Sorts an I/O error into the matching variant.
    pub fn from_io(path: &Path, source: io::Error) -> Self {
        let path = path.to_path_buf();
        match source.kind() {
            io::ErrorKind::NotFound => PrettifyError::NotFound { path },
            io::ErrorKind::PermissionDenied => PrettifyError::PermissionDenied { path },
            _ => PrettifyError::Io { path, source },
        }
    }
}

pub type Result<T> = std::result::Result<T, PrettifyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_io_kinds() {
        let path = Path::new("x.css");
        assert!(matches!(
            PrettifyError::from_io(path, io::Error::from(io::ErrorKind::NotFound)),
            PrettifyError::NotFound { .. }
        ));
        assert!(matches!(
            PrettifyError::from_io(path, io::Error::from(io::ErrorKind::PermissionDenied)),
            PrettifyError::PermissionDenied { .. }
        ));
        let other = PrettifyError::from_io(path, io::Error::other("disk on fire"));
        assert!(other.to_string().contains("disk on fire"));
    }
}
