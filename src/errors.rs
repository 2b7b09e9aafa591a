//! Build error taxonomy.
//!
//! Every failure in the core is one of three kinds: bad configuration,
//! an unsatisfiable requirement, or a filesystem failure while staging.
//! All of them are fatal; nothing in berth retries.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::resolver::errors::ResolveError;
use crate::util::diagnostic::{suggestions, Diagnostic};

/// A fatal error surfaced to the orchestrator.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Malformed or missing fields in the manifest, a profile or a package.
    #[error("{message}")]
    Configuration {
        message: String,
        location: Option<PathBuf>,
    },

    /// A requirement the dependency engine cannot satisfy.
    #[error(transparent)]
    Resolution(#[from] ResolveError),

    /// Reading or writing the filesystem failed.
    #[error("failed to {action} `{}`", path.display())]
    Filesystem {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl BuildError {
    pub fn configuration(message: impl Into<String>) -> Self {
        BuildError::Configuration {
            message: message.into(),
            location: None,
        }
    }

    /// A TOML document that failed to parse, with the error's line and
    /// column when toml reports a span.
    pub fn invalid_toml(what: &str, path: &Path, contents: &str, err: &toml::de::Error) -> Self {
        let position = err
            .span()
            .map(|span| {
                let before = &contents[..span.start.min(contents.len())];
                let line = before.matches('\n').count() + 1;
                let column = before.len() - before.rfind('\n').map(|i| i + 1).unwrap_or(0) + 1;
                format!(" at line {}, column {}", line, column)
            })
            .unwrap_or_default();
        BuildError::Configuration {
            message: format!("invalid {}{}: {}", what, position, err.message()),
            location: Some(path.to_path_buf()),
        }
    }

    pub fn filesystem(action: &'static str, path: &Path, source: io::Error) -> Self {
        BuildError::Filesystem {
            action,
            path: path.to_path_buf(),
            source,
        }
    }

    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            BuildError::Configuration { message, location } => {
                let mut diag = Diagnostic::error(message.clone());
                if let Some(path) = location {
                    diag = diag.with_location(path);
                }
                diag
            }
            BuildError::Resolution(err) => err.to_diagnostic(),
            BuildError::Filesystem { source, .. } => {
                let mut diag = Diagnostic::error(self.to_string()).with_context(source.to_string());
                if source.kind() == io::ErrorKind::PermissionDenied {
                    diag = diag.with_suggestion(suggestions::PERMISSION_DENIED);
                }
                diag
            }
        }
    }
}
