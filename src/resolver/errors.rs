//! Resolution error types and diagnostics.

use thiserror::Error;

use crate::util::diagnostic::Diagnostic;

/// A requirement the dependency engine could not satisfy.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("package not found: `{package}`")]
    PackageNotFound {
        package: String,
        suggestions: Vec<String>,
    },

    #[error("no matching version for `{package}`")]
    NoMatchingVersion {
        package: String,
        requirement: String,
        available: Vec<String>,
    },

    #[error("`{package}` is required more than once")]
    DuplicateRequirement {
        package: String,
        first: String,
        second: String,
    },

    #[error("`{package}` has no option `{option}`")]
    UnknownOption {
        package: String,
        option: String,
        known: Vec<String>,
    },
}

impl ResolveError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ResolveError::PackageNotFound {
                package,
                suggestions,
            } => {
                let mut diag = Diagnostic::error(format!(
                    "package `{}` is not in the package store",
                    package
                ));

                if !suggestions.is_empty() {
                    diag = diag.with_context(format!(
                        "similar packages: {}",
                        suggestions.join(", ")
                    ));
                }

                diag.with_suggestion("Check the spelling of the requirement")
                    .with_suggestion("Pass `--store <dir>` to point at another package store")
            }

            ResolveError::NoMatchingVersion {
                package,
                requirement,
                available,
            } => {
                let mut diag = Diagnostic::error(format!(
                    "no version of `{}` matches `{}`",
                    package, requirement
                ));

                if !available.is_empty() {
                    diag = diag.with_context(format!(
                        "available versions: {}",
                        available.join(", ")
                    ));
                }

                diag.with_suggestion(format!(
                    "Update your version requirement for `{}`",
                    package
                ))
            }

            ResolveError::DuplicateRequirement {
                package,
                first,
                second,
            } => Diagnostic::error(format!("`{}` is required more than once", package))
                .with_context(format!("first declared as `{}`", first))
                .with_context(format!("declared again as `{}`", second))
                .with_suggestion(format!(
                    "Remove `{}` from Berth.toml if a platform rule already provides it",
                    package
                )),

            ResolveError::UnknownOption {
                package,
                option,
                known,
            } => {
                let mut diag = Diagnostic::error(format!(
                    "`{}` does not declare option `{}`",
                    package, option
                ));

                if known.is_empty() {
                    diag = diag.with_context(format!("`{}` declares no options", package));
                } else {
                    diag = diag.with_context(format!("known options: {}", known.join(", ")));
                }

                diag
            }
        }
    }
}
