#![allow(non_shorthand_field_patterns)]
#![doc = "Error handling primitives shared across the badge publisher."]
// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! The derive emitted by [`masterror::Error`] expands pattern matches that
//! trigger the `non_shorthand_field_patterns` lint, so the lint is disabled
//! for this module.

use std::path::{Path, PathBuf};

/// Unified error type returned by the library and the CLI.
///
/// Instances are typically constructed through the [`io_error`] and
/// [`badge_io_error`] helpers, the `validation`/`service` constructors, or by
/// converting from serde and [`masterror::AppError`] values.
#[derive(Debug, masterror::Error)]
pub enum Error {
    /// Wraps I/O errors that occur while reading configuration or README files.
    #[error("failed to read {path:?}: {source}")]
    Io {
        /// Location of the file being read.
        path:   PathBuf,
        /// Underlying I/O error.
        source: std::io::Error
    },
    /// Wraps YAML decoding errors.
    #[error("failed to parse configuration: {source}")]
    Parse {
        /// Source decoding error from serde_yaml.
        source: serde_yaml::Error
    },
    /// Returned when settings or inputs violate invariants.
    #[error("invalid configuration: {message}")]
    Validation {
        /// Human readable message describing the validation problem.
        message: String
    },
    /// Wraps serialization errors when writing plans as JSON.
    #[error("failed to serialize badge plans: {source}")]
    Serialize {
        /// Underlying serialization error.
        source: serde_json::Error
    },
    /// Wraps I/O errors that occur while writing badge images.
    #[error("failed to write badge image at {path:?}: {source}")]
    BadgeIo {
        /// Location of the image being produced.
        path:   PathBuf,
        /// Underlying I/O error reported by the operating system.
        source: std::io::Error
    },
    /// Service errors when interacting with the badge endpoint or release
    /// host.
    #[error("service error: {message}")]
    Service {
        /// Human readable message describing the service error.
        message: String
    },
    /// The version-control tool could not be run or reported a failure.
    #[error("git error: {message}")]
    Git {
        /// Human readable message including captured stderr.
        message: String
    },
    /// The README badge table is missing or malformed.
    #[error("invalid README badge table: {message}")]
    Readme {
        /// Human readable message describing the table problem.
        message: String
    },
    /// A module listed in the README has no tags.
    #[error("no tags found for module prefix '{prefix}'")]
    MissingModule {
        /// Module prefix referenced by the README table.
        prefix: String
    },
    /// Latest-version resolution was asked to compare an empty tag set.
    #[error("no tags to compare")]
    NoTags,
    /// Tags without a `/` prefix cannot be listed in the badge table.
    #[error("module prefix must not be empty; tags without '/' have no badge")]
    EmptyPrefix,
    /// A tag's version suffix is not `vMAJOR.MINOR.PATCH`.
    #[error("malformed version in tag '{tag}': {reason}")]
    MalformedVersion {
        /// Tag exactly as discovered.
        tag:    String,
        /// Why the suffix could not be decomposed.
        reason: String
    }
}

impl Error {
    /// Constructs a validation error from the provided displayable value.
    pub fn validation<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::Validation {
            message: message.into()
        }
    }

    /// Constructs a service error from the provided displayable value.
    pub fn service<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::Service {
            message: message.into()
        }
    }

    /// Constructs a README table error.
    pub fn readme<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::Readme {
            message: message.into()
        }
    }

    /// Constructs a [`Error::MalformedVersion`] for `tag`.
    pub fn malformed_version<T, R>(tag: T, reason: R) -> Self
    where
        T: Into<String>,
        R: Into<String>
    {
        Self::MalformedVersion {
            tag:    tag.into(),
            reason: reason.into()
        }
    }

    /// Formats the error for diagnostics without the variant name.
    ///
    /// Intended for CLI contexts; matches the [`std::fmt::Display`]
    /// implementation.
    pub fn to_display_string(&self) -> String {
        format!("{self}")
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(source: serde_yaml::Error) -> Self {
        Self::Parse {
            source
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Self::Serialize {
            source
        }
    }
}

impl From<masterror::AppError> for Error {
    fn from(error: masterror::AppError) -> Self {
        Self::Service {
            message: error.to_string()
        }
    }
}

/// Creates an [`Error::Io`] variant capturing the failing path and source.
///
/// # Parameters
///
/// * `path` - Location of the file that triggered the error.
/// * `source` - I/O error reported by the operating system.
pub fn io_error(path: &Path, source: std::io::Error) -> Error {
    Error::Io {
        path: path.to_path_buf(),
        source
    }
}

/// Creates an [`Error::BadgeIo`] variant capturing the failing path and source.
///
/// # Parameters
///
/// * `path` - Location of the badge image that triggered the error.
/// * `source` - I/O error reported by the operating system.
pub fn badge_io_error(path: &Path, source: std::io::Error) -> Error {
    Error::BadgeIo {
        path: path.to_path_buf(),
        source
    }
}

#[cfg(test)]
mod tests {
    use super::Error;

    #[test]
    fn validation_constructor_populates_message() {
        let error = Error::validation("something went wrong");
        match error {
            Error::Validation {
                ref message
            } => {
                assert_eq!(message, "something went wrong");
            }
            other => panic!("expected validation error, got {other:?}")
        }
    }

    #[test]
    fn to_display_string_matches_display() {
        let error = Error::readme("no table");
        assert_eq!(error.to_string(), error.to_display_string());
    }

    #[test]
    fn malformed_version_names_the_tag() {
        let error = Error::malformed_version("mod/v1.2", "expected 3 components, found 2");
        assert_eq!(
            error.to_string(),
            "malformed version in tag 'mod/v1.2': expected 3 components, found 2"
        );
    }

    #[test]
    fn missing_module_display() {
        let error = Error::MissingModule {
            prefix: "tools/lint".to_owned()
        };
        assert_eq!(error.to_string(), "no tags found for module prefix 'tools/lint'");
    }

    #[test]
    fn tag_input_errors_do_not_mention_configuration() {
        assert_eq!(Error::NoTags.to_string(), "no tags to compare");
        assert!(!Error::EmptyPrefix.to_string().contains("configuration"));
    }

    #[test]
    fn io_error_helper_wraps_path_and_source() {
        let path = std::path::Path::new("/tmp/README.md");
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let error = super::io_error(path, io_error);

        match error {
            Error::Io {
                path: ref stored_path,
                ref source
            } => {
                assert_eq!(stored_path, path);
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("expected io error, got {other:?}")
        }
    }

    #[test]
    fn serde_yaml_conversion_maps_to_parse_variant() {
        let error = serde_yaml::from_str::<usize>("not-a-number").unwrap_err();
        let mapped: Error = error.into();
        assert!(matches!(mapped, Error::Parse { .. }));
    }

    #[test]
    fn app_error_conversion_maps_to_service_variant() {
        let mapped: Error = masterror::AppError::service("upload rejected").into();
        assert!(matches!(mapped, Error::Service { .. }));
    }

    #[test]
    fn badge_io_error_helper_wraps_path_and_source() {
        let path = std::path::Path::new("/tmp/module.png");
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let error = super::badge_io_error(path, io_error);

        match error {
            Error::BadgeIo {
                path: ref stored_path,
                ref source
            } => {
                assert_eq!(stored_path, path);
                assert_eq!(source.kind(), std::io::ErrorKind::PermissionDenied);
            }
            other => panic!("expected badge io error, got {other:?}")
        }
    }
}
