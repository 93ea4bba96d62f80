// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error type shared by every boundary operation.

use std::fmt;

/// Errors returned by sgbridge operations.
///
/// Every failure a caller can observe is one of these variants; nothing is
/// reported through panics.
///
/// # Example
///
/// ```rust
/// use sgbridge::{factory, marshal, Error};
///
/// let kernel = factory::create_kernel("GaussianKernel").unwrap();
/// match marshal::get(&kernel, "no_such_param") {
///     Err(Error::ParameterNotFound { object, parameter }) => {
///         assert_eq!(object, "GaussianKernel");
///         assert_eq!(parameter, "no_such_param");
///     }
///     other => panic!("unexpected: {:?}", other.map(|(d, _)| d)),
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    // ========================================================================
    // Marshalling Errors
    // ========================================================================
    /// Supplied value kind or object family is incompatible with the slot.
    TypeMismatch {
        /// `Object::parameter` once known, empty while still inside an accessor.
        location: String,
        expected: String,
        got: String,
    },
    /// Name is absent from the object's parameter directory.
    ParameterNotFound { object: String, parameter: String },
    /// Object-valued parameter currently holds no object.
    EmptySlot { location: String },
    /// Operation or element kind is not supported (e.g. vector `put_array`).
    UnsupportedOperation(String),

    // ========================================================================
    // Object Errors
    // ========================================================================
    /// A factory could not build the requested object.
    ConstructionFailure(String),
    /// A handle of the wrong family was passed to a family-specific operation.
    InvariantViolation(String),
    /// A collaborator (train, apply, init, evaluate, file read) failed.
    Collaborator(String),
}

impl Error {
    /// Type mismatch without a location (filled in later with [`Error::at`]).
    pub fn mismatch(expected: impl Into<String>, got: impl Into<String>) -> Self {
        Error::TypeMismatch {
            location: String::new(),
            expected: expected.into(),
            got: got.into(),
        }
    }

    /// Attach `object::parameter` to location-less errors.
    #[must_use]
    pub fn at(self, object: &str, parameter: &str) -> Self {
        match self {
            Error::TypeMismatch {
                location,
                expected,
                got,
            } if location.is_empty() => Error::TypeMismatch {
                location: format!("{}::{}", object, parameter),
                expected,
                got,
            },
            Error::EmptySlot { location } if location.is_empty() => Error::EmptySlot {
                location: format!("{}::{}", object, parameter),
            },
            other => other,
        }
    }

    /// True for [`Error::TypeMismatch`].
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, Error::TypeMismatch { .. })
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::TypeMismatch {
                location,
                expected,
                got,
            } => {
                if location.is_empty() {
                    write!(f, "Type mismatch: expected {}, got {}", expected, got)
                } else {
                    write!(
                        f,
                        "Type mismatch for {}: expected {}, got {}",
                        location, expected, got
                    )
                }
            }
            Error::ParameterNotFound { object, parameter } => {
                write!(f, "Could not find parameter {}::{}", object, parameter)
            }
            Error::EmptySlot { location } => write!(f, "Parameter {} holds no object", location),
            Error::UnsupportedOperation(msg) => write!(f, "Unsupported operation: {}", msg),
            Error::ConstructionFailure(msg) => write!(f, "{}", msg),
            Error::InvariantViolation(msg) => write!(f, "{}", msg),
            Error::Collaborator(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for Error {}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_at_fills_location_once() {
        let err = Error::mismatch("int32", "float64").at("KNN", "k");
        assert_eq!(
            err.to_string(),
            "Type mismatch for KNN::k: expected int32, got float64"
        );

        // A second call must not overwrite the first location
        let err = err.at("Other", "param");
        assert!(err.to_string().contains("KNN::k"));
    }

    #[test]
    fn test_at_leaves_other_variants_alone() {
        let err = Error::UnsupportedOperation("vectors".into()).at("KNN", "k");
        assert_eq!(err, Error::UnsupportedOperation("vectors".into()));
    }
}
