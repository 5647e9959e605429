//! Error types for the assort crate.

use thiserror::Error;

/// Errors raised by collection, filter and mapper operations.
///
/// Failures inside caller-supplied callbacks are not represented here: the
/// `try_*` traversal methods are generic over the callback's error type and
/// hand it back untouched.
#[derive(Debug, Error)]
pub enum CollectionError {
    /// A set operation received a collection of another concrete type.
    #[error("other collection must be of the same type (expected {expected}, got {actual})")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    /// The mapper has no extractor pair registered for this collection type.
    #[error("invalid collection: {kind}")]
    InvalidCollection { kind: &'static str },

    /// The mapper was asked to register a collection type it cannot serve.
    #[error("invalid collection class: {kind}")]
    InvalidCollectionClass { kind: &'static str },

    /// Invalid regular expression pattern in a pattern filter.
    #[error("invalid key pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// A required enum key was read before being set.
    #[error("missing required key: \"{key}\"")]
    RequiredKeyMissing { key: &'static str },

    /// A required enum key was removed while set.
    #[error("removing required key: \"{key}\"")]
    RemovingRequiredKey { key: &'static str },

    /// A string does not name any case of the key enum.
    #[error("\"{key}\" is not a valid case for enum \"{kind}\"")]
    InvalidEnumKey { key: String, kind: &'static str },
}

/// Result type for collection operations.
pub type Result<T> = std::result::Result<T, CollectionError>;
