//! Error types for the tagged-union codec.

use std::fmt;

/// The discriminator value found (or not found) in a payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Discriminator {
    /// The discriminator field was absent.
    Missing,
    /// The raw value of the discriminator field. Non-string values are kept
    /// in their JSON text form, e.g. `5` or `null`.
    Value(String),
}

impl Discriminator {
    /// Returns the raw value, or `None` when the field was missing.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Discriminator::Missing => None,
            Discriminator::Value(v) => Some(v),
        }
    }
}

impl fmt::Display for Discriminator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Discriminator::Missing => write!(f, "<missing>"),
            Discriminator::Value(v) => write!(f, "{:?}", v),
        }
    }
}

/// A union declaration is malformed.
///
/// Detected when the union's descriptor is built. The error is cached with the
/// descriptor, so every later use of the union reports it again.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    #[error(
        "union `{union}`: variants `{first}` and `{second}` both declare discriminator `{discriminator}`"
    )]
    DuplicateDiscriminator {
        union: &'static str,
        discriminator: &'static str,
        first: &'static str,
        second: &'static str,
    },

    #[error("union `{union}`: variant `{variant}` declares no discriminator")]
    MissingDiscriminator {
        union: &'static str,
        variant: &'static str,
    },

    #[error("union `{union}` has an empty discriminator field name")]
    EmptyField { union: &'static str },

    #[error("union `{union}` has no variants")]
    NoVariants { union: &'static str },
}

/// The discriminator was absent or matched no registered variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown `{union}` variant: field `{field}` is {discriminator}")]
pub struct UnknownVariantError {
    pub union: &'static str,
    pub field: &'static str,
    pub discriminator: Discriminator,
}

/// The discriminator matched, but the payload does not fit the variant's shape.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed `{union}::{variant}` (discriminator `{discriminator}`): {detail}")]
pub struct MalformedVariantError {
    pub union: &'static str,
    pub variant: &'static str,
    pub discriminator: &'static str,
    /// Field-level description of the mismatch, as reported by the decoder.
    pub detail: String,
}

/// Any failure of the codec.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    UnknownVariant(#[from] UnknownVariantError),

    #[error(transparent)]
    MalformedVariant(#[from] MalformedVariantError),

    #[error("expected a JSON object for union `{union}`, found {found}")]
    ExpectedObject {
        union: &'static str,
        found: &'static str,
    },

    #[error("expected a JSON array of union `{union}`, found {found}")]
    ExpectedArray {
        union: &'static str,
        found: &'static str,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CodecError {
    /// Returns the unknown-variant details, if this is one.
    pub fn as_unknown_variant(&self) -> Option<&UnknownVariantError> {
        match self {
            CodecError::UnknownVariant(e) => Some(e),
            _ => None,
        }
    }

    /// Returns the malformed-variant details, if this is one.
    pub fn as_malformed_variant(&self) -> Option<&MalformedVariantError> {
        match self {
            CodecError::MalformedVariant(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_discriminator_display() {
        let err = UnknownVariantError {
            union: "PaymentMethod",
            field: "type",
            discriminator: Discriminator::Missing,
        };
        assert_eq!(
            err.to_string(),
            "unknown `PaymentMethod` variant: field `type` is <missing>"
        );
    }

    #[test]
    fn test_unknown_discriminator_display() {
        let err = UnknownVariantError {
            union: "PaymentMethod",
            field: "type",
            discriminator: Discriminator::Value("card".into()),
        };
        assert_eq!(
            err.to_string(),
            "unknown `PaymentMethod` variant: field `type` is \"card\""
        );
        assert_eq!(err.discriminator.as_str(), Some("card"));
    }
}
