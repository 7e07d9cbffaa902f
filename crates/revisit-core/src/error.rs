//! Error types
//!
//! The scheduling math itself is total: out-of-range inputs are clamped and
//! logged rather than rejected. Only configuration handling, item reference
//! parsing and the suspension guard of [`crate::ReviewEngine`] can fail.

use crate::item::ItemRef;

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Configuration error type
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error while reading a configuration file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Malformed TOML
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Configuration that cannot be rendered as TOML
    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    /// A value that parses but cannot be used
    #[error("Invalid value for `{field}`: {reason}")]
    Invalid {
        /// Dotted path of the offending field
        field: &'static str,
        /// Why it was rejected
        reason: String,
    },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Engine error type
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration could not be loaded or validated
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    /// A review was submitted for a suspended item
    #[error("Item is suspended: {0}")]
    Suspended(ItemRef),
    /// An item reference string could not be parsed
    #[error("Invalid item reference: {0}")]
    InvalidItemRef(String),
}

/// Engine result type
pub type Result<T> = std::result::Result<T, EngineError>;

// ============================================================================
// TESTS
// ============================================================================
