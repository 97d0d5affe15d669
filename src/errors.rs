//! Error types for validator construction and verification.

use thiserror::Error;

/// Raised while building a validator from its configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A mandatory option was not supplied
    #[error("Configuration is missing required option `{0}` (required: algorithm, format (outputEncoding))")]
    MissingOption(&'static str),

    /// A replacement table key is not exactly one character
    #[error("Invalid replacement in `{table}` table: key {key:?} must be exactly 1 character")]
    InvalidReplacementKey {
        /// Which table held the key (`keys`, `values` or `both`)
        table: &'static str,
        /// The offending key
        key: String,
    },

    /// Hash algorithm name not recognized
    #[error("Unknown hash algorithm: {0}")]
    UnknownAlgorithm(String),

    /// Digest output format not recognized
    #[error("Unknown digest format: {0}")]
    UnknownFormat(String),

    /// Configuration document could not be parsed
    #[error("Invalid configuration document: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Raised by a single verification call. A signature mismatch is not an error.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VerifyError {
    /// Payload given without a digest, and no digest field configured
    #[error("Digest should be provided because no digest field was configured")]
    DigestMissing,

    /// Secret absent or empty
    #[error("A non-empty secret is required to verify a signature")]
    SecretMissing,

    /// The MAC rejected the key
    #[error("Invalid key for keyed hash")]
    InvalidKey,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ConfigError::MissingOption("algorithm");
        assert!(err.to_string().contains("`algorithm`"));

        let err = ConfigError::InvalidReplacementKey { table: "both", key: "too".into() };
        assert!(err.to_string().contains("exactly 1 character"));
        assert!(err.to_string().contains("\"too\""));

        assert_ne!(VerifyError::DigestMissing, VerifyError::SecretMissing);
    }
}
