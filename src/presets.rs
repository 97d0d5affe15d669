//! Ready-made configurations for providers whose signing conventions are known.
//!
//! These are plain [`ValidatorConfig`] values; the caller decides which one
//! applies to a request and may adjust it before compiling.

use crate::validator_types::{DigestFormat, HashAlgorithm, ReplacementRules, ValidatorConfig};

/// Shopify OAuth / app proxy query strings.
///
/// The signed message is the sorted query string without `signature` and
/// `hmac`, with `&` and `%` re-encoded everywhere and `=` re-encoded in names.
/// The digest travels in the `hmac` field.
pub fn shopify() -> ValidatorConfig {
    ValidatorConfig::new(HashAlgorithm::Sha256, DigestFormat::Hex)
        .exclude(["signature", "hmac"])
        .with_replacements(
            ReplacementRules::new()
                .both("&", "%26")
                .both("%", "%25")
                .key("=", "%3D"),
        )
        .with_digest_field("hmac")
}

/// Twilio request signatures (`X-Twilio-Signature`).
///
/// Pass the full request URL as the prefix and the POST parameters as fields;
/// names and values are concatenated with no separators.
pub fn twilio() -> ValidatorConfig {
    ValidatorConfig::new(HashAlgorithm::Sha1, DigestFormat::Base64).with_separators("", "")
}

/// Pusher channel authentication.
///
/// Pass `socket_id:channel_name[:channel_data]` as the prefix and no payload.
pub fn pusher() -> ValidatorConfig {
    ValidatorConfig::new(HashAlgorithm::Sha256, DigestFormat::Hex)
}
