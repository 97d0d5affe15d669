//! Configurable HMAC signature validation for webhook and callback payloads.
//!
//! Providers canonicalize their fields differently before signing them. A
//! [`ValidatorConfig`] describes one convention (hash, digest encoding,
//! excluded fields, character substitutions, separators); [`Validator::new`]
//! compiles it once and [`Validator::verify`] rebuilds the signed string for
//! each request and compares digests in constant time.
//!
//! ```
//! use hmac_validator::{presets, Validator, VerificationRequest};
//!
//! let validator = Validator::new(presets::shopify()).unwrap();
//! let request = VerificationRequest::new("hush").payload(
//!     "shop=some-shop.myshopify.com&timestamp=1337178173\
//!      &signature=6e39a2ea9e497af6cb806720da1f1bf3\
//!      &hmac=c2812f39f84c32c2edaded339a1388abc9829babf351b684ab797f04cd94d4c7",
//! );
//! assert_eq!(validator.verify(&request), Ok(true));
//! ```

mod canonical;
mod errors;
mod hmac;
mod payload;
pub mod presets;
mod replacements;
mod validator;
mod validator_types;

pub use canonical::build_message;
pub use errors::{ConfigError, VerifyError};
pub use payload::decode_form;
pub use validator::{create_validator, Validator, DEFAULT_KEY_VALUE_SEPARATOR, DEFAULT_PAIR_SEPARATOR};
pub use validator_types::{
    DigestFormat, FieldMap, HashAlgorithm, Payload, ReplacementRules, ValidatorConfig,
    VerificationRequest,
};
