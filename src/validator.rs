use std::collections::HashSet;

use tracing::{debug, trace, warn};

use crate::canonical;
use crate::errors::{ConfigError, VerifyError};
use crate::payload;
use crate::replacements::CompiledReplacements;
use crate::validator_types::{
    DigestFormat, FieldMap, HashAlgorithm, Payload, ValidatorConfig, VerificationRequest,
};

pub const DEFAULT_KEY_VALUE_SEPARATOR: &str = "=";
pub const DEFAULT_PAIR_SEPARATOR: &str = "&";

const FORMAT_OPTION: &str = "format (outputEncoding)";

/// A compiled, immutable validator.
///
/// All configuration checks happen in [`Validator::new`]; [`Validator::verify`]
/// only reads from `self`, so one instance can serve any number of threads.
#[derive(Clone, Debug)]
pub struct Validator {
    algorithm: HashAlgorithm,
    format: DigestFormat,
    excluded_fields: HashSet<String>,
    replacements: Option<CompiledReplacements>,
    key_value_separator: String,
    pair_separator: String,
    digest_field: Option<String>,
}

impl Validator {
    pub fn new(config: ValidatorConfig) -> Result<Self, ConfigError> {
        let algorithm = config.algorithm.ok_or(ConfigError::MissingOption("algorithm"))?;
        let format = config.format.ok_or(ConfigError::MissingOption(FORMAT_OPTION))?;

        let digest_field = config.digest_field.filter(|name| !name.is_empty());
        let mut excluded_fields: HashSet<String> = config.excluded_fields.into_iter().collect();
        if let Some(name) = &digest_field {
            excluded_fields.insert(name.clone());
        }

        let replacements = match &config.replacements {
            Some(rules) => CompiledReplacements::compile(rules)?,
            None => None,
        };

        let validator = Self {
            algorithm,
            format,
            excluded_fields,
            replacements,
            key_value_separator: config
                .key_value_separator
                .unwrap_or_else(|| DEFAULT_KEY_VALUE_SEPARATOR.to_string()),
            pair_separator: config
                .pair_separator
                .unwrap_or_else(|| DEFAULT_PAIR_SEPARATOR.to_string()),
            digest_field,
        };

        debug!(
            algorithm = %validator.algorithm,
            format = %validator.format,
            excluded = validator.excluded_fields.len(),
            replacements = validator.replacements.is_some(),
            "compiled hmac validator"
        );

        Ok(validator)
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    pub fn format(&self) -> DigestFormat {
        self.format
    }

    pub fn excluded_fields(&self) -> &HashSet<String> {
        &self.excluded_fields
    }

    pub fn digest_field(&self) -> Option<&str> {
        self.digest_field.as_deref()
    }

    /// Checks the request's signature.
    ///
    /// `Ok(false)` is a signature mismatch. `Err` means the call itself was
    /// unusable (no secret, or nothing to compare against).
    pub fn verify(&self, request: &VerificationRequest) -> Result<bool, VerifyError> {
        if request.secret.is_empty() {
            warn!(algorithm = %self.algorithm, "signature verification attempted without a secret");
            return Err(VerifyError::SecretMissing);
        }

        let fields = payload::normalize(request.payload.as_ref());
        let explicit = request.digest.as_deref().filter(|digest| !digest.is_empty());

        let expected = match (&fields, explicit) {
            (_, Some(digest)) => Some(digest),
            (Some(fields), None) => match &self.digest_field {
                Some(name) => fields.get(name).map(String::as_str),
                None => return Err(VerifyError::DigestMissing),
            },
            (None, None) => None,
        };

        let Some(expected) = expected else {
            debug!(digest_field = ?self.digest_field, "no digest found to compare against");
            return Ok(false);
        };

        let message = self.assemble(request.prefix.as_deref(), fields.as_deref());
        trace!(message_len = message.len(), "canonical message built");

        let computed =
            crate::hmac::compute_digest(self.algorithm, self.format, &request.secret, &message)?;
        let matched = crate::hmac::digests_match(&computed, expected);

        if !matched {
            debug!(algorithm = %self.algorithm, format = %self.format, "signature mismatch");
        }

        Ok(matched)
    }

    /// The exact string that would be hashed for `prefix` and `payload`.
    pub fn canonical_message(&self, prefix: Option<&str>, payload: Option<&Payload>) -> String {
        let fields = payload::normalize(payload);
        self.assemble(prefix, fields.as_deref())
    }

    fn assemble(&self, prefix: Option<&str>, fields: Option<&FieldMap>) -> String {
        let prepared = fields.map(|fields| {
            let kept = payload::remove_excluded(fields, &self.excluded_fields);
            match &self.replacements {
                Some(replacements) => replacements.apply(&kept),
                None => kept,
            }
        });

        canonical::build_message(
            prefix,
            prepared.as_ref(),
            &self.key_value_separator,
            &self.pair_separator,
        )
    }
}

impl TryFrom<ValidatorConfig> for Validator {
    type Error = ConfigError;

    fn try_from(config: ValidatorConfig) -> Result<Self, Self::Error> {
        Validator::new(config)
    }
}

/// Compiles `config` and returns a verification function closed over it.
pub fn create_validator(
    config: ValidatorConfig,
) -> Result<impl Fn(&VerificationRequest) -> Result<bool, VerifyError> + Send + Sync + 'static, ConfigError>
{
    let validator = Validator::new(config)?;
    Ok(move |request: &VerificationRequest| validator.verify(request))
}
