use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::errors::ConfigError;

/// Ordered field name -> field value mapping. Ordering is by code point.
pub type FieldMap = BTreeMap<String, String>;

/// Keyed-hash functions a validator can be configured with.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub enum HashAlgorithm {
    Sha1,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
}

impl HashAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            HashAlgorithm::Sha1 => "sha1",
            HashAlgorithm::Sha224 => "sha224",
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Sha384 => "sha384",
            HashAlgorithm::Sha512 => "sha512",
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HashAlgorithm {
    type Err = ConfigError;

    // Accepts "sha256", "SHA256", "sha-256" and "sha_256"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .flat_map(char::to_lowercase)
            .collect();
        match normalized.as_str() {
            "sha1" => Ok(HashAlgorithm::Sha1),
            "sha224" => Ok(HashAlgorithm::Sha224),
            "sha256" => Ok(HashAlgorithm::Sha256),
            "sha384" => Ok(HashAlgorithm::Sha384),
            "sha512" => Ok(HashAlgorithm::Sha512),
            _ => Err(ConfigError::UnknownAlgorithm(s.to_string())),
        }
    }
}

impl TryFrom<String> for HashAlgorithm {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HashAlgorithm> for String {
    fn from(value: HashAlgorithm) -> Self {
        value.as_str().to_string()
    }
}

/// Rendering of the computed digest before it is compared.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub enum DigestFormat {
    /// Lowercase hexadecimal
    Hex,
    /// Standard alphabet, padded
    Base64,
}

impl DigestFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            DigestFormat::Hex => "hex",
            DigestFormat::Base64 => "base64",
        }
    }
}

impl fmt::Display for DigestFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DigestFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hex" => Ok(DigestFormat::Hex),
            "base64" => Ok(DigestFormat::Base64),
            _ => Err(ConfigError::UnknownFormat(s.to_string())),
        }
    }
}

impl TryFrom<String> for DigestFormat {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DigestFormat> for String {
    fn from(value: DigestFormat) -> Self {
        value.as_str().to_string()
    }
}

/// Per-character substitution tables, as written in configuration.
///
/// Every key must be exactly one character; this is checked when the
/// validator is built, not here.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ReplacementRules {
    /// Applied to field names only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keys: Option<BTreeMap<String, String>>,
    /// Applied to field values only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<BTreeMap<String, String>>,
    /// Applied to both names and values
    #[serde(skip_serializing_if = "Option::is_none")]
    pub both: Option<BTreeMap<String, String>>,
}

impl ReplacementRules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.keys.get_or_insert_with(BTreeMap::new).insert(from.into(), to.into());
        self
    }

    pub fn value(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.values.get_or_insert_with(BTreeMap::new).insert(from.into(), to.into());
        self
    }

    pub fn both(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.both.get_or_insert_with(BTreeMap::new).insert(from.into(), to.into());
        self
    }
}

/// Raw validator configuration. Compile it with [`crate::Validator::new`].
///
/// Field names follow camelCase in JSON. Legacy option names (`digestKey`,
/// `keyValueLink`, ...) are accepted as aliases.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ValidatorConfig {
    pub algorithm: Option<HashAlgorithm>,
    #[serde(alias = "outputEncoding")]
    pub format: Option<DigestFormat>,
    #[serde(alias = "excludedKeys")]
    pub excluded_fields: BTreeSet<String>,
    #[serde(alias = "replacementRules", skip_serializing_if = "Option::is_none")]
    pub replacements: Option<ReplacementRules>,
    #[serde(alias = "keyValueLink", skip_serializing_if = "Option::is_none")]
    pub key_value_separator: Option<String>,
    #[serde(alias = "pairsLink", skip_serializing_if = "Option::is_none")]
    pub pair_separator: Option<String>,
    #[serde(alias = "digestKey", alias = "digestFieldName", skip_serializing_if = "Option::is_none")]
    pub digest_field: Option<String>,
}

impl ValidatorConfig {
    pub fn new(algorithm: HashAlgorithm, format: DigestFormat) -> Self {
        Self {
            algorithm: Some(algorithm),
            format: Some(format),
            ..Self::default()
        }
    }

    pub fn exclude<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_fields.extend(fields.into_iter().map(Into::into));
        self
    }

    pub fn with_replacements(mut self, rules: ReplacementRules) -> Self {
        self.replacements = Some(rules);
        self
    }

    pub fn with_separators(mut self, key_value: impl Into<String>, pair: impl Into<String>) -> Self {
        self.key_value_separator = Some(key_value.into());
        self.pair_separator = Some(pair.into());
        self
    }

    pub fn with_digest_field(mut self, name: impl Into<String>) -> Self {
        self.digest_field = Some(name.into());
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a configuration from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read validator config {}", path.display()))?;
        let config = Self::from_json_str(&text)
            .with_context(|| format!("failed to parse validator config {}", path.display()))?;
        Ok(config)
    }
}

/// Message payload as handed over by the caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Payload {
    /// Form-encoded `name=value&...` string, decoded before hashing
    Raw(String),
    /// Already-parsed fields, used as-is
    Fields(FieldMap),
}

impl From<&str> for Payload {
    fn from(value: &str) -> Self {
        Payload::Raw(value.to_string())
    }
}

impl From<String> for Payload {
    fn from(value: String) -> Self {
        Payload::Raw(value)
    }
}

impl From<FieldMap> for Payload {
    fn from(value: FieldMap) -> Self {
        Payload::Fields(value)
    }
}

impl From<HashMap<String, String>> for Payload {
    fn from(value: HashMap<String, String>) -> Self {
        Payload::Fields(value.into_iter().collect())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Payload {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Payload::Fields(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Inputs of a single verification call.
#[derive(Clone, Default)]
pub struct VerificationRequest {
    pub secret: String,
    /// Prepended verbatim to the canonical message
    pub prefix: Option<String>,
    pub payload: Option<Payload>,
    /// Expected digest; read from the configured digest field when absent
    pub digest: Option<String>,
}

impl VerificationRequest {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Self::default()
        }
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn payload(mut self, payload: impl Into<Payload>) -> Self {
        self.payload = Some(payload.into());
        self
    }

    pub fn digest(mut self, digest: impl Into<String>) -> Self {
        self.digest = Some(digest.into());
        self
    }
}

impl fmt::Debug for VerificationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VerificationRequest")
            .field("secret", &"<redacted>")
            .field("prefix", &self.prefix)
            .field("payload", &self.payload)
            .field("digest", &self.digest)
            .finish()
    }
}
