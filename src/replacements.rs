//! Per-character substitution applied to field names and values before hashing.
//!
//! Providers percent-encode a handful of characters when they build the string
//! they sign, and that encoding is lost once the request has been decoded into
//! fields. The tables here put it back.

use std::collections::{BTreeMap, HashMap};

use crate::errors::ConfigError;
use crate::validator_types::{FieldMap, ReplacementRules};

/// Single character -> replacement text.
pub type CharTable = HashMap<char, String>;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompiledReplacements {
    /// Applied to field names
    pub keys: CharTable,
    /// Applied to field values
    pub values: CharTable,
}

impl CompiledReplacements {
    /// Returns `Ok(None)` when no table is configured at all, so the
    /// substitution step can be skipped entirely.
    ///
    /// `both` entries land in both tables, but never override an entry for the
    /// same character from `keys` or `values`.
    pub fn compile(rules: &ReplacementRules) -> Result<Option<Self>, ConfigError> {
        if rules.keys.is_none() && rules.values.is_none() && rules.both.is_none() {
            return Ok(None);
        }

        let mut keys = compile_table("keys", rules.keys.as_ref())?;
        let mut values = compile_table("values", rules.values.as_ref())?;

        for (c, replacement) in compile_table("both", rules.both.as_ref())? {
            keys.entry(c).or_insert_with(|| replacement.clone());
            values.entry(c).or_insert(replacement);
        }

        Ok(Some(Self { keys, values }))
    }

    /// Rewrites every name and value into a new map. When two rewritten names
    /// collide, the later one in iteration order wins.
    pub fn apply(&self, fields: &FieldMap) -> FieldMap {
        fields
            .iter()
            .map(|(name, value)| (replace_chars(name, &self.keys), replace_chars(value, &self.values)))
            .collect()
    }
}

fn compile_table(
    table: &'static str,
    entries: Option<&BTreeMap<String, String>>,
) -> Result<CharTable, ConfigError> {
    let mut compiled = CharTable::new();

    for (key, replacement) in entries.into_iter().flatten() {
        let mut chars = key.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => {
                compiled.insert(c, replacement.clone());
            }
            _ => {
                return Err(ConfigError::InvalidReplacementKey {
                    table,
                    key: key.clone(),
                })
            }
        }
    }

    Ok(compiled)
}

/// Single pass: replacement text is never scanned again.
pub fn replace_chars(input: &str, table: &CharTable) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match table.get(&c) {
            Some(replacement) => out.push_str(replacement),
            None => out.push(c),
        }
    }
    out
}
