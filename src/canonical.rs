use crate::validator_types::FieldMap;

/// Builds the exact string the sender hashed.
///
/// Pairs are rendered in code-point order of their names (the `FieldMap`
/// ordering), joined by `pair_separator`, and appended to `prefix` verbatim.
pub fn build_message(
    prefix: Option<&str>,
    fields: Option<&FieldMap>,
    key_value_separator: &str,
    pair_separator: &str,
) -> String {
    let mut message = prefix.unwrap_or_default().to_string();

    if let Some(fields) = fields {
        let pairs: Vec<String> = fields
            .iter()
            .map(|(name, value)| format!("{}{}{}", name, key_value_separator, value))
            .collect();
        message.push_str(&pairs.join(pair_separator));
    }

    message
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> FieldMap {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_sorted_pairs_with_default_separators() {
        let f = fields(&[("timestamp", "1337178173"), ("shop", "some-shop.myshopify.com")]);
        assert_eq!(
            build_message(None, Some(&f), "=", "&"),
            "shop=some-shop.myshopify.com&timestamp=1337178173"
        );
    }

    #[test]
    fn test_prefix_and_empty_separators() {
        let f = fields(&[("To", "+1800"), ("CallSid", "CA12"), ("Caller", "+1415")]);
        assert_eq!(
            build_message(Some("https://mycompany.com/myapp.php?foo=1&bar=2"), Some(&f), "", ""),
            "https://mycompany.com/myapp.php?foo=1&bar=2CallSidCA12Caller+1415To+1800"
        );
    }

    #[test]
    fn test_code_point_ordering() {
        let f = fields(&[("b", "2"), ("B", "1"), ("a", "3")]);
        assert_eq!(build_message(None, Some(&f), "=", "&"), "B=1&a=3&b=2");
    }

    #[test]
    fn test_message_without_fields() {
        assert_eq!(build_message(Some("only-prefix"), None, "=", "&"), "only-prefix");
        assert_eq!(build_message(Some("p:"), Some(&FieldMap::new()), "=", "&"), "p:");
        assert_eq!(build_message(None, None, "=", "&"), "");
    }
}
