use std::borrow::Cow;
use std::collections::HashSet;

use crate::validator_types::{FieldMap, Payload};

/// Turns the caller's payload into a field map.
///
/// `None` means no field contributes to the message: either no payload was
/// given or it was an empty string.
pub fn normalize(payload: Option<&Payload>) -> Option<Cow<'_, FieldMap>> {
    match payload? {
        Payload::Raw(raw) if raw.is_empty() => None,
        Payload::Raw(raw) => Some(Cow::Owned(decode_form(raw))),
        Payload::Fields(fields) => Some(Cow::Borrowed(fields)),
    }
}

/// Decodes `application/x-www-form-urlencoded` text.
///
/// `+` is a space, malformed escapes are kept literally and invalid UTF-8 is
/// replaced. A repeated name keeps its last value.
pub fn decode_form(raw: &str) -> FieldMap {
    let mut fields = FieldMap::new();

    for segment in raw.split('&').filter(|s| !s.is_empty()) {
        let (name, value) = segment.split_once('=').unwrap_or((segment, ""));
        fields.insert(decode_component(name), decode_component(value));
    }

    fields
}

fn decode_component(component: &str) -> String {
    let spaced = component.replace('+', " ");
    let bytes = urlencoding::decode_binary(spaced.as_bytes());
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Copies every field whose name is not excluded.
pub fn remove_excluded(fields: &FieldMap, excluded: &HashSet<String>) -> FieldMap {
    fields
        .iter()
        .filter(|(name, _)| !excluded.contains(name.as_str()))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_basic_query() {
        let fields = decode_form("shop=some-shop.myshopify.com&timestamp=1337178173");
        assert_eq!(fields.len(), 2);
        assert_eq!(fields["shop"], "some-shop.myshopify.com");
        assert_eq!(fields["timestamp"], "1337178173");
    }

    #[test]
    fn test_decode_percent_and_plus() {
        let fields = decode_form("na%20me=a+b%26c&x=%E2%9C%93");
        assert_eq!(fields["na me"], "a b&c");
        assert_eq!(fields["x"], "\u{2713}");
    }

    #[test]
    fn test_decode_keeps_malformed_escapes() {
        let fields = decode_form("time%stamp=1337<17>8173&tail=100%");
        assert_eq!(fields["time%stamp"], "1337<17>8173");
        assert_eq!(fields["tail"], "100%");
    }

    #[test]
    fn test_decode_edge_segments() {
        let fields = decode_form("&flag&empty=&a=b=c&&");
        assert_eq!(fields.len(), 3);
        assert_eq!(fields["flag"], "");
        assert_eq!(fields["empty"], "");
        assert_eq!(fields["a"], "b=c");
    }

    #[test]
    fn test_duplicate_names_last_wins() {
        let fields = decode_form("a=1&b=2&a=3");
        assert_eq!(fields["a"], "3");
    }

    #[test]
    fn test_normalize_variants() {
        assert!(normalize(None).is_none());
        assert!(normalize(Some(&Payload::Raw(String::new()))).is_none());

        let raw = Payload::from("a=1");
        assert!(matches!(normalize(Some(&raw)), Some(Cow::Owned(_))));

        let structured = Payload::Fields(FieldMap::new());
        match normalize(Some(&structured)) {
            Some(Cow::Borrowed(fields)) => assert!(fields.is_empty()),
            other => panic!("expected borrowed empty map, got {:?}", other),
        }
    }

    #[test]
    fn test_remove_excluded_keeps_other_fields() {
        let fields = decode_form("shop=s&signature=x&hmac=y&timestamp=1");
        let excluded: HashSet<String> = ["signature", "hmac"].iter().map(|s| s.to_string()).collect();

        let kept = remove_excluded(&fields, &excluded);

        assert_eq!(kept.keys().collect::<Vec<_>>(), vec!["shop", "timestamp"]);
        assert_eq!(fields.len(), 4);
    }
}
