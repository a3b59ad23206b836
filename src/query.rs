//! Query-string parsing.

use std::borrow::Cow;
use std::collections::HashMap;

/// Parses a raw query string (without the leading `?`) into a flat map.
///
/// Pairs are separated by `&` and split on the first `=`, so a value may
/// itself contain `=`. A key without `=` maps to `""`. Keys and values are
/// percent-decoded; a component that does not decode to UTF-8 is kept as-is.
/// For repeated keys the last occurrence wins.
pub fn parse_query(raw: &str) -> HashMap<String, String> {
    raw.split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode(key), decode(value))
        })
        .collect()
}

fn decode(component: &str) -> String {
    urlencoding::decode(component)
        .unwrap_or(Cow::Borrowed(component))
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pairs() {
        let query = parse_query("foo=bar&baz=qux");
        assert_eq!(query.len(), 2);
        assert_eq!(query["foo"], "bar");
        assert_eq!(query["baz"], "qux");
    }

    #[test]
    fn bare_key_maps_to_empty_string() {
        let query = parse_query("flag");
        assert_eq!(query["flag"], "");
    }

    #[test]
    fn value_keeps_everything_after_first_equals() {
        let query = parse_query("token=abc==&expr=a=b=c");
        assert_eq!(query["token"], "abc==");
        assert_eq!(query["expr"], "a=b=c");
    }

    #[test]
    fn percent_decodes_keys_and_values() {
        let query = parse_query("first%20name=J%C3%BCrgen&q=a%26b");
        assert_eq!(query["first name"], "Jürgen");
        assert_eq!(query["q"], "a&b");
    }

    #[test]
    fn later_duplicates_overwrite() {
        let query = parse_query("page=1&page=2");
        assert_eq!(query["page"], "2");
    }

    #[test]
    fn invalid_utf8_is_kept_verbatim() {
        let query = parse_query("bad=%FF");
        assert_eq!(query["bad"], "%FF");
    }

    #[test]
    fn empty_pairs_are_skipped() {
        assert!(parse_query("").is_empty());
        let query = parse_query("a=1&&b=2&");
        assert_eq!(query.len(), 2);
    }
}
