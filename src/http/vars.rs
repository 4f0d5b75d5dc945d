// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Request variables for query strings and form bodies
//!
//! Variables arrive either already encoded (`"a=1&b=2"`) or as key/value
//! pairs. Pairs are form-encoded in insertion order, so a `Vec` keeps the
//! caller's ordering while a `HashMap` gives whatever order it iterates in.

use std::collections::{BTreeMap, HashMap};

use url::form_urlencoded;

/// Query or body variables
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Vars {
    /// Pre-encoded string, used verbatim
    Encoded(String),
    /// Key/value pairs, form-encoded on use
    Pairs(Vec<(String, String)>),
}

impl Default for Vars {
    fn default() -> Self {
        Vars::Pairs(Vec::new())
    }
}

impl Vars {
    /// No variables
    pub fn none() -> Self {
        Self::default()
    }

    /// Check whether there is nothing to send
    pub fn is_empty(&self) -> bool {
        match self {
            Vars::Encoded(s) => s.is_empty(),
            Vars::Pairs(pairs) => pairs.is_empty(),
        }
    }

    /// Encode as `key=value` pairs joined by `&`
    pub fn encode(&self) -> String {
        match self {
            Vars::Encoded(s) => s.clone(),
            Vars::Pairs(pairs) => form_urlencoded::Serializer::new(String::new())
                .extend_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
                .finish(),
        }
    }

    /// Encoded form, or `None` when empty
    pub fn to_body(&self) -> Option<String> {
        if self.is_empty() {
            None
        } else {
            Some(self.encode())
        }
    }
}

/// Append `vars` to `url` as a query string
///
/// The separator is `&` when the URL already contains a `?`, otherwise `?`.
/// Empty vars leave the URL untouched.
pub fn create_get_url(url: &str, vars: &Vars) -> String {
    if vars.is_empty() {
        return url.to_string();
    }
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{}{}{}", url, separator, vars.encode())
}

impl From<&str> for Vars {
    fn from(s: &str) -> Self {
        Vars::Encoded(s.to_string())
    }
}

impl From<String> for Vars {
    fn from(s: String) -> Self {
        Vars::Encoded(s)
    }
}

impl<K: Into<String>, V: Into<String>> From<Vec<(K, V)>> for Vars {
    fn from(pairs: Vec<(K, V)>) -> Self {
        Vars::Pairs(pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for Vars {
    fn from(pairs: [(K, V); N]) -> Self {
        Vars::Pairs(pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<K: Into<String>, V: Into<String>> From<HashMap<K, V>> for Vars {
    fn from(map: HashMap<K, V>) -> Self {
        Vars::Pairs(map.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<K: Into<String>, V: Into<String>> From<BTreeMap<K, V>> for Vars {
    fn from(map: BTreeMap<K, V>) -> Self {
        Vars::Pairs(map.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<T: Into<Vars>> From<Option<T>> for Vars {
    fn from(vars: Option<T>) -> Self {
        vars.map(Into::into).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_url_without_query() {
        let url = create_get_url("http://example.com/search", &Vars::from([("q", "abc")]));
        assert_eq!(url, "http://example.com/search?q=abc");
    }

    #[test]
    fn test_get_url_with_existing_query() {
        let vars = Vars::from(vec![("b", "2"), ("c", "3")]);
        let url = create_get_url("http://example.com/?a=1", &vars);
        assert_eq!(url, "http://example.com/?a=1&b=2&c=3");
    }

    #[test]
    fn test_get_url_encoded_string_is_verbatim() {
        let url = create_get_url("http://example.com", &Vars::from("x=%20y&z"));
        assert_eq!(url, "http://example.com?x=%20y&z");
    }

    #[test]
    fn test_get_url_empty_vars() {
        assert_eq!(
            create_get_url("http://example.com/a", &Vars::none()),
            "http://example.com/a"
        );
        assert_eq!(
            create_get_url("http://example.com/a", &Vars::from("")),
            "http://example.com/a"
        );
    }

    #[test]
    fn test_pairs_are_form_encoded() {
        let vars = Vars::from([("name", "John Doe"), ("tag", "a&b=c")]);
        assert_eq!(vars.encode(), "name=John+Doe&tag=a%26b%3Dc");
    }

    #[test]
    fn test_option_conversion() {
        assert!(Vars::from(None::<&str>).is_empty());
        assert_eq!(Vars::from(Some("a=1")).to_body(), Some("a=1".to_string()));
    }
}
