// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Request methods

use std::fmt;
use std::str::FromStr;

/// HTTP method of a request
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Head,
    Post,
    Put,
    Delete,
    /// Any other token, sent as a custom request method (always uppercase)
    Other(String),
}

impl Method {
    /// Canonical uppercase name
    pub fn as_str(&self) -> &str {
        match self {
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Other(name) => name,
        }
    }

    /// Methods whose response never has a body
    pub fn is_bodyless(&self) -> bool {
        matches!(self, Method::Head)
    }
}

impl From<&str> for Method {
    fn from(s: &str) -> Self {
        let upper = s.trim().to_ascii_uppercase();
        match upper.as_str() {
            "GET" => Method::Get,
            "HEAD" => Method::Head,
            "POST" => Method::Post,
            "PUT" => Method::Put,
            "DELETE" => Method::Delete,
            _ => Method::Other(upper),
        }
    }
}

impl FromStr for Method {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Method::from(s))
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(Method::from("get"), Method::Get);
        assert_eq!(Method::from(" Delete "), Method::Delete);
        assert_eq!(Method::from("patch"), Method::Other("PATCH".to_string()));
    }

    #[test]
    fn test_bodyless() {
        assert!(Method::Head.is_bodyless());
        assert!(!Method::from("options").is_bodyless());
        assert!(!Method::Get.is_bodyless());
    }

    #[test]
    fn test_display_round_trips_name() {
        assert_eq!(Method::from("propfind").to_string(), "PROPFIND");
        assert_eq!(Method::Put.to_string(), "PUT");
    }
}
