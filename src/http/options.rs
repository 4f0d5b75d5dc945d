// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Raw transport options
//!
//! The escape hatch for transport tuning that has no structured setter.
//! Names are looked up in a fixed table; `timeout`, `TIMEOUT` and
//! `CURLOPT_TIMEOUT` all resolve to [`TransportOption::Timeout`]. Unknown
//! names and ill-typed values are rejected when the option is set, not
//! when a request is made.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Prefix accepted (and ignored) in front of option names
const NAME_PREFIX: &str = "CURLOPT_";

/// Supported transport options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TransportOption {
    /// Whole-request timeout in seconds
    Timeout,
    /// Whole-request timeout in milliseconds
    TimeoutMs,
    /// Connect phase timeout in seconds
    ConnectTimeout,
    FollowLocation,
    MaxRedirs,
    UserAgent,
    Referer,
    SslVerifyPeer,
    /// 0 disables host name checks, 1 or 2 enable them
    SslVerifyHost,
    /// Trust bundle path
    CaInfo,
    Port,
    /// Cookie file read before the request
    CookieFile,
    /// Cookie file written after the request
    CookieJar,
    /// `user:password`
    UserPwd,
    /// Basic auth on/off
    HttpAuth,
    Verbose,
    /// Include the response header block in the payload
    Header,
    NoBody,
    CustomRequest,
    Proxy,
}

/// Canonical name table
const OPTION_NAMES: &[(&str, TransportOption)] = &[
    ("TIMEOUT", TransportOption::Timeout),
    ("TIMEOUT_MS", TransportOption::TimeoutMs),
    ("CONNECTTIMEOUT", TransportOption::ConnectTimeout),
    ("FOLLOWLOCATION", TransportOption::FollowLocation),
    ("MAXREDIRS", TransportOption::MaxRedirs),
    ("USERAGENT", TransportOption::UserAgent),
    ("REFERER", TransportOption::Referer),
    ("SSL_VERIFYPEER", TransportOption::SslVerifyPeer),
    ("SSL_VERIFYHOST", TransportOption::SslVerifyHost),
    ("CAINFO", TransportOption::CaInfo),
    ("PORT", TransportOption::Port),
    ("COOKIEFILE", TransportOption::CookieFile),
    ("COOKIEJAR", TransportOption::CookieJar),
    ("USERPWD", TransportOption::UserPwd),
    ("HTTPAUTH", TransportOption::HttpAuth),
    ("VERBOSE", TransportOption::Verbose),
    ("HEADER", TransportOption::Header),
    ("NOBODY", TransportOption::NoBody),
    ("CUSTOMREQUEST", TransportOption::CustomRequest),
    ("PROXY", TransportOption::Proxy),
];

/// Value kind an option expects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValueKind {
    Flag,
    Integer,
    Text,
}

impl TransportOption {
    /// Canonical name, without prefix
    pub fn name(&self) -> &'static str {
        OPTION_NAMES
            .iter()
            .find(|(_, opt)| opt == self)
            .map(|(name, _)| *name)
            .unwrap_or("UNKNOWN")
    }

    /// Look up an option by name, ignoring case and an optional `CURLOPT_` prefix
    pub fn from_name(name: &str) -> Result<Self> {
        let upper = name.trim().to_ascii_uppercase();
        let bare = upper.strip_prefix(NAME_PREFIX).unwrap_or(&upper);
        OPTION_NAMES
            .iter()
            .find(|(n, _)| *n == bare)
            .map(|(_, opt)| *opt)
            .ok_or_else(|| Error::config(format!("unknown transport option '{}'", name)))
    }

    fn kind(&self) -> ValueKind {
        use TransportOption::*;
        match self {
            FollowLocation | SslVerifyPeer | HttpAuth | Verbose | Header | NoBody => {
                ValueKind::Flag
            }
            Timeout | TimeoutMs | ConnectTimeout | MaxRedirs | Port | SslVerifyHost => {
                ValueKind::Integer
            }
            UserAgent | Referer | CaInfo | CookieFile | CookieJar | UserPwd | CustomRequest
            | Proxy => ValueKind::Text,
        }
    }

    /// Validate a value for this option
    pub fn check(&self, value: &OptionValue) -> Result<()> {
        match self.kind() {
            ValueKind::Flag => value.as_flag(*self).map(|_| ()),
            ValueKind::Integer => {
                let n = match (self, value) {
                    // Boolean form is accepted for host verification
                    (TransportOption::SslVerifyHost, OptionValue::Bool(_)) => return Ok(()),
                    _ => value.as_int(*self)?,
                };
                let range = match self {
                    TransportOption::Port => 1..=65535,
                    TransportOption::SslVerifyHost => 0..=2,
                    _ => 0..=i64::MAX,
                };
                if range.contains(&n) {
                    Ok(())
                } else {
                    Err(Error::config(format!(
                        "value {} out of range for {}",
                        n,
                        self.name()
                    )))
                }
            }
            ValueKind::Text => {
                let text = value.as_text(*self)?;
                if *self == TransportOption::CustomRequest && text.trim().is_empty() {
                    return Err(Error::config("CUSTOMREQUEST needs a method name"));
                }
                Ok(())
            }
        }
    }
}

impl FromStr for TransportOption {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s)
    }
}

impl fmt::Display for TransportOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Raw option value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl OptionValue {
    /// Read as a flag; integers coerce (non-zero is true)
    pub fn as_flag(&self, option: TransportOption) -> Result<bool> {
        match self {
            OptionValue::Bool(b) => Ok(*b),
            OptionValue::Int(n) => Ok(*n != 0),
            OptionValue::Text(_) => Err(type_mismatch(option, "a boolean")),
        }
    }

    /// Read as an integer
    pub fn as_int(&self, option: TransportOption) -> Result<i64> {
        match self {
            OptionValue::Int(n) => Ok(*n),
            _ => Err(type_mismatch(option, "an integer")),
        }
    }

    /// Read as text
    pub fn as_text(&self, option: TransportOption) -> Result<&str> {
        match self {
            OptionValue::Text(s) => Ok(s),
            _ => Err(type_mismatch(option, "a string")),
        }
    }
}

fn type_mismatch(option: TransportOption, expected: &str) -> Error {
    Error::config(format!("{} expects {}", option.name(), expected))
}

impl From<bool> for OptionValue {
    fn from(b: bool) -> Self {
        OptionValue::Bool(b)
    }
}

impl From<i64> for OptionValue {
    fn from(n: i64) -> Self {
        OptionValue::Int(n)
    }
}

impl From<i32> for OptionValue {
    fn from(n: i32) -> Self {
        OptionValue::Int(n.into())
    }
}

impl From<u32> for OptionValue {
    fn from(n: u32) -> Self {
        OptionValue::Int(n.into())
    }
}

impl From<u16> for OptionValue {
    fn from(n: u16) -> Self {
        OptionValue::Int(n.into())
    }
}

impl From<&str> for OptionValue {
    fn from(s: &str) -> Self {
        OptionValue::Text(s.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(s: String) -> Self {
        OptionValue::Text(s)
    }
}

/// Validated raw option table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawOptions {
    entries: BTreeMap<TransportOption, OptionValue>,
}

impl RawOptions {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an option by name
    pub fn set(&mut self, name: &str, value: impl Into<OptionValue>) -> Result<()> {
        let option = TransportOption::from_name(name)?;
        self.insert(option, value)
    }

    /// Set an option
    pub fn insert(&mut self, option: TransportOption, value: impl Into<OptionValue>) -> Result<()> {
        let value = value.into();
        option.check(&value)?;
        self.entries.insert(option, value);
        Ok(())
    }

    /// Get an option value
    pub fn get(&self, option: TransportOption) -> Option<&OptionValue> {
        self.entries.get(&option)
    }

    /// Remove an option
    pub fn remove(&mut self, option: TransportOption) -> Option<OptionValue> {
        self.entries.remove(&option)
    }

    /// Iterate options in a fixed order
    pub fn iter(&self) -> impl Iterator<Item = (TransportOption, &OptionValue)> {
        self.entries.iter().map(|(k, v)| (*k, v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_normalization() {
        for name in ["timeout", "TIMEOUT", "CURLOPT_TIMEOUT", "curlopt_timeout", " Timeout "] {
            assert_eq!(TransportOption::from_name(name).unwrap(), TransportOption::Timeout);
        }
        assert_eq!(
            "ssl_verifyhost".parse::<TransportOption>().unwrap(),
            TransportOption::SslVerifyHost
        );
    }

    #[test]
    fn test_unknown_name_rejected() {
        let err = TransportOption::from_name("CURLOPT_WARP_DRIVE").unwrap_err();
        assert!(err.is_configuration());

        let mut raw = RawOptions::new();
        assert!(raw.set("nope", 1).is_err());
        assert!(raw.is_empty());
    }

    #[test]
    fn test_value_type_checked() {
        let mut raw = RawOptions::new();
        assert!(raw.set("timeout", "five").unwrap_err().is_configuration());
        assert!(raw.set("useragent", 3).is_err());
        assert!(raw.set("port", 0).is_err());
        assert!(raw.set("ssl_verifyhost", 3).is_err());
        assert!(raw.set("customrequest", " ").is_err());

        raw.set("ssl_verifyhost", false).unwrap();
        raw.set("followlocation", 0).unwrap();
        raw.set("timeout", 5).unwrap();
        assert_eq!(raw.len(), 3);
    }

    #[test]
    fn test_last_set_wins() {
        let mut raw = RawOptions::new();
        raw.set("TIMEOUT", 5).unwrap();
        raw.set("curlopt_timeout", 9).unwrap();
        assert_eq!(raw.get(TransportOption::Timeout), Some(&OptionValue::Int(9)));
    }

    #[test]
    fn test_every_option_has_a_name() {
        for (name, option) in OPTION_NAMES {
            assert_eq!(option.name(), *name);
            assert_eq!(TransportOption::from_name(name).unwrap(), *option);
        }
    }
}
