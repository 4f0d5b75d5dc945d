// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Resolved request options and request bodies

use std::path::{Path, PathBuf};
use std::time::Duration;

use bytes::Bytes;
use url::Url;

use super::headers::HeaderList;
use super::method::Method;
use super::options::{OptionValue, TransportOption};
use super::vars::Vars;
use crate::error::{Error, Result};

/// PUT payload with a known length
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutData {
    data: Bytes,
}

impl PutData {
    /// Wrap a string payload
    pub fn from_string(s: impl Into<String>) -> Self {
        Self {
            data: Bytes::from(s.into()),
        }
    }

    /// Wrap raw bytes
    pub fn from_bytes(data: impl Into<Bytes>) -> Self {
        Self { data: data.into() }
    }

    /// Form-encode variables into a payload
    pub fn from_vars(vars: &Vars) -> Self {
        Self::from_string(vars.encode())
    }

    /// Read a file into a payload
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::from_bytes(std::fs::read(path)?))
    }

    /// Payload length in bytes
    pub fn len(&self) -> u64 {
        self.data.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Payload bytes
    pub fn bytes(&self) -> &Bytes {
        &self.data
    }
}

impl From<&str> for PutData {
    fn from(s: &str) -> Self {
        PutData::from_string(s)
    }
}

impl From<String> for PutData {
    fn from(s: String) -> Self {
        PutData::from_string(s)
    }
}

impl From<Vec<u8>> for PutData {
    fn from(v: Vec<u8>) -> Self {
        PutData::from_bytes(v)
    }
}

impl From<Bytes> for PutData {
    fn from(b: Bytes) -> Self {
        PutData::from_bytes(b)
    }
}

impl From<Vars> for PutData {
    fn from(vars: Vars) -> Self {
        PutData::from_vars(&vars)
    }
}

/// HTTP authentication for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpAuth {
    /// Authentication explicitly off
    Disabled,
    /// Basic auth with a `user:password` credential
    Basic { userpwd: String },
}

/// Certificate checks for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SslPolicy {
    pub verify_peer: bool,
    pub verify_host: bool,
    /// Trust bundle; `None` means the transport's built-in roots
    pub ca_info: Option<PathBuf>,
}

impl Default for SslPolicy {
    fn default() -> Self {
        Self {
            verify_peer: true,
            verify_host: true,
            ca_info: None,
        }
    }
}

impl SslPolicy {
    /// Verify peer and host against `bundle`
    pub fn verified(bundle: impl Into<PathBuf>) -> Self {
        Self {
            verify_peer: true,
            verify_host: true,
            ca_info: Some(bundle.into()),
        }
    }

    /// No certificate checks at all
    pub fn insecure() -> Self {
        Self {
            verify_peer: false,
            verify_host: false,
            ca_info: None,
        }
    }
}

/// Fully resolved options for one transaction
///
/// Built by `OptionResolver`, read by a `Transport`, dropped after the call.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub url: Url,
    /// Query component of `url`, if any
    pub query_string: Option<String>,
    /// Form-encoded POST body; present iff the method is POST
    pub post_body: Option<String>,
    /// PUT payload; present iff the method is PUT
    pub put_body: Option<PutData>,
    pub headers: HeaderList,
    pub follow_redirects: bool,
    pub max_redirects: Option<usize>,
    /// Cookies are read from here
    pub cookie_file: Option<PathBuf>,
    /// Cookies are written back here
    pub cookie_jar: Option<PathBuf>,
    pub referer: Option<String>,
    pub user_agent: String,
    pub auth: HttpAuth,
    pub ssl: SslPolicy,
    /// Port to connect to; set for https URLs
    pub port: Option<u16>,
    pub timeout: Duration,
    pub connect_timeout: Option<Duration>,
    pub proxy: Option<String>,
    /// Do not transfer a response body
    pub no_body: bool,
    /// Produce a verbose trace
    pub verbose: bool,
    /// Prepend the response header block to the payload
    pub include_headers: bool,
}

impl RequestOptions {
    /// Options for `method` on `url` with transport defaults
    pub fn new(method: Method, url: Url) -> Self {
        let query_string = url.query().map(str::to_string);
        Self {
            no_body: method.is_bodyless(),
            method,
            url,
            query_string,
            post_body: None,
            put_body: None,
            headers: HeaderList::new(),
            follow_redirects: false,
            max_redirects: None,
            cookie_file: None,
            cookie_jar: None,
            referer: None,
            user_agent: String::new(),
            auth: HttpAuth::Disabled,
            ssl: SslPolicy::default(),
            port: None,
            timeout: super::config::DEFAULT_TIMEOUT,
            connect_timeout: None,
            proxy: None,
            verbose: false,
            include_headers: false,
        }
    }

    /// Check whether a request body is attached
    pub fn has_body(&self) -> bool {
        self.post_body.is_some() || self.put_body.is_some()
    }

    /// Length of the attached body, if any
    pub fn body_len(&self) -> Option<u64> {
        match (&self.post_body, &self.put_body) {
            (Some(body), _) => Some(body.len() as u64),
            (None, Some(put)) => Some(put.len()),
            (None, None) => None,
        }
    }

    /// Get the host
    pub fn host(&self) -> Option<&str> {
        self.url.host_str()
    }

    /// Apply one raw option, overriding whatever was resolved before
    ///
    /// The value is checked against the option's kind and range first.
    pub fn apply_raw(&mut self, option: TransportOption, value: &OptionValue) -> Result<()> {
        use TransportOption as Opt;
        option.check(value)?;
        match option {
            Opt::Timeout => self.timeout = Duration::from_secs(value.as_int(option)? as u64),
            Opt::TimeoutMs => self.timeout = Duration::from_millis(value.as_int(option)? as u64),
            Opt::ConnectTimeout => {
                self.connect_timeout = Some(Duration::from_secs(value.as_int(option)? as u64))
            }
            Opt::FollowLocation => self.follow_redirects = value.as_flag(option)?,
            Opt::MaxRedirs => self.max_redirects = Some(value.as_int(option)? as usize),
            Opt::UserAgent => self.user_agent = value.as_text(option)?.to_string(),
            Opt::Referer => self.referer = non_empty(value.as_text(option)?),
            Opt::SslVerifyPeer => self.ssl.verify_peer = value.as_flag(option)?,
            Opt::SslVerifyHost => self.ssl.verify_host = value.as_flag(option)?,
            Opt::CaInfo => self.ssl.ca_info = non_empty(value.as_text(option)?).map(PathBuf::from),
            Opt::Port => {
                let port = value.as_int(option)?;
                self.port = Some(u16::try_from(port).map_err(|_| {
                    Error::config(format!("value {} out of range for {}", port, option))
                })?)
            }
            Opt::CookieFile => {
                self.cookie_file = non_empty(value.as_text(option)?).map(PathBuf::from)
            }
            Opt::CookieJar => self.cookie_jar = non_empty(value.as_text(option)?).map(PathBuf::from),
            Opt::UserPwd => {
                self.auth = HttpAuth::Basic {
                    userpwd: value.as_text(option)?.to_string(),
                }
            }
            // Turning auth on needs a credential, which only USERPWD supplies
            Opt::HttpAuth => {
                if !value.as_flag(option)? {
                    self.auth = HttpAuth::Disabled;
                }
            }
            Opt::Verbose => self.verbose = value.as_flag(option)?,
            Opt::Header => self.include_headers = value.as_flag(option)?,
            Opt::NoBody => self.no_body = value.as_flag(option)?,
            Opt::CustomRequest => self.method = Method::from(value.as_text(option)?),
            Opt::Proxy => self.proxy = non_empty(value.as_text(option)?),
        }
        Ok(())
    }
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}
