// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Client configuration
//!
//! `ClientConfig` holds everything a client applies to each of its
//! requests. It is built once (with `Default` and the builder methods
//! below) and then adjusted through the setters on `HttpClient`, except for
//! the capture flags, which are fixed when the client is constructed.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use once_cell::sync::OnceCell;

use super::headers::HeaderList;
use super::options::{OptionValue, RawOptions};
use crate::error::{Error, Result};

/// Default whole-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// File name used for the default cookie file location
pub const DEFAULT_COOKIE_FILE_NAME: &str = "reqkit_cookie.txt";

/// Trust bundle shipped next to the crate, used when SSL validation is on
pub const DEFAULT_CA_BUNDLE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/cacert.pem");

/// Process-wide capture defaults, set at most once
static GLOBAL_CAPTURE: OnceCell<CaptureFlags> = OnceCell::new();

/// Diagnostic capture switches
///
/// Fixed per client at construction. Clients built from
/// `ClientConfig::default()` pick up the process-wide value if one was
/// installed with [`CaptureFlags::init_global`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CaptureFlags {
    /// Record a verbose trace of every request into the response
    pub debug: bool,
    /// Populate the response header map
    pub capture_headers: bool,
    /// Ask the transport to prepend the header block to the payload
    pub include_headers: bool,
}

impl CaptureFlags {
    /// Flags with debug and header capture as given
    pub fn new(debug: bool, capture_headers: bool) -> Self {
        Self {
            debug,
            capture_headers,
            include_headers: false,
        }
    }

    /// Set whether the header block travels inside the payload
    pub fn include_headers(mut self, include: bool) -> Self {
        self.include_headers = include;
        self
    }

    /// Whether the transport must produce a verbose trace
    pub fn wants_trace(&self) -> bool {
        self.debug || self.capture_headers
    }

    /// Install the process-wide default
    ///
    /// Succeeds once per process; later calls fail and leave the first
    /// value in place.
    pub fn init_global(flags: CaptureFlags) -> Result<()> {
        GLOBAL_CAPTURE
            .set(flags)
            .map_err(|_| Error::config("capture flags are already initialized for this process"))
    }

    /// The process-wide default, or all-off if none was installed
    pub fn global() -> CaptureFlags {
        GLOBAL_CAPTURE.get().copied().unwrap_or_default()
    }
}

/// Where cookies are read from and written to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CookieFile {
    /// `<temp dir>/reqkit_cookie.txt`
    Default,
    /// Explicit path; an empty path disables the cookie file
    Path(PathBuf),
    /// No cookie file
    Disabled,
}

impl CookieFile {
    /// Resolve to a concrete path, if any
    pub fn resolve(self) -> Option<PathBuf> {
        match self {
            CookieFile::Default => Some(std::env::temp_dir().join(DEFAULT_COOKIE_FILE_NAME)),
            CookieFile::Path(p) if p.as_os_str().is_empty() => None,
            CookieFile::Path(p) => Some(p),
            CookieFile::Disabled => None,
        }
    }
}

impl From<bool> for CookieFile {
    fn from(enabled: bool) -> Self {
        if enabled {
            CookieFile::Default
        } else {
            CookieFile::Disabled
        }
    }
}

impl From<&str> for CookieFile {
    fn from(path: &str) -> Self {
        CookieFile::Path(PathBuf::from(path))
    }
}

impl From<PathBuf> for CookieFile {
    fn from(path: PathBuf) -> Self {
        CookieFile::Path(path)
    }
}

impl From<&Path> for CookieFile {
    fn from(path: &Path) -> Self {
        CookieFile::Path(path.to_path_buf())
    }
}

/// Basic auth credentials
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// `username:password` as handed to the transport
    pub fn userpwd(&self) -> String {
        format!("{}:{}", self.username, self.password)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Cookie file, if any
    pub cookie_file: Option<PathBuf>,
    /// Follow redirects
    pub follow_redirects: bool,
    /// Headers sent with every request
    pub headers: HeaderList,
    /// Raw transport options, applied after everything else
    pub raw_options: RawOptions,
    /// Referer header
    pub referer: Option<String>,
    /// User agent string
    pub user_agent: String,
    /// Validate TLS certificates (off by default)
    pub validate_ssl: bool,
    /// Trust bundle used when `validate_ssl` is on
    pub ca_bundle: PathBuf,
    /// Basic auth credentials
    pub credentials: Option<Credentials>,
    /// Default timeout
    pub timeout: Duration,
    /// Capture flags
    pub capture: CaptureFlags,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            cookie_file: None,
            follow_redirects: true,
            headers: HeaderList::new(),
            raw_options: RawOptions::new(),
            referer: None,
            user_agent: compose_user_agent(),
            validate_ssl: false,
            ca_bundle: PathBuf::from(DEFAULT_CA_BUNDLE),
            credentials: None,
            timeout: DEFAULT_TIMEOUT,
            capture: CaptureFlags::global(),
        }
    }
}

impl ClientConfig {
    /// Create a new client config
    pub fn new() -> Self {
        Self::default()
    }

    /// Set capture flags
    pub fn capture(mut self, capture: CaptureFlags) -> Self {
        self.capture = capture;
        self
    }

    /// Enable/disable the verbose trace
    pub fn debug(mut self, debug: bool) -> Self {
        self.capture.debug = debug;
        self
    }

    /// Enable/disable response header capture
    pub fn capture_headers(mut self, capture: bool) -> Self {
        self.capture.capture_headers = capture;
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set referer
    pub fn referer(mut self, referer: impl Into<String>) -> Self {
        self.referer = Some(referer.into());
        self
    }

    /// Add a default header
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.set(name, value);
        self
    }

    /// Add a raw transport option
    pub fn option(mut self, name: &str, value: impl Into<OptionValue>) -> Result<Self> {
        self.raw_options.set(name, value)?;
        Ok(self)
    }

    /// Set the cookie file
    pub fn cookie_file(mut self, cookie_file: impl Into<CookieFile>) -> Self {
        self.cookie_file = cookie_file.into().resolve();
        self
    }

    /// Follow redirects or not
    pub fn follow_redirects(mut self, follow: bool) -> Self {
        self.follow_redirects = follow;
        self
    }

    /// Validate TLS certificates or not
    pub fn validate_ssl(mut self, validate: bool) -> Self {
        self.validate_ssl = validate;
        self
    }

    /// Set the trust bundle path
    pub fn ca_bundle(mut self, path: impl Into<PathBuf>) -> Self {
        self.ca_bundle = path.into();
        self
    }

    /// Set basic auth credentials
    pub fn basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Some(Credentials::new(username, password));
        self
    }

    /// Set timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Compose the default user agent from crate, platform and environment
///
/// `SERVER_SOFTWARE` is used when present (the process runs behind a web
/// server), otherwise `TERM_PROGRAM`/`TERM_PROGRAM_VERSION`. An incoming
/// `HTTP_USER_AGENT` is appended last.
pub fn compose_user_agent() -> String {
    user_agent_from(|key| std::env::var(key).ok().filter(|v| !v.is_empty()))
}

fn user_agent_from(env: impl Fn(&str) -> Option<String>) -> String {
    let mut ua = format!(
        "{}/{} (reqwest; Rust; {} {}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH,
    );

    if let Some(server) = env("SERVER_SOFTWARE") {
        ua.push(' ');
        ua.push_str(server.trim());
    } else if let Some(term) = env("TERM_PROGRAM") {
        ua.push(' ');
        ua.push_str(&term);
        if let Some(version) = env("TERM_PROGRAM_VERSION") {
            ua.push('/');
            ua.push_str(&version);
        }
    }

    if let Some(agent) = env("HTTP_USER_AGENT") {
        ua.push(' ');
        ua.push_str(&agent);
    }

    ua.push(')');
    ua
}
