// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP client implementation

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;

use super::config::{CaptureFlags, ClientConfig, CookieFile, Credentials};
use super::headers::HeaderList;
use super::method::Method;
use super::options::{OptionValue, RawOptions};
use super::parser::ResponseParser;
use super::request::{PutData, RequestOptions};
use super::reqwest_transport::ReqwestTransport;
use super::resolver::OptionResolver;
use super::response::Response;
use super::transport::{TransferInfo, Transport};
use super::vars::{create_get_url, Vars};
use crate::error::Result;

/// Transport handle statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HandleStats {
    /// Handles opened
    pub opened: u64,
    /// Handles released
    pub released: u64,
    /// Handles currently open
    pub active: u64,
}

/// Per-call transport handle, released on drop
struct RequestHandle {
    stats: Arc<RwLock<HandleStats>>,
}

impl RequestHandle {
    fn acquire(stats: &Arc<RwLock<HandleStats>>) -> Self {
        {
            let mut s = stats.write();
            s.opened += 1;
            s.active += 1;
        }
        Self {
            stats: Arc::clone(stats),
        }
    }
}

impl Drop for RequestHandle {
    fn drop(&mut self) {
        let mut stats = self.stats.write();
        stats.released += 1;
        stats.active = stats.active.saturating_sub(1);
    }
}

/// Configurable HTTP client
///
/// Every verb runs the same pipeline: resolve options, execute them on the
/// transport, parse the raw result.
#[derive(Clone)]
pub struct HttpClient {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
    handles: Arc<RwLock<HandleStats>>,
    last_info: Arc<RwLock<Option<TransferInfo>>>,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient {
    /// Create a new HTTP client with default configuration
    pub fn new() -> Self {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: ClientConfig) -> Self {
        Self::with_transport(config, Arc::new(ReqwestTransport::new()))
    }

    /// Create a client on top of another transport
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            config,
            transport,
            handles: Arc::new(RwLock::new(HandleStats::default())),
            last_info: Arc::new(RwLock::new(None)),
        }
    }

    /// Current configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Capture flags fixed at construction
    pub fn capture(&self) -> CaptureFlags {
        self.config.capture
    }

    /// Set a header sent with every request, replacing any previous value
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.config.headers.set(name, value);
    }

    /// Set several headers
    pub fn set_headers<I, K, V>(&mut self, headers: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (name, value) in headers {
            self.config.headers.set(name, value);
        }
    }

    pub fn headers(&self) -> &HeaderList {
        &self.config.headers
    }

    /// Set a raw transport option
    ///
    /// Names are matched case-insensitively, with or without the `CURLOPT_`
    /// prefix. Unknown names and ill-typed values are rejected.
    pub fn set_option(&mut self, name: &str, value: impl Into<OptionValue>) -> Result<()> {
        self.config.raw_options.set(name, value)
    }

    /// Set several raw transport options, stopping at the first bad one
    pub fn set_options<I, K, V>(&mut self, options: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<OptionValue>,
    {
        for (name, value) in options {
            self.config.raw_options.set(name.as_ref(), value)?;
        }
        Ok(())
    }

    pub fn options(&self) -> &RawOptions {
        &self.config.raw_options
    }

    /// Set the referer; an empty string clears it
    pub fn set_referer(&mut self, referer: impl Into<String>) {
        let referer = referer.into();
        self.config.referer = if referer.is_empty() { None } else { Some(referer) };
    }

    pub fn referer(&self) -> Option<&str> {
        self.config.referer.as_deref()
    }

    pub fn set_user_agent(&mut self, user_agent: impl Into<String>) {
        self.config.user_agent = user_agent.into();
    }

    pub fn user_agent(&self) -> &str {
        &self.config.user_agent
    }

    pub fn set_follow_redirects(&mut self, follow: bool) {
        self.config.follow_redirects = follow;
    }

    pub fn follow_redirects(&self) -> bool {
        self.config.follow_redirects
    }

    /// Set the cookie file: a path, `true` for the default location or
    /// `false` to disable
    pub fn set_cookie_file(&mut self, cookie_file: impl Into<CookieFile>) {
        self.config.cookie_file = cookie_file.into().resolve();
    }

    pub fn cookie_file(&self) -> Option<&Path> {
        self.config.cookie_file.as_deref()
    }

    pub fn set_validate_ssl(&mut self, validate: bool) {
        self.config.validate_ssl = validate;
    }

    pub fn validate_ssl(&self) -> bool {
        self.config.validate_ssl
    }

    /// Set the trust bundle used when SSL validation is on
    pub fn set_ca_bundle(&mut self, path: impl Into<PathBuf>) {
        self.config.ca_bundle = path.into();
    }

    /// Set basic auth credentials; a missing password is sent empty
    pub fn set_auth(&mut self, username: impl Into<String>, password: Option<&str>) {
        self.config.credentials = Some(Credentials::new(username, password.unwrap_or("")));
    }

    /// Remove credentials
    pub fn clear_auth(&mut self) {
        self.config.credentials = None;
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.config.credentials.as_ref()
    }

    pub fn set_timeout(&mut self, timeout: Duration) {
        self.config.timeout = timeout;
    }

    /// Execute a GET request
    pub async fn get(&self, url: impl AsRef<str>, vars: impl Into<Vars>) -> Result<Response> {
        let url = create_get_url(url.as_ref(), &vars.into());
        self.request(Method::Get, url, Vars::none(), None).await
    }

    /// Execute a HEAD request
    pub async fn head(&self, url: impl AsRef<str>, vars: impl Into<Vars>) -> Result<Response> {
        let url = create_get_url(url.as_ref(), &vars.into());
        self.request(Method::Head, url, Vars::none(), None).await
    }

    /// Execute a DELETE request
    pub async fn delete(&self, url: impl AsRef<str>, vars: impl Into<Vars>) -> Result<Response> {
        let url = create_get_url(url.as_ref(), &vars.into());
        self.request(Method::Delete, url, Vars::none(), None).await
    }

    /// Execute a POST request with a form-encoded body
    pub async fn post(&self, url: impl AsRef<str>, vars: impl Into<Vars>) -> Result<Response> {
        self.request(Method::Post, url, vars, None).await
    }

    /// Execute a PUT request; `vars` go to the query string
    pub async fn put<D: Into<PutData>>(
        &self,
        url: impl AsRef<str>,
        data: Option<D>,
        vars: impl Into<Vars>,
    ) -> Result<Response> {
        let url = create_get_url(url.as_ref(), &vars.into());
        self.request(Method::Put, url, Vars::none(), data.map(Into::into))
            .await
    }

    /// Execute a request
    pub async fn request(
        &self,
        method: impl Into<Method>,
        url: impl AsRef<str>,
        post_vars: impl Into<Vars>,
        put_data: Option<PutData>,
    ) -> Result<Response> {
        let _handle = RequestHandle::acquire(&self.handles);

        let options = self.prepare(method, url.as_ref(), post_vars, put_data)?;

        tracing::debug!(method = %options.method, url = %options.url, "Executing request");
        let raw = self.transport.execute(&options).await?;

        let response = ResponseParser::new(self.config.capture).parse(raw, options.include_headers);
        tracing::debug!(
            status = response.status_code,
            body_len = response.body_len(),
            elapsed_ms = response.info.total_time.as_millis() as u64,
            "Request finished"
        );

        *self.last_info.write() = Some(response.info.clone());
        Ok(response)
    }

    /// Resolve the options a request would use, without sending it
    pub fn prepare(
        &self,
        method: impl Into<Method>,
        url: &str,
        post_vars: impl Into<Vars>,
        put_data: Option<PutData>,
    ) -> Result<RequestOptions> {
        OptionResolver::new(&self.config).resolve(method.into(), url, &post_vars.into(), put_data)
    }

    /// Transfer info of the most recent successful request
    pub fn last_info(&self) -> Option<TransferInfo> {
        self.last_info.read().clone()
    }

    /// Transport handle statistics
    pub fn handle_stats(&self) -> HandleStats {
        self.handles.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::http::transport::{codes, RawResponse, TransportFailure};
    use async_trait::async_trait;
    use parking_lot::Mutex;

    /// Answers every request the same way and remembers what it was asked
    struct MockTransport {
        reply: std::result::Result<RawResponse, TransportFailure>,
        seen: Mutex<Vec<RequestOptions>>,
    }

    impl MockTransport {
        fn ok(raw: RawResponse) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(raw),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn failing(message: &str, code: u32) -> Arc<Self> {
            Arc::new(Self {
                reply: Err(TransportFailure::new(message, code)),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn last(&self) -> RequestOptions {
            self.seen.lock().last().cloned().unwrap()
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn execute(
            &self,
            options: &RequestOptions,
        ) -> std::result::Result<RawResponse, TransportFailure> {
            self.seen.lock().push(options.clone());
            self.reply.clone()
        }
    }

    fn client(transport: Arc<MockTransport>) -> HttpClient {
        let config = ClientConfig::new().capture(CaptureFlags::default());
        HttpClient::with_transport(config, transport)
    }

    #[tokio::test]
    async fn test_get_end_to_end() {
        let transport = MockTransport::ok(RawResponse::new(200, "ok"));
        let client = client(transport.clone());

        let resp = client.get("http://example.com/search", [("q", "abc")]).await.unwrap();

        assert_eq!(resp.status_code, 200);
        assert_eq!(resp.body, "ok");
        let sent = transport.last();
        assert_eq!(sent.method, Method::Get);
        assert_eq!(sent.url.as_str(), "http://example.com/search?q=abc");
        assert!(!sent.has_body());
        assert_eq!(client.last_info().map(|i| i.status), Some(200));
    }

    #[tokio::test]
    async fn test_transport_failure_is_verbatim() {
        let transport = MockTransport::failing("Could not resolve host", codes::COULDNT_RESOLVE_HOST);
        let client = client(transport);

        let err = client.get("http://nowhere.invalid", Vars::none()).await.unwrap_err();
        match err {
            Error::Transport { ref message, code } => {
                assert_eq!(message, "Could not resolve host");
                assert_eq!(code, 6);
            }
            ref other => panic!("Expected Transport, got {:?}", other),
        }
        assert_eq!(err.transport_code(), Some(6));
        assert!(client.last_info().is_none());
    }

    #[tokio::test]
    async fn test_handle_released_on_every_path() {
        let ok = client(MockTransport::ok(RawResponse::new(204, "")));
        ok.head("http://example.com", Vars::none()).await.unwrap();

        let failing = client(MockTransport::failing("Couldn't connect", codes::COULDNT_CONNECT));
        failing.get("http://example.com", Vars::none()).await.unwrap_err();

        // Validation failure happens after the handle is opened
        failing.post("http://example.com", Vars::none()).await.unwrap_err();

        assert_eq!(
            ok.handle_stats(),
            HandleStats {
                opened: 1,
                released: 1,
                active: 0
            }
        );
        let stats = failing.handle_stats();
        assert_eq!(stats.opened, 2);
        assert_eq!(stats.released, 2);
        assert_eq!(stats.active, 0);
    }

    #[tokio::test]
    async fn test_empty_body_is_not_a_failure() {
        let client = client(MockTransport::ok(RawResponse::new(204, "")));
        let resp = client.delete("http://example.com/item/1", Vars::none()).await.unwrap();
        assert_eq!(resp.status_code, 204);
        assert!(resp.body.is_empty());
    }

    #[tokio::test]
    async fn test_post_and_put_bodies() {
        let transport = MockTransport::ok(RawResponse::new(201, "created"));
        let client = client(transport.clone());

        client.post("http://example.com/form", [("a", "1")]).await.unwrap();
        assert_eq!(transport.last().post_body.as_deref(), Some("a=1"));

        client
            .put("http://example.com/item", Some("payload"), [("v", "2")])
            .await
            .unwrap();
        let sent = transport.last();
        assert_eq!(sent.url.as_str(), "http://example.com/item?v=2");
        assert_eq!(sent.put_body.map(|p| p.len()), Some(7));

        let err = client
            .put("http://example.com/item", None::<PutData>, Vars::none())
            .await
            .unwrap_err();
        assert!(err.is_invalid_request());
        assert!(err.to_string().contains("PUT data required"));

        let err = client.post("http://example.com/form", None::<Vars>).await.unwrap_err();
        assert!(err.to_string().contains("POST vars required"));
    }

    #[tokio::test]
    async fn test_generic_request_with_custom_method() {
        let transport = MockTransport::ok(RawResponse::new(200, ""));
        let client = client(transport.clone());

        client
            .request("options", "http://example.com", Vars::none(), None)
            .await
            .unwrap();
        let sent = transport.last();
        assert_eq!(sent.method.as_str(), "OPTIONS");
        assert!(!sent.no_body);
    }

    #[test]
    fn test_header_round_trip() {
        let mut client = client(MockTransport::ok(RawResponse::new(200, "")));
        client.set_header("X-Test", "1");
        assert_eq!(client.headers().get("X-Test"), Some("1"));

        client.set_header("X-Test", "2");
        assert_eq!(client.headers().get("X-Test"), Some("2"));
        assert_eq!(client.headers().len(), 1);

        client.set_headers([("Accept", "text/plain"), ("X-Other", "y")]);
        assert_eq!(client.headers().len(), 3);
    }

    #[test]
    fn test_setters_reach_resolved_options() {
        let mut client = client(MockTransport::ok(RawResponse::new(200, "")));
        client.set_referer("http://ref.example");
        client.set_user_agent("custom/1.0");
        client.set_follow_redirects(false);
        client.set_cookie_file(false);
        client.set_auth("user", None);
        client.set_option("CURLOPT_MAXREDIRS", 3).unwrap();
        assert!(client.set_option("NOT_AN_OPTION", 1).unwrap_err().is_configuration());

        let opts = client
            .prepare(Method::Get, "http://example.com", Vars::none(), None)
            .unwrap();
        assert_eq!(opts.referer.as_deref(), Some("http://ref.example"));
        assert_eq!(opts.user_agent, "custom/1.0");
        assert!(!opts.follow_redirects);
        assert!(opts.cookie_file.is_none());
        assert_eq!(opts.max_redirects, Some(3));
        assert_eq!(
            opts.auth,
            crate::http::request::HttpAuth::Basic {
                userpwd: "user:".to_string()
            }
        );

        client.clear_auth();
        client.set_referer("");
        assert!(client.credentials().is_none());
        assert!(client.referer().is_none());
    }

    #[test]
    fn test_blocking_call_site() {
        let client = client(MockTransport::ok(RawResponse::new(200, "ok")));
        let resp = tokio_test::block_on(client.get("http://example.com", Vars::none())).unwrap();
        assert_eq!(resp.text(), "ok");
    }
}
