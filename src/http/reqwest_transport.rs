// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! reqwest-backed transport
//!
//! Every call builds its own `reqwest::Client` from the resolved options
//! (TLS policy, redirects and timeouts are client-level settings in
//! reqwest), uses it for exactly one exchange and drops it on return.

use std::error::Error as StdError;
use std::fmt::Write as _;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use bytes::{BufMut, Bytes, BytesMut};
use reqwest::header::HeaderMap;
use reqwest::redirect::Policy;
use reqwest::{Certificate, Client, Method as WireMethod, Proxy};

use super::config::DEFAULT_CA_BUNDLE;
use super::cookie::CookieJar;
use super::request::{HttpAuth, RequestOptions};
use super::transport::{codes, RawResponse, TransferInfo, Transport, TransportFailure};

/// Redirect limit when following is on and MAXREDIRS is unset
pub const DEFAULT_MAX_REDIRECTS: usize = 10;

/// Transport executing requests with reqwest
#[derive(Debug, Clone, Copy, Default)]
pub struct ReqwestTransport;

impl ReqwestTransport {
    pub fn new() -> Self {
        Self
    }

    fn build_client(
        &self,
        options: &RequestOptions,
        jar: Option<&CookieJar>,
        trace: &mut Trace,
    ) -> Result<Client, TransportFailure> {
        let redirect = if options.follow_redirects {
            Policy::limited(options.max_redirects.unwrap_or(DEFAULT_MAX_REDIRECTS))
        } else {
            Policy::none()
        };

        let mut builder = Client::builder()
            .user_agent(options.user_agent.as_str())
            .timeout(options.timeout)
            .redirect(redirect)
            .cookie_store(false)
            .danger_accept_invalid_certs(!options.ssl.verify_peer);

        // The jar sees every hop, so cookies set on a redirect are kept and resent
        if let Some(jar) = jar {
            builder = builder.cookie_provider(Arc::new(jar.clone()));
        }

        if options.ssl.verify_peer && !options.ssl.verify_host {
            // rustls cannot skip only the host name check
            trace.info("host name verification stays on with peer verification enabled");
        }

        if options.ssl.verify_peer {
            match options.ssl.ca_info {
                // The bundled default is optional, the built-in roots stand in for it
                Some(ref bundle) if bundle == Path::new(DEFAULT_CA_BUNDLE) && !bundle.exists() => {
                    trace.info("CAfile: built-in webpki roots");
                }
                Some(ref bundle) => {
                    builder = builder.add_root_certificate(load_certificate(bundle)?);
                    trace.info(&format!("CAfile: {}", bundle.display()));
                }
                None => {}
            }
        }

        if let Some(timeout) = options.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }

        if let Some(ref proxy_url) = options.proxy {
            let proxy = Proxy::all(proxy_url).map_err(|e| {
                TransportFailure::new(
                    format!("Could not resolve proxy: {}", e),
                    codes::COULDNT_RESOLVE_PROXY,
                )
            })?;
            builder = builder.proxy(proxy);
        }

        builder
            .build()
            .map_err(|e| TransportFailure::new(e.to_string(), codes::SSL_CONNECT_ERROR))
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, options: &RequestOptions) -> Result<RawResponse, TransportFailure> {
        let start = Instant::now();
        let mut trace = Trace::new(options.verbose);

        let mut url = options.url.clone();
        if !matches!(url.scheme(), "http" | "https") {
            return Err(TransportFailure::new(
                format!("Protocol \"{}\" not supported", url.scheme()),
                codes::UNSUPPORTED_PROTOCOL,
            ));
        }
        if let Some(port) = options.port {
            url.set_port(Some(port)).map_err(|_| {
                TransportFailure::new(format!("Port number not usable for {}", url), codes::URL_MALFORMAT)
            })?;
        }

        let method = if options.no_body {
            WireMethod::HEAD
        } else {
            WireMethod::from_bytes(options.method.as_str().as_bytes()).map_err(|e| {
                TransportFailure::new(format!("Invalid request method: {}", e), codes::URL_MALFORMAT)
            })?
        };

        // Cookie engine is on when a cookie file is read or written
        let jar = match (&options.cookie_file, &options.cookie_jar) {
            (Some(path), _) => Some(load_jar(path, &mut trace)),
            (None, Some(_)) => Some(CookieJar::new()),
            (None, None) => None,
        };

        let client = self.build_client(options, jar.as_ref(), &mut trace)?;

        let mut builder = client.request(method.clone(), url.clone());
        let mut sent = Vec::new();

        for (name, value) in options.headers.iter() {
            builder = builder.header(name, value);
            sent.push(format!("{}: {}", name, value));
        }

        if let Some(ref referer) = options.referer {
            if !options.headers.contains_ignore_case("referer") {
                builder = builder.header("Referer", referer.as_str());
                sent.push(format!("Referer: {}", referer));
            }
        }

        if let Some(cookie_header) = jar.as_ref().and_then(|j| j.get_cookie_header(&url)) {
            sent.push(format!("Cookie: {}", cookie_header));
        }

        if let HttpAuth::Basic { ref userpwd } = options.auth {
            let encoded = base64::Engine::encode(&base64::engine::general_purpose::STANDARD, userpwd);
            builder = builder.header("Authorization", format!("Basic {}", encoded));
            sent.push("Authorization: Basic <credentials>".to_string());
        }

        if let Some(ref body) = options.post_body {
            if !options.headers.contains_ignore_case("content-type") {
                builder = builder.header("Content-Type", "application/x-www-form-urlencoded");
                sent.push("Content-Type: application/x-www-form-urlencoded".to_string());
            }
            builder = builder.body(body.clone());
        } else if let Some(ref put) = options.put_body {
            builder = builder.body(put.bytes().clone());
            sent.push(format!("Content-Length: {}", put.len()));
        }

        trace.request(&method, &url, &options.user_agent, &sent);

        let response = builder.send().await.map_err(|e| map_reqwest_error(&e))?;

        let status = response.status().as_u16();
        let version = format!("{:?}", response.version());
        let final_url = response.url().clone();
        let headers = response.headers().clone();

        trace.response(&version, response.status(), &headers);

        let body = response.bytes().await.map_err(|e| map_reqwest_error(&e))?;

        if let (Some(jar), Some(path)) = (&jar, &options.cookie_jar) {
            if let Err(e) = jar.save(path) {
                tracing::warn!(path = %path.display(), error = %e, "Could not write cookie file");
            }
        }

        let elapsed = start.elapsed();
        trace.info(&format!(
            "Received {} bytes in {} ms",
            body.len(),
            elapsed.as_millis()
        ));

        let block = if options.include_headers {
            header_block(&version, response_status_line(status), &headers)
        } else {
            String::new()
        };

        let info = TransferInfo {
            effective_url: final_url.to_string(),
            status,
            content_type: headers
                .get("content-type")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
            http_version: Some(version.clone()),
            total_time: elapsed,
            size_download: body.len() as u64,
            header_size: block.len() as u64,
        };

        let payload = if block.is_empty() {
            body
        } else {
            prepend(block.as_bytes(), &body)
        };

        Ok(RawResponse {
            status,
            headers: header_pairs(&headers),
            body: payload,
            verbose: trace.finish(),
            info,
        })
    }
}

fn load_certificate(bundle: &Path) -> Result<Certificate, TransportFailure> {
    let pem = std::fs::read(bundle).map_err(|e| {
        TransportFailure::new(
            format!(
                "error setting certificate verify locations: CAfile: {}: {}",
                bundle.display(),
                e
            ),
            codes::SSL_CACERT_BADFILE,
        )
    })?;
    Certificate::from_pem(&pem).map_err(|e| {
        TransportFailure::new(
            format!("error reading CA cert file {}: {}", bundle.display(), e),
            codes::SSL_CACERT_BADFILE,
        )
    })
}

fn load_jar(path: &Path, trace: &mut Trace) -> CookieJar {
    match CookieJar::load(path) {
        Ok(jar) => jar,
        Err(e) => {
            // An unreadable cookie file is not fatal, the request goes out without cookies
            trace.info(&format!("ignoring cookie file {}: {}", path.display(), e));
            CookieJar::new()
        }
    }
}

fn header_pairs(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect()
}

fn response_status_line(status: u16) -> String {
    match reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
    {
        Some(reason) => format!("{} {}", status, reason),
        None => status.to_string(),
    }
}

fn header_block(version: &str, status_line: String, headers: &HeaderMap) -> String {
    let mut block = format!("{} {}\r\n", version, status_line);
    for (name, value) in headers {
        let _ = write!(block, "{}: {}\r\n", name, String::from_utf8_lossy(value.as_bytes()));
    }
    block.push_str("\r\n");
    block
}

fn prepend(block: &[u8], body: &Bytes) -> Bytes {
    let mut out = BytesMut::with_capacity(block.len() + body.len());
    out.put_slice(block);
    out.put_slice(body);
    out.freeze()
}

/// Map a reqwest error to a failure code and message
fn map_reqwest_error(err: &reqwest::Error) -> TransportFailure {
    let chain = error_chain(err);
    let lower = chain.to_lowercase();
    let host = err
        .url()
        .and_then(|u| u.host_str())
        .unwrap_or("")
        .to_string();

    let (message, code) = if err.is_timeout() {
        (format!("Operation timed out: {}", chain), codes::OPERATION_TIMEDOUT)
    } else if err.is_redirect() {
        (format!("Maximum redirects followed: {}", chain), codes::TOO_MANY_REDIRECTS)
    } else if err.is_builder() {
        (chain, codes::URL_MALFORMAT)
    } else if lower.contains("dns error") || lower.contains("failed to lookup address") {
        (format!("Could not resolve host: {}", host), codes::COULDNT_RESOLVE_HOST)
    } else if lower.contains("certificate") {
        (
            format!("SSL peer certificate was not OK: {}", chain),
            codes::PEER_FAILED_VERIFICATION,
        )
    } else if lower.contains("tls") || lower.contains("handshake") {
        (format!("SSL connect error: {}", chain), codes::SSL_CONNECT_ERROR)
    } else if err.is_connect() {
        (format!("Couldn't connect to server: {}", chain), codes::COULDNT_CONNECT)
    } else {
        (format!("Failure when receiving data: {}", chain), codes::RECV_ERROR)
    };

    TransportFailure::new(message, code)
}

fn error_chain(err: &reqwest::Error) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        let _ = write!(out, ": {}", inner);
        source = inner.source();
    }
    out
}

/// Verbose trace in curl's `*`, `>` and `<` line style
struct Trace {
    buf: Option<String>,
}

impl Trace {
    fn new(enabled: bool) -> Self {
        Self {
            buf: enabled.then(String::new),
        }
    }

    fn info(&mut self, line: &str) {
        if let Some(ref mut buf) = self.buf {
            let _ = writeln!(buf, "* {}", line);
        }
    }

    fn request(&mut self, method: &WireMethod, url: &url::Url, user_agent: &str, headers: &[String]) {
        let Some(ref mut buf) = self.buf else { return };
        let mut target = url.path().to_string();
        if let Some(query) = url.query() {
            target.push('?');
            target.push_str(query);
        }
        let host = url.host_str().unwrap_or("");
        let _ = writeln!(buf, "* Connecting to {} port {}", host, url.port_or_known_default().unwrap_or(0));
        let _ = writeln!(buf, "> {} {} HTTP/1.1", method, target);
        let _ = writeln!(buf, "> Host: {}", host);
        let _ = writeln!(buf, "> User-Agent: {}", user_agent);
        for line in headers {
            let _ = writeln!(buf, "> {}", line);
        }
        let _ = writeln!(buf, ">");
    }

    fn response(&mut self, version: &str, status: reqwest::StatusCode, headers: &HeaderMap) {
        let Some(ref mut buf) = self.buf else { return };
        let _ = writeln!(buf, "< {} {}", version, status);
        for (name, value) in headers {
            let _ = writeln!(buf, "< {}: {}", name, String::from_utf8_lossy(value.as_bytes()));
        }
        let _ = writeln!(buf, "<");
    }

    fn finish(self) -> Option<String> {
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn test_prepend_header_block() {
        let mut headers = HeaderMap::new();
        headers.insert("content-type", HeaderValue::from_static("text/plain"));
        let block = header_block("HTTP/1.1", response_status_line(200), &headers);
        assert_eq!(block, "HTTP/1.1 200 OK\r\ncontent-type: text/plain\r\n\r\n");

        let out = prepend(block.as_bytes(), &Bytes::from("ok"));
        assert_eq!(
            out.as_ref(),
            b"HTTP/1.1 200 OK\r\ncontent-type: text/plain\r\n\r\nok"
        );
    }

    #[test]
    fn test_status_line_unknown_code() {
        assert_eq!(response_status_line(299), "299");
        assert_eq!(response_status_line(404), "404 Not Found");
    }

    #[test]
    fn test_trace_disabled_is_none() {
        let mut trace = Trace::new(false);
        trace.info("ignored");
        assert!(trace.finish().is_none());
    }

    #[test]
    fn test_trace_request_lines() {
        let mut trace = Trace::new(true);
        let url = url::Url::parse("http://example.com/search?q=abc").unwrap();
        trace.request(&WireMethod::GET, &url, "agent/1.0", &["X-Test: 1".to_string()]);
        let out = trace.finish().unwrap();

        assert!(out.contains("* Connecting to example.com port 80"));
        assert!(out.contains("> GET /search?q=abc HTTP/1.1"));
        assert!(out.contains("> User-Agent: agent/1.0"));
        assert!(out.contains("> X-Test: 1"));
    }

    #[tokio::test]
    async fn test_missing_ca_bundle_fails() {
        let mut options = RequestOptions::new(
            super::super::method::Method::Get,
            url::Url::parse("https://127.0.0.1:1/").unwrap(),
        );
        options.ssl = super::super::request::SslPolicy::verified("/no/such/cacert.pem");

        let err = ReqwestTransport::new().execute(&options).await.unwrap_err();
        assert_eq!(err.code, codes::SSL_CACERT_BADFILE);
    }

    #[tokio::test]
    async fn test_unsupported_scheme() {
        let options = RequestOptions::new(
            super::super::method::Method::Get,
            url::Url::parse("ftp://example.com/file").unwrap(),
        );
        let err = ReqwestTransport::new().execute(&options).await.unwrap_err();
        assert_eq!(err.code, codes::UNSUPPORTED_PROTOCOL);
    }
}
