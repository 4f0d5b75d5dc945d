// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Option resolution
//!
//! Turns client configuration plus one call's method, URL and payload into
//! a validated [`RequestOptions`]. Resolution order matters: method rules
//! first, then SSL policy from the URL scheme, then the structured client
//! settings, and raw options last so they can override any of the above.

use url::Url;

use super::config::ClientConfig;
use super::method::Method;
use super::request::{HttpAuth, PutData, RequestOptions, SslPolicy};
use super::vars::{self, Vars};
use crate::error::{Error, Result};

/// Default port for https URLs without an explicit one
pub const HTTPS_DEFAULT_PORT: u16 = 443;

/// Resolves per-call input against a client configuration
#[derive(Debug, Clone, Copy)]
pub struct OptionResolver<'a> {
    config: &'a ClientConfig,
}

impl<'a> OptionResolver<'a> {
    pub fn new(config: &'a ClientConfig) -> Self {
        Self { config }
    }

    /// Append query variables to a URL
    pub fn create_get_url(url: &str, vars: &Vars) -> String {
        vars::create_get_url(url, vars)
    }

    /// Resolve options for one request
    pub fn resolve(
        &self,
        method: Method,
        url: &str,
        post_vars: &Vars,
        put_data: Option<PutData>,
    ) -> Result<RequestOptions> {
        let post_body = validate_post(&method, post_vars)?;
        let put_body = validate_put(&method, put_data)?;

        let url = Url::parse(url)?;
        let mut options = RequestOptions::new(method, url);
        options.post_body = post_body;
        options.put_body = put_body;

        self.apply_ssl_policy(&mut options);
        self.apply_client_settings(&mut options);

        for (option, value) in self.config.raw_options.iter() {
            options.apply_raw(option, value)?;
        }

        tracing::debug!(
            method = %options.method,
            url = %options.url,
            body_len = ?options.body_len(),
            raw_options = self.config.raw_options.len(),
            "Resolved request options"
        );

        Ok(options)
    }

    fn apply_ssl_policy(&self, options: &mut RequestOptions) {
        if options.url.scheme() != "https" {
            return;
        }
        options.port = Some(options.url.port().unwrap_or(HTTPS_DEFAULT_PORT));
        options.ssl = if self.config.validate_ssl {
            SslPolicy::verified(self.config.ca_bundle.clone())
        } else {
            SslPolicy::insecure()
        };
    }

    fn apply_client_settings(&self, options: &mut RequestOptions) {
        let config = self.config;

        options.headers = config.headers.clone();
        options.user_agent = config.user_agent.clone();
        options.timeout = config.timeout;
        options.follow_redirects = config.follow_redirects;
        options.referer = config.referer.clone().filter(|r| !r.is_empty());

        // One file serves as both cookie source and sink
        options.cookie_file = config.cookie_file.clone();
        options.cookie_jar = config.cookie_file.clone();

        options.auth = match &config.credentials {
            Some(creds) => HttpAuth::Basic {
                userpwd: creds.userpwd(),
            },
            None => HttpAuth::Disabled,
        };

        options.verbose = config.capture.wants_trace();
        options.include_headers = config.capture.include_headers;
    }
}

fn validate_post(method: &Method, post_vars: &Vars) -> Result<Option<String>> {
    match (method, post_vars.to_body()) {
        (Method::Post, Some(body)) => Ok(Some(body)),
        (Method::Post, None) => Err(Error::invalid_request("POST vars required")),
        (_, Some(_)) => Err(Error::invalid_request("POST vars not allowed")),
        (_, None) => Ok(None),
    }
}

fn validate_put(method: &Method, put_data: Option<PutData>) -> Result<Option<PutData>> {
    match (method, put_data) {
        (Method::Put, Some(data)) => Ok(Some(data)),
        (Method::Put, None) => Err(Error::invalid_request("PUT data required")),
        (_, Some(_)) => Err(Error::invalid_request("PUT data not allowed")),
        (_, None) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::time::Duration;

    use super::*;
    use crate::http::config::{CaptureFlags, Credentials};

    fn config() -> ClientConfig {
        ClientConfig::new()
            .capture(CaptureFlags::default())
            .user_agent("test-agent")
    }

    fn resolve(
        config: &ClientConfig,
        method: Method,
        url: &str,
        post: Vars,
        put: Option<PutData>,
    ) -> Result<RequestOptions> {
        OptionResolver::new(config).resolve(method, url, &post, put)
    }

    #[test]
    fn test_post_requires_vars() {
        let cfg = config();
        for empty in [Vars::none(), Vars::from("")] {
            let err = resolve(&cfg, Method::Post, "http://example.com", empty, None).unwrap_err();
            assert!(err.is_invalid_request());
            assert!(err.to_string().contains("POST vars required"));
        }
    }

    #[test]
    fn test_post_body_is_encoded() {
        let opts = resolve(
            &config(),
            Method::Post,
            "http://example.com/form",
            Vars::from([("a", "1")]),
            None,
        )
        .unwrap();
        assert_eq!(opts.post_body.as_deref(), Some("a=1"));
        assert!(opts.put_body.is_none());
    }

    #[test]
    fn test_post_vars_rejected_on_other_methods() {
        for method in [Method::Get, Method::Delete, Method::Head] {
            let err = resolve(&config(), method, "http://example.com", Vars::from("a=1"), None)
                .unwrap_err();
            assert!(err.to_string().contains("POST vars not allowed"));
        }
    }

    #[test]
    fn test_put_rules() {
        let cfg = config();
        let err = resolve(&cfg, Method::Put, "http://example.com", Vars::none(), None).unwrap_err();
        assert!(err.to_string().contains("PUT data required"));

        let err = resolve(
            &cfg,
            Method::Get,
            "http://example.com",
            Vars::none(),
            Some(PutData::from("x")),
        )
        .unwrap_err();
        assert!(err.to_string().contains("PUT data not allowed"));

        let opts = resolve(
            &cfg,
            Method::Put,
            "http://example.com/item",
            Vars::none(),
            Some(PutData::from("payload")),
        )
        .unwrap();
        let put = opts.put_body.unwrap();
        assert_eq!(put.len(), 7);
        assert_eq!(put.bytes().as_ref(), b"payload");
        assert!(opts.post_body.is_none());
    }

    #[test]
    fn test_get_and_delete_never_carry_body() {
        for method in [Method::Get, Method::Delete] {
            let opts = resolve(&config(), method, "http://example.com/x", Vars::none(), None).unwrap();
            assert!(!opts.has_body());
        }
    }

    #[test]
    fn test_head_sets_no_body() {
        let opts = resolve(&config(), Method::Head, "http://example.com", Vars::none(), None).unwrap();
        assert!(opts.no_body);
    }

    #[test]
    fn test_https_insecure_by_default() {
        let opts = resolve(&config(), Method::Get, "https://example.com/", Vars::none(), None).unwrap();
        assert!(!opts.ssl.verify_peer);
        assert!(!opts.ssl.verify_host);
        assert!(opts.ssl.ca_info.is_none());
        assert_eq!(opts.port, Some(443));
    }

    #[test]
    fn test_https_validated() {
        let cfg = config().validate_ssl(true).ca_bundle("/etc/ssl/bundle.pem");
        let opts = resolve(&cfg, Method::Get, "https://example.com:8443/", Vars::none(), None).unwrap();
        assert!(opts.ssl.verify_peer);
        assert!(opts.ssl.verify_host);
        assert_eq!(opts.ssl.ca_info, Some(PathBuf::from("/etc/ssl/bundle.pem")));
        assert_eq!(opts.port, Some(8443));
    }

    #[test]
    fn test_plain_http_never_references_bundle() {
        let cfg = config().validate_ssl(true);
        let opts = resolve(&cfg, Method::Get, "http://example.com/", Vars::none(), None).unwrap();
        assert!(opts.ssl.ca_info.is_none());
        assert_eq!(opts.port, None);
    }

    #[test]
    fn test_raw_timeout_overrides_default() {
        let cfg = config().option("timeout", 5).unwrap();
        let opts = resolve(&cfg, Method::Get, "http://example.com", Vars::none(), None).unwrap();
        assert_eq!(opts.timeout, Duration::from_secs(5));

        let opts = resolve(&config(), Method::Get, "http://example.com", Vars::none(), None).unwrap();
        assert_eq!(opts.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_raw_options_override_structured_settings() {
        let cfg = config()
            .follow_redirects(true)
            .referer("http://a.example")
            .option("CURLOPT_FOLLOWLOCATION", false)
            .unwrap()
            .option("referer", "http://b.example")
            .unwrap()
            .option("ssl_verifypeer", true)
            .unwrap();
        let opts = resolve(&cfg, Method::Get, "https://example.com", Vars::none(), None).unwrap();
        assert!(!opts.follow_redirects);
        assert_eq!(opts.referer.as_deref(), Some("http://b.example"));
        assert!(opts.ssl.verify_peer);
    }

    #[test]
    fn test_auth_resolution() {
        let mut cfg = config();
        let opts = resolve(&cfg, Method::Get, "http://example.com", Vars::none(), None).unwrap();
        assert_eq!(opts.auth, HttpAuth::Disabled);

        cfg.credentials = Some(Credentials::new("user", "secret"));
        let opts = resolve(&cfg, Method::Get, "http://example.com", Vars::none(), None).unwrap();
        assert_eq!(
            opts.auth,
            HttpAuth::Basic {
                userpwd: "user:secret".to_string()
            }
        );
    }

    #[test]
    fn test_client_settings_copied() {
        let cfg = config()
            .header("X-Test", "1")
            .cookie_file("/tmp/cookies.json")
            .capture(CaptureFlags::new(true, false).include_headers(true));
        let opts = resolve(&cfg, Method::Get, "http://example.com", Vars::none(), None).unwrap();
        assert_eq!(opts.headers.get("X-Test"), Some("1"));
        assert_eq!(opts.user_agent, "test-agent");
        assert_eq!(opts.cookie_file, Some(PathBuf::from("/tmp/cookies.json")));
        assert_eq!(opts.cookie_jar, opts.cookie_file);
        assert!(opts.verbose);
        assert!(opts.include_headers);
        assert!(opts.follow_redirects);
    }

    #[test]
    fn test_invalid_url() {
        let err = resolve(&config(), Method::Get, "not a url", Vars::none(), None).unwrap_err();
        assert!(matches!(err, Error::Url(_)));
    }

    #[test]
    fn test_create_get_url() {
        assert_eq!(
            OptionResolver::create_get_url("http://example.com/search", &Vars::from([("q", "abc")])),
            "http://example.com/search?q=abc"
        );
    }
}
