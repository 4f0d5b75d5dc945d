// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP response types

use std::collections::BTreeMap;
use std::fmt;

use serde::de::DeserializeOwned;

use super::transport::TransferInfo;
use crate::error::Result;

/// Normalized result of one request
#[derive(Debug, Clone, Default)]
pub struct Response {
    /// Response status code
    pub status_code: u16,
    /// Response headers; empty unless header capture is on
    pub headers: BTreeMap<String, String>,
    /// Response body
    pub body: String,
    /// Verbose trace; present only in debug mode
    pub debug_trace: Option<String>,
    /// Protocol version from the header block, e.g. `1.1`
    pub http_version: Option<String>,
    /// Status line from the header block, e.g. `200 OK`
    pub status_line: Option<String>,
    /// Transfer metadata
    pub info: TransferInfo,
}

impl Response {
    /// Check if status is success (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// Check if status is redirect (3xx)
    pub fn is_redirect(&self) -> bool {
        (300..400).contains(&self.status_code)
    }

    /// Check if status is client error (4xx)
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code)
    }

    /// Check if status is server error (5xx)
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status_code)
    }

    /// Get body as text
    pub fn text(&self) -> &str {
        &self.body
    }

    /// Parse body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_str(&self.body)?)
    }

    /// Get a captured header value, ignoring case
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Get content type, from captured headers or transfer info
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
            .or(self.info.content_type.as_deref())
    }

    /// Get content length
    pub fn content_length(&self) -> Option<usize> {
        self.header("content-length").and_then(|v| v.parse().ok())
    }

    /// Get the final URL
    pub fn url_str(&self) -> &str {
        &self.info.effective_url
    }

    /// Get body length
    pub fn body_len(&self) -> usize {
        self.body.len()
    }
}

/// Displays the body
impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, body: &str) -> Response {
        Response {
            status_code: status,
            body: body.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_response_status() {
        assert!(response(200, "").is_success());
        assert!(response(301, "").is_redirect());
        assert!(response(404, "").is_client_error());
        assert!(response(503, "").is_server_error());
    }

    #[test]
    fn test_response_text_and_display() {
        let resp = response(200, "Hello, World!");
        assert_eq!(resp.text(), "Hello, World!");
        assert_eq!(resp.to_string(), "Hello, World!");
        assert_eq!(resp.body_len(), 13);
    }

    #[test]
    fn test_header_lookup_ignores_case() {
        let mut resp = response(200, "{\"ok\":true}");
        resp.headers.insert("Content-Type".to_string(), "application/json".to_string());
        resp.headers.insert("Content-Length".to_string(), "11".to_string());

        assert_eq!(resp.content_type(), Some("application/json"));
        assert_eq!(resp.content_length(), Some(11));

        let value: serde_json::Value = resp.json().unwrap();
        assert_eq!(value["ok"], true);
    }

    #[test]
    fn test_content_type_falls_back_to_info() {
        let mut resp = response(200, "");
        resp.info.content_type = Some("text/plain".to_string());
        assert_eq!(resp.content_type(), Some("text/plain"));
    }
}
