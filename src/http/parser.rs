// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Response parsing
//!
//! When the transport includes headers in the payload, the first
//! `header_size` bytes hold one header block per hop (redirects,
//! `100 Continue`), each ending in an empty line. That section is cut off
//! the body and the last block in it is the final response's. Anything
//! after it is body, even if it looks like a header block.

use std::collections::BTreeMap;

use bytes::Bytes;
use lazy_static::lazy_static;
use regex::bytes::Regex;

use super::config::CaptureFlags;
use super::response::Response;
use super::transport::RawResponse;

lazy_static! {
    /// A status line, any header lines, then an empty line
    static ref HEADER_BLOCK: Regex =
        Regex::new(r"(?-u)\AHTTP/\d(?:\.\d)?[^\r\n]*(?:\r?\n[^\r\n]+)*\r?\n\r?\n").unwrap();
    static ref STATUS_LINE: Regex =
        Regex::new(r"(?-u)^HTTP/(\d(?:\.\d)?)\s+(\d{3})(?:\s+(.*))?$").unwrap();
}

/// Header block parsed out of a payload
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderBlock {
    /// e.g. `1.1`
    pub http_version: Option<String>,
    pub status_code: Option<u16>,
    /// e.g. `200 OK`
    pub status_line: Option<String>,
    pub headers: BTreeMap<String, String>,
}

impl HeaderBlock {
    /// Parse one block
    pub fn parse(block: &[u8]) -> Self {
        let text = String::from_utf8_lossy(block);
        let mut lines = text.lines().map(str::trim_end).filter(|l| !l.is_empty());
        let mut parsed = HeaderBlock::default();

        if let Some(first) = lines.next() {
            if let Some(caps) = STATUS_LINE.captures(first.as_bytes()) {
                let version = caps.get(1).map(|m| String::from_utf8_lossy(m.as_bytes()).into_owned());
                let code = caps.get(2).map(|m| String::from_utf8_lossy(m.as_bytes()).into_owned());
                let reason = caps
                    .get(3)
                    .map(|m| String::from_utf8_lossy(m.as_bytes()).trim().to_string())
                    .unwrap_or_default();

                parsed.status_code = code.as_deref().and_then(|c| c.parse().ok());
                parsed.status_line = code.map(|c| format!("{} {}", c, reason).trim_end().to_string());
                parsed.http_version = version;
            }
        }

        // Repeated names keep the last value
        for line in lines {
            if let Some((name, value)) = line.split_once(':') {
                parsed
                    .headers
                    .insert(name.trim().to_string(), value.trim().to_string());
            }
        }

        parsed
    }
}

/// Split the leading `header_size` bytes of header blocks off a payload
///
/// Returns the remaining body and the last block, if any.
pub fn split_header_blocks(payload: &Bytes, header_size: usize) -> (Bytes, Option<HeaderBlock>) {
    let header_size = header_size.min(payload.len());
    let section = &payload[..header_size];
    let mut offset = 0;
    let mut last = None;

    while let Some(m) = HEADER_BLOCK.find(&section[offset..]) {
        last = Some(HeaderBlock::parse(m.as_bytes()));
        offset += m.end();
    }

    (payload.slice(header_size..), last)
}

/// Turns raw transport output into a [`Response`]
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseParser {
    capture: CaptureFlags,
}

impl ResponseParser {
    pub fn new(capture: CaptureFlags) -> Self {
        Self { capture }
    }

    /// Parse a raw response
    ///
    /// `headers_in_payload` says whether the request asked the transport to
    /// put the header block into the payload.
    pub fn parse(&self, raw: RawResponse, headers_in_payload: bool) -> Response {
        let (body, block) = if headers_in_payload {
            split_header_blocks(&raw.body, raw.info.header_size as usize)
        } else {
            (raw.body.clone(), None)
        };

        let mut response = Response {
            status_code: raw.status,
            body: String::from_utf8_lossy(&body).into_owned(),
            http_version: raw
                .info
                .http_version
                .as_deref()
                .map(|v| v.trim_start_matches("HTTP/").to_string()),
            info: raw.info,
            ..Default::default()
        };

        match block {
            Some(block) => {
                if let Some(code) = block.status_code {
                    response.status_code = code;
                }
                response.http_version = block.http_version.or(response.http_version);
                response.status_line = block.status_line;
                if self.capture.capture_headers {
                    response.headers = block.headers;
                }
            }
            None if self.capture.capture_headers => {
                response.headers = raw.headers.into_iter().collect();
            }
            None => {}
        }

        if self.capture.debug {
            response.debug_trace = raw.verbose;
        }

        tracing::trace!(
            status = response.status_code,
            headers = response.headers.len(),
            body_len = response.body.len(),
            "Parsed response"
        );

        response
    }
}
