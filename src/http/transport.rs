// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Transport seam
//!
//! The client never touches sockets. It hands a fully resolved
//! [`RequestOptions`] to a [`Transport`] and gets raw bytes and metadata
//! back, or a [`TransportFailure`] carrying the transport's own message and
//! numeric code.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

use super::request::RequestOptions;
use crate::error::Error;

/// Failure codes, numbered like libcurl's so callers can keep existing tables
pub mod codes {
    pub const UNSUPPORTED_PROTOCOL: u32 = 1;
    pub const URL_MALFORMAT: u32 = 3;
    pub const COULDNT_RESOLVE_PROXY: u32 = 5;
    pub const COULDNT_RESOLVE_HOST: u32 = 6;
    pub const COULDNT_CONNECT: u32 = 7;
    pub const OPERATION_TIMEDOUT: u32 = 28;
    pub const SSL_CONNECT_ERROR: u32 = 35;
    pub const TOO_MANY_REDIRECTS: u32 = 47;
    pub const RECV_ERROR: u32 = 56;
    pub const PEER_FAILED_VERIFICATION: u32 = 60;
    pub const SSL_CACERT_BADFILE: u32 = 77;
}

/// Executes one request
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform the request described by `options`
    ///
    /// Any per-request resources are acquired and released inside this call.
    async fn execute(&self, options: &RequestOptions) -> Result<RawResponse, TransportFailure>;
}

/// Transport-level failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} (code {code})")]
pub struct TransportFailure {
    /// Human readable message
    pub message: String,
    /// Numeric code, see [`codes`]
    pub code: u32,
}

impl TransportFailure {
    pub fn new(message: impl Into<String>, code: u32) -> Self {
        Self {
            message: message.into(),
            code,
        }
    }
}

impl From<TransportFailure> for Error {
    fn from(failure: TransportFailure) -> Self {
        Error::Transport {
            message: failure.message,
            code: failure.code,
        }
    }
}

/// Metadata about a finished transfer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferInfo {
    /// URL after redirects
    pub effective_url: String,
    /// Final status code
    pub status: u16,
    pub content_type: Option<String>,
    /// e.g. `HTTP/1.1`
    pub http_version: Option<String>,
    pub total_time: Duration,
    /// Body bytes received
    pub size_download: u64,
    /// Bytes of header blocks at the start of the payload; zero unless
    /// `include_headers` was set
    pub header_size: u64,
}

/// What the transport returns for a completed exchange
#[derive(Debug, Clone, Default)]
pub struct RawResponse {
    /// Status code reported by the transport
    pub status: u16,
    /// Response headers in arrival order
    pub headers: Vec<(String, String)>,
    /// Payload; starts with `info.header_size` bytes of header blocks when
    /// `include_headers` was set
    pub body: Bytes,
    /// Verbose trace when `verbose` was set
    pub verbose: Option<String>,
    pub info: TransferInfo,
}

impl RawResponse {
    /// Minimal response with a status and body
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        let body = body.into();
        Self {
            status,
            info: TransferInfo {
                status,
                size_download: body.len() as u64,
                ..Default::default()
            },
            body,
            ..Default::default()
        }
    }

    /// Add a header
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Mark the first `size` payload bytes as header blocks
    pub fn header_size(mut self, size: usize) -> Self {
        self.info.header_size = size as u64;
        self
    }

    /// Attach a verbose trace
    pub fn verbose(mut self, trace: impl Into<String>) -> Self {
        self.verbose = Some(trace.into());
        self
    }
}
