// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! # reqkit - Configurable HTTP Client
//!
//! A small HTTP client where every verb goes through the same
//! resolve/execute/parse pipeline.
//!
//! ## Features
//!
//! - Verbs: get, post, put, head, delete and a generic `request`
//! - Method rules: POST needs form vars, PUT needs data, nothing else carries a body
//! - Raw transport options as a closed, validated set (`TIMEOUT`, `CURLOPT_MAXREDIRS`, ...)
//! - Cookie file persisted across requests
//! - Basic auth, referer, user agent, redirect policy
//! - Optional header capture and verbose trace per client
//! - Pluggable transport (reqwest by default)
//!
//! ## Example
//!
//! ```rust,no_run
//! use reqkit::{HttpClient, Vars};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut client = HttpClient::new();
//!     client.set_header("Accept", "application/json");
//!     client.set_option("timeout", 10)?;
//!
//!     let resp = client.get("https://example.com/search", [("q", "rust")]).await?;
//!     println!("{} {}", resp.status_code, resp.body);
//!
//!     client.post("https://example.com/login", [("user", "me")]).await?;
//!     client.put("https://example.com/item/1", Some("payload"), Vars::none()).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod http;

// Re-exports for convenience

// Errors
pub use error::{Error, Result};

// Client
pub use http::{CaptureFlags, ClientConfig, CookieFile, Credentials, HandleStats, HttpClient};

// Request side
pub use http::{Method, OptionResolver, OptionValue, PutData, RequestOptions, TransportOption, Vars};

// Response side
pub use http::{Response, ResponseParser};

// Transport
pub use http::{RawResponse, ReqwestTransport, TransferInfo, Transport, TransportFailure};

// Cookies
pub use http::{Cookie, CookieJar};

/// reqkit version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
