// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP client layer
//!
//! One pipeline behind every verb: `OptionResolver` merges the client
//! configuration with the call's method, URL and payload, a `Transport`
//! executes the resolved options, and `ResponseParser` turns the raw result
//! into a `Response`.

mod client;
mod config;
mod cookie;
mod headers;
mod method;
mod options;
mod parser;
mod request;
mod reqwest_transport;
mod resolver;
mod response;
mod transport;
mod vars;

pub use client::{HandleStats, HttpClient};
pub use config::{
    compose_user_agent, CaptureFlags, ClientConfig, CookieFile, Credentials, DEFAULT_CA_BUNDLE,
    DEFAULT_COOKIE_FILE_NAME, DEFAULT_TIMEOUT,
};
pub use cookie::{Cookie, CookieJar};
pub use headers::HeaderList;
pub use method::Method;
pub use options::{OptionValue, RawOptions, TransportOption};
pub use parser::{split_header_blocks, HeaderBlock, ResponseParser};
pub use request::{HttpAuth, PutData, RequestOptions, SslPolicy};
pub use reqwest_transport::{ReqwestTransport, DEFAULT_MAX_REDIRECTS};
pub use resolver::{OptionResolver, HTTPS_DEFAULT_PORT};
pub use response::Response;
pub use transport::{codes, RawResponse, TransferInfo, Transport, TransportFailure};
pub use vars::{create_get_url, Vars};
