// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Process-wide capture defaults
//!
//! Kept in its own test binary: the global can only be set once per process.

use reqkit::{CaptureFlags, ClientConfig, HttpClient};

#[test]
fn global_capture_is_init_once() {
    let first = CaptureFlags::new(true, false);
    CaptureFlags::init_global(first).unwrap();

    let err = CaptureFlags::init_global(CaptureFlags::new(false, true)).unwrap_err();
    assert!(err.is_configuration());
    assert_eq!(CaptureFlags::global(), first);

    // New clients pick up the global, explicit flags still win
    assert_eq!(HttpClient::new().capture(), first);
    let explicit = ClientConfig::new().capture(CaptureFlags::default());
    assert_eq!(HttpClient::with_config(explicit).capture(), CaptureFlags::default());
}
