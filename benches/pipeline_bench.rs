// Copyright (c) 2026 Bountyy Oy. All rights reserved.

use bytes::Bytes;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use reqkit::{CaptureFlags, ClientConfig, Method, OptionResolver, RawResponse, ResponseParser, Vars};

fn resolve_benchmark(c: &mut Criterion) {
    let config = ClientConfig::new()
        .header("Accept", "application/json")
        .referer("https://example.com/")
        .basic_auth("user", "secret")
        .option("CURLOPT_TIMEOUT", 5)
        .and_then(|c| c.option("maxredirs", 3))
        .expect("valid options");
    let resolver = OptionResolver::new(&config);
    let vars = Vars::from([("q", "rust http"), ("page", "2")]);

    c.bench_function("resolve_get", |b| {
        b.iter(|| {
            let url = OptionResolver::create_get_url("https://example.com/search", &vars);
            black_box(resolver.resolve(Method::Get, &url, &Vars::none(), None).ok())
        })
    });

    c.bench_function("resolve_post", |b| {
        b.iter(|| {
            black_box(
                resolver
                    .resolve(Method::Post, "https://example.com/form", &vars, None)
                    .ok(),
            )
        })
    });
}

fn parse_benchmark(c: &mut Criterion) {
    let payload = Bytes::from_static(
        b"HTTP/1.1 301 Moved Permanently\r\nLocation: /next\r\n\r\n\
          HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 11\r\n\r\n\
          {\"ok\":true}",
    );
    let header_size = payload.len() - b"{\"ok\":true}".len();
    let parser = ResponseParser::new(CaptureFlags::new(false, true).include_headers(true));

    c.bench_function("parse_with_header_blocks", |b| {
        b.iter(|| {
            let raw = RawResponse::new(200, payload.clone()).header_size(header_size);
            black_box(parser.parse(raw, true))
        })
    });
}

criterion_group!(benches, resolve_benchmark, parse_benchmark);
criterion_main!(benches);
