// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! reqkit CLI
//!
//! Thin command line front end over the reqkit library.

use std::env;
use std::process::ExitCode;

use anyhow::{bail, Context};
use reqkit::{CaptureFlags, ClientConfig, HttpClient, Method, PutData, Response, Vars};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("reqkit=info".parse().unwrap()),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        return ExitCode::from(1);
    }

    let method = match args[1].as_str() {
        "get" | "head" | "delete" | "post" | "put" => Method::from(args[1].as_str()),
        "--help" | "-h" | "help" => {
            print_usage();
            return ExitCode::SUCCESS;
        }
        "--version" | "-v" | "version" => {
            println!("reqkit {}", reqkit::VERSION);
            return ExitCode::SUCCESS;
        }
        cmd => {
            eprintln!("Unknown command: {}", cmd);
            print_usage();
            return ExitCode::from(1);
        }
    };

    let invocation = match Invocation::parse(method, &args[2..]) {
        Ok(inv) => inv,
        Err(e) => {
            eprintln!("{:#}", e);
            return ExitCode::from(1);
        }
    };

    match invocation.run().await {
        Ok(response) => {
            print_response(&response, invocation.show_headers);
            if response.is_success() || response.is_redirect() {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(2)
            }
        }
        Err(e) => {
            eprintln!("Request failed: {:#}", e);
            ExitCode::from(1)
        }
    }
}

fn print_usage() {
    println!(
        r#"reqkit - Configurable HTTP client

USAGE:
    reqkit <METHOD> <url> [DATA] [OPTIONS]

METHODS:
    get <url>           Send a GET request
    head <url>          Send a HEAD request
    delete <url>        Send a DELETE request
    post <url> k=v...   Send form-encoded POST vars
    put <url> <data>    Send DATA as the PUT body (@file reads a file)

OPTIONS:
    -q, --query k=v             Add a query variable
    -H, --header "Name: value"  Add a request header
    -o, --option NAME=value     Set a raw transport option (e.g. TIMEOUT=5)
    -u, --user user[:password]  Basic auth credentials
    -c, --cookies <file>        Cookie file to read and update
    -i, --include               Capture and print response headers
        --verbose               Print the transfer trace
        --verify                Validate TLS certificates
        --no-follow             Do not follow redirects

EXAMPLES:
    reqkit get https://example.com -q page=2
    reqkit post https://example.com/login user=me pass=secret -c jar.json
    reqkit put https://example.com/item/1 @item.json -H "Content-Type: application/json"
"#
    );
}

/// One parsed command line
struct Invocation {
    method: Method,
    url: String,
    query: Vec<(String, String)>,
    form: Vec<(String, String)>,
    data: Option<String>,
    client: HttpClient,
    show_headers: bool,
}

impl Invocation {
    fn parse(method: Method, args: &[String]) -> anyhow::Result<Self> {
        let Some(url) = args.first() else {
            bail!("Usage: reqkit {} <url>", method.as_str().to_lowercase());
        };

        let mut config = ClientConfig::new();
        let mut capture = CaptureFlags::default();
        let mut query = Vec::new();
        let mut form = Vec::new();
        let mut data = None;

        let mut rest = args[1..].iter();
        while let Some(arg) = rest.next() {
            match arg.as_str() {
                "-q" | "--query" => query.push(split_pair(next_value(&mut rest, arg)?, '=')?),
                "-H" | "--header" => {
                    let (name, value) = split_pair(next_value(&mut rest, arg)?, ':')?;
                    config = config.header(name, value);
                }
                "-o" | "--option" => {
                    let (name, value) = split_pair(next_value(&mut rest, arg)?, '=')?;
                    config = config.option(&name, option_value(&value))?;
                }
                "-u" | "--user" => {
                    let creds = next_value(&mut rest, arg)?;
                    let (user, pass) = creds.split_once(':').unwrap_or((creds, ""));
                    config = config.basic_auth(user, pass);
                }
                "-c" | "--cookies" => config = config.cookie_file(next_value(&mut rest, arg)?),
                "-i" | "--include" => capture.capture_headers = true,
                "--verbose" => capture.debug = true,
                "--verify" => config = config.validate_ssl(true),
                "--no-follow" => config = config.follow_redirects(false),
                other if other.starts_with('-') => bail!("Unknown option: {}", other),
                other if method == Method::Put && data.is_none() => data = Some(other.to_string()),
                other => form.push(split_pair(other, '=')?),
            }
        }

        Ok(Self {
            method,
            url: url.clone(),
            query,
            form,
            data,
            client: HttpClient::with_config(config.capture(capture)),
            show_headers: capture.capture_headers,
        })
    }

    async fn run(&self) -> anyhow::Result<Response> {
        let query = Vars::from(self.query.clone());
        let response = match self.method {
            Method::Get => self.client.get(&self.url, query).await?,
            Method::Head => self.client.head(&self.url, query).await?,
            Method::Delete => self.client.delete(&self.url, query).await?,
            Method::Post => {
                let url = reqkit::http::create_get_url(&self.url, &query);
                self.client.post(url, self.form.clone()).await?
            }
            Method::Put => {
                let data = match self.data.as_deref() {
                    Some(path) if path.starts_with('@') => Some(
                        PutData::from_file(&path[1..])
                            .with_context(|| format!("reading PUT data from {}", &path[1..]))?,
                    ),
                    Some(text) => Some(PutData::from(text)),
                    None => None,
                };
                self.client.put(&self.url, data, query).await?
            }
            Method::Other(_) => bail!("Unsupported method: {}", self.method),
        };
        Ok(response)
    }
}

fn next_value<'a>(
    rest: &mut std::slice::Iter<'a, String>,
    flag: &str,
) -> anyhow::Result<&'a str> {
    rest.next()
        .map(String::as_str)
        .with_context(|| format!("{} needs a value", flag))
}

fn split_pair(s: &str, sep: char) -> anyhow::Result<(String, String)> {
    match s.split_once(sep) {
        Some((k, v)) => Ok((k.trim().to_string(), v.trim().to_string())),
        None => bail!("Expected name{}value, got {:?}", sep, s),
    }
}

fn option_value(value: &str) -> reqkit::OptionValue {
    match value {
        "true" => true.into(),
        "false" => false.into(),
        v => v.parse::<i64>().map(Into::into).unwrap_or_else(|_| v.into()),
    }
}

fn print_response(response: &Response, show_headers: bool) {
    if let Some(ref trace) = response.debug_trace {
        eprintln!("{}", trace);
    }

    if show_headers {
        match response.status_line {
            Some(ref line) => println!("HTTP/{} {}", response.http_version.as_deref().unwrap_or("1.1"), line),
            None => println!("Status: {}", response.status_code),
        }
        for (name, value) in &response.headers {
            println!("{}: {}", name, value);
        }
        println!();
    }

    print!("{}", response);
}
