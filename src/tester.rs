use std::fmt;

use anyhow::Context;
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use serde_json::{Value, json};

use crate::cms_config::{self, ConfigError, DuplicateScope};
use crate::config::BaseUrl;
use crate::progress::{CheckProgress, check_spinner};
use crate::types::{CheckOutcome, CheckResult, Payload};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
        }
    }
}

/// How a successful response body is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyMode {
    Json,
    Text,
}

#[derive(Debug, Clone)]
pub struct CheckRequest {
    pub name: &'static str,
    pub method: Method,
    pub endpoint: &'static str,
    pub expected_status: u16,
    pub body: Option<Value>,
    pub mode: BodyMode,
}

impl CheckRequest {
    pub fn get(name: &'static str, endpoint: &'static str, expected_status: u16) -> Self {
        Self {
            name,
            method: Method::Get,
            endpoint,
            expected_status,
            body: None,
            mode: BodyMode::Json,
        }
    }

    pub fn post(name: &'static str, endpoint: &'static str, expected_status: u16, body: Value) -> Self {
        Self {
            name,
            method: Method::Post,
            endpoint,
            expected_status,
            body: Some(body),
            mode: BodyMode::Json,
        }
    }

    pub fn text(mut self) -> Self {
        self.mode = BodyMode::Text;
        self
    }
}

/// Issues checks against one base URL and counts how many ran and passed.
pub struct Tester {
    base: BaseUrl,
    client: Client,
    verbose: bool,
    checks_run: usize,
    checks_passed: usize,
}

impl Tester {
    pub fn new(base: BaseUrl, verbose: bool) -> anyhow::Result<Self> {
        let client = Client::builder()
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            base,
            client,
            verbose,
            checks_run: 0,
            checks_passed: 0,
        })
    }

    pub fn checks_run(&self) -> usize {
        self.checks_run
    }

    pub fn checks_passed(&self) -> usize {
        self.checks_passed
    }

    /// Run one request and compare its status. Never fails: every problem is
    /// reported through the returned outcome.
    pub fn run_check(&mut self, req: &CheckRequest) -> CheckOutcome {
        let url = self.base.join(req.endpoint);
        self.checks_run += 1;

        if self.verbose {
            eprintln!("  {} {}", req.method, url);
        }
        let progress = check_spinner(req.name);

        let mut builder = match req.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
        };
        if req.mode == BodyMode::Json {
            builder = builder.header(CONTENT_TYPE, "application/json");
        }
        if let Some(body) = &req.body {
            builder = builder.json(body);
        }

        let response = match builder.send() {
            Ok(r) => r,
            Err(e) => return transport_failure(&progress, e),
        };
        let status = response.status().as_u16();
        let text = match response.text() {
            Ok(t) => t,
            Err(e) => return transport_failure(&progress, e),
        };

        if status == req.expected_status {
            self.checks_passed += 1;
            progress.finish(true, &format!("Status: {status}"));
            CheckOutcome::Passed {
                status,
                payload: decode_body(text, req.mode == BodyMode::Json),
            }
        } else {
            progress.finish(
                false,
                &format!("Expected {}, got {status}", req.expected_status),
            );
            CheckOutcome::StatusMismatch {
                expected: req.expected_status,
                actual: status,
                payload: decode_body(text, true),
            }
        }
    }

    fn named(&mut self, req: CheckRequest) -> CheckResult {
        let outcome = self.run_check(&req);
        CheckResult {
            name: req.name.to_string(),
            outcome,
        }
    }

    pub fn api_root(&mut self) -> CheckResult {
        self.named(CheckRequest::get("API Root Endpoint", "api", 200))
    }

    pub fn status_list(&mut self) -> CheckResult {
        self.named(CheckRequest::get("Status Endpoint", "api/status", 200))
    }

    pub fn create_status(&mut self) -> CheckResult {
        self.named(CheckRequest::post(
            "Create Status Check",
            "api/status",
            200,
            json!({ "client_name": "test_client" }),
        ))
    }

    pub fn admin_page(&mut self) -> CheckResult {
        self.named(CheckRequest::get("CMS Admin Page", "admin/index.html", 200).text())
    }

    /// Fetch `admin/config.yml` and validate it. A config that does not parse
    /// or repeats field names fails the check even on a 200, but the pass
    /// counter keeps the HTTP result.
    pub fn cms_config(&mut self, scope: DuplicateScope) -> CheckResult {
        let mut result = self.named(CheckRequest::get("CMS Config", "admin/config.yml", 200).text());

        if let CheckOutcome::Passed {
            payload: Payload::Text(text),
            ..
        } = &result.outcome
        {
            match cms_config::validate(text, scope) {
                Ok(summary) => {
                    eprintln!(
                        "  config.yml valid: {} collections, {} fields",
                        summary.collections, summary.fields
                    );
                }
                Err(ConfigError::Parse(error)) => {
                    eprintln!("  ✗ YAML validation failed: {error}");
                    result.outcome = CheckOutcome::Parse { error };
                }
                Err(ConfigError::Duplicates(duplicates)) => {
                    eprintln!("  ✗ Duplicate field names found: {}", duplicates.join(", "));
                    result.outcome = CheckOutcome::Validation { duplicates };
                }
            }
        }
        result
    }
}

/// The top-level reqwest message only names the URL; the cause (refused,
/// DNS, timeout) lives further down the source chain.
fn transport_failure(progress: &CheckProgress, e: reqwest::Error) -> CheckOutcome {
    let error = format!("{:#}", anyhow::Error::from(e));
    progress.finish(false, &format!("Error: {error}"));
    CheckOutcome::Transport { error }
}

fn decode_body(text: String, try_json: bool) -> Payload {
    if try_json {
        if let Ok(value) = serde_json::from_str::<Value>(&text) {
            return Payload::Json(value);
        }
    }
    Payload::Text(text)
}
