use std::path::Path;

use anyhow::Context;

pub const DEFAULT_ENV_FILE: &str = "/app/frontend/.env";
pub const DEFAULT_ENV_KEY: &str = "REACT_APP_BACKEND_URL";

/// Base URL every check is issued against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseUrl {
    url: String,
}

impl BaseUrl {
    pub fn new(url: &str) -> anyhow::Result<Self> {
        let url = url.trim().trim_end_matches('/');
        if url.is_empty() {
            anyhow::bail!("Base URL is empty");
        }
        Ok(Self {
            url: url.to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.url
    }

    /// `<base>/<endpoint>`, with any leading `/` on the endpoint dropped.
    pub fn join(&self, endpoint: &str) -> String {
        format!("{}/{}", self.url, endpoint.trim_start_matches('/'))
    }

    /// Scheme and host, for display only. `None` if the URL does not parse.
    pub fn scheme_and_host(&self) -> Option<(String, String)> {
        let parsed = reqwest::Url::parse(&self.url).ok()?;
        let host = match parsed.port() {
            Some(port) => format!("{}:{}", parsed.host_str()?, port),
            None => parsed.host_str()?.to_string(),
        };
        Some((parsed.scheme().to_string(), host))
    }
}

/// Find the value of the first `KEY=value` line in an env file body.
/// Surrounding whitespace and double quotes are stripped.
pub fn find_env_value(content: &str, key: &str) -> Option<String> {
    let prefix = format!("{key}=");
    content.lines().find_map(|line| {
        line.strip_prefix(&prefix)
            .map(|value| value.trim().trim_matches('"').to_string())
    })
}

/// Read the base URL from `key` in the env file at `path`.
pub fn load_base_url(path: &Path, key: &str) -> anyhow::Result<BaseUrl> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read env file: {}", path.display()))?;
    let value = find_env_value(&content, key)
        .with_context(|| format!("No {key}= entry in {}", path.display()))?;
    BaseUrl::new(&value).with_context(|| format!("{key} is empty in {}", path.display()))
}
