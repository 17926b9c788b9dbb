use anyhow::Context;

pub const DEFAULT_UPSTREAM_URL: &str = "http://python-api:8000";

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the inventory microservice, without a trailing slash.
    pub upstream_url: String,
    pub host: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup, so tests don't have to touch the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let upstream_url = lookup("PYTHON_SERVICE_URL")
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_UPSTREAM_URL.to_string());

        Ok(Self {
            upstream_url: upstream_url.trim().trim_end_matches('/').to_string(),
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: lookup("PORT")
                .unwrap_or_else(|| "3000".to_string())
                .parse()
                .context("PORT must be a valid number")?,
        })
    }
}
