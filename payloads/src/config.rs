use std::time::Duration;

/// Environment variable overriding the backend base URL.
///
/// Read at runtime on native targets and at build time for the browser
/// bundle, where no process environment exists.
pub const BACKEND_URL_VAR: &str = "SURVEY_BACKEND_URL";
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL including the `/api` prefix, without a trailing slash.
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: REQUEST_TIMEOUT,
        }
    }

    pub fn from_env() -> Self {
        #[cfg(target_arch = "wasm32")]
        let configured = option_env!("SURVEY_BACKEND_URL").map(str::to_string);

        #[cfg(not(target_arch = "wasm32"))]
        let configured = std::env::var(BACKEND_URL_VAR).ok();

        let base_url = configured
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        tracing::debug!(%base_url, "backend configured");
        Self::new(base_url)
    }

    /// Join a request path onto the base URL.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }
}
