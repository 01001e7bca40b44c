use std::time::Duration;

use reqwest::Method;
use url::Url;

use crate::client::ApiError;

/// A single HTTP request issued as one named canary step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRequest {
    pub method: Method,
    /// `https` in production.
    pub scheme: String,
    pub host: String,
    pub port: u16,
    /// Path and query, always starting with `/`.
    pub path: String,
    pub headers: Vec<(String, String)>,
}

impl StepRequest {
    pub fn get(
        scheme: impl Into<String>,
        host: impl Into<String>,
        port: u16,
        path: impl Into<String>,
    ) -> Self {
        Self {
            method: Method::GET,
            scheme: scheme.into(),
            host: host.into(),
            port,
            path: path.into(),
            headers: Vec::new(),
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// `{scheme}://{host}:{port}/`
    pub fn origin(&self) -> Result<Url, ApiError> {
        Ok(Url::parse(&format!(
            "{}://{}:{}/",
            self.scheme, self.host, self.port
        ))?)
    }

    /// Full request URL: the origin joined with the path.
    pub fn url(&self) -> Result<Url, ApiError> {
        Ok(self.origin()?.join(&self.path)?)
    }
}

/// What a step observed: the status code and how long the exchange took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepResponse {
    pub status: u16,
    pub elapsed: Duration,
}

impl StepResponse {
    pub fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.elapsed.as_millis()).unwrap_or(u64::MAX)
    }
}

/// Executes canary HTTP steps.
///
/// Non-2xx responses are not errors here: the caller decides what status
/// it expects. `Err` means the exchange itself failed (connect, TLS,
/// timeout, broken body).
pub trait HttpStep: Send + Sync {
    fn execute(
        &self,
        step: &str,
        request: &StepRequest,
    ) -> impl std::future::Future<Output = Result<StepResponse, ApiError>> + Send;
}
