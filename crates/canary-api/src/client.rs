use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tracing::debug;
use url::Url;

use crate::redact::Redactor;
use crate::step::{HttpStep, StepRequest, StepResponse};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("header {name} has an invalid name or value")]
    InvalidHeader { name: String },
}

/// HTTP client that executes canary steps.
///
/// Wraps [`reqwest::Client`] with the [`Redactor`] applied to anything it
/// logs or returns in errors. Each step names its own scheme, host and
/// port; an origin override sends every step to one fixed origin instead,
/// keeping the step's path.
#[derive(Clone)]
pub struct HttpClient {
    inner: reqwest::Client,
    origin_override: Option<Url>,
    redactor: Redactor,
}

impl HttpClient {
    /// `timeout` bounds each request from connect to the end of the body;
    /// `None` leaves requests unbounded.
    pub fn new(timeout: Option<Duration>) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let inner = builder.build().map_err(ApiError::Build)?;

        Ok(Self {
            inner,
            origin_override: None,
            redactor: Redactor::default(),
        })
    }

    pub fn with_redactor(mut self, redactor: Redactor) -> Self {
        self.redactor = redactor;
        self
    }

    /// Send every step to `origin` regardless of the host it names.
    pub fn with_origin_override(mut self, origin: &str) -> Result<Self, ApiError> {
        self.origin_override = Some(Url::parse(origin)?);
        Ok(self)
    }

    pub fn origin_override(&self) -> Option<&Url> {
        self.origin_override.as_ref()
    }

    fn target_url(&self, request: &StepRequest) -> Result<Url, ApiError> {
        match &self.origin_override {
            Some(origin) => Ok(origin.join(&request.path)?),
            None => request.url(),
        }
    }

    fn header_map(headers: &[(String, String)]) -> Result<HeaderMap, ApiError> {
        let mut map = HeaderMap::with_capacity(headers.len());
        for (name, value) in headers {
            let invalid = || ApiError::InvalidHeader { name: name.clone() };
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid())?;
            let header_value = HeaderValue::from_str(value).map_err(|_| invalid())?;
            map.append(header_name, header_value);
        }
        Ok(map)
    }
}

impl HttpStep for HttpClient {
    async fn execute(&self, step: &str, request: &StepRequest) -> Result<StepResponse, ApiError> {
        let url = self.target_url(request)?;
        let headers = Self::header_map(&request.headers)?;
        let shown_url = self.redactor.url(&url);

        debug!(
            %step,
            method = %request.method,
            url = %shown_url,
            headers = ?self.redactor.headers(&request.headers),
            "executing HTTP step"
        );

        let failed = |source: reqwest::Error| ApiError::Request {
            url: shown_url.clone(),
            source: source.without_url(),
        };

        let started = Instant::now();
        let resp = self
            .inner
            .request(request.method.clone(), url)
            .headers(headers)
            .send()
            .await
            .map_err(failed)?;
        let status = resp.status().as_u16();
        // Response time covers the whole body, not just the headers.
        resp.bytes().await.map_err(failed)?;
        let elapsed = started.elapsed();

        debug!(%step, status, elapsed_ms = elapsed.as_millis() as u64, "HTTP step finished");
        Ok(StepResponse { status, elapsed })
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field(
                "origin_override",
                &self.origin_override.as_ref().map(Url::as_str),
            )
            .finish()
    }
}
