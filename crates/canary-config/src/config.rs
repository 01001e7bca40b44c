use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::{Position, Url};

use crate::defaults::{
    DEFAULT_PORT, default_endpoints, default_port, default_slow_response_threshold_ms, default_user_agent,
};
use crate::error::ConfigError;
use crate::template::{DOMAIN_PLACEHOLDER, render_domain};

/// A single URL to check and the status code it must answer with.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EndpointDescriptor {
    pub url: String,
    pub name: String,
    pub expected_status: u16,
}

impl EndpointDescriptor {
    pub fn new(name: impl Into<String>, url: impl Into<String>, expected_status: u16) -> Self {
        Self {
            url: url.into(),
            name: name.into(),
            expected_status,
        }
    }

    /// Path and query of the URL with scheme and host stripped.
    ///
    /// `https://example.com/api/metrics?window=5m` yields
    /// `/api/metrics?window=5m`.
    pub fn request_path(&self) -> Result<String, ConfigError> {
        let url = self.parse_url()?;
        Ok(url[Position::BeforePath..].to_string())
    }

    /// Scheme, host, port and path a check of this endpoint connects to.
    pub fn target(&self) -> Result<Target, ConfigError> {
        let url = self.parse_url()?;
        let Some(host) = url.host_str().filter(|h| !h.is_empty()) else {
            return Err(ConfigError::MissingHost {
                name: self.name.clone(),
                url: self.url.clone(),
            });
        };
        Ok(Target {
            scheme: url.scheme().to_string(),
            host: host.to_string(),
            port: url.port_or_known_default().unwrap_or(DEFAULT_PORT),
            path: url[Position::BeforePath..].to_string(),
        })
    }

    fn parse_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.url).map_err(|source| ConfigError::InvalidUrl {
            name: self.name.clone(),
            url: self.url.clone(),
            source,
        })
    }
}

/// Where a check connects, split out of an endpoint URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Target {
    pub scheme: String,
    pub host: String,
    pub port: u16,
    /// Path and query.
    pub path: String,
}

/// Header names and URL query parameters whose values must never appear
/// in logs or reports.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RedactionConfig {
    #[serde(default)]
    pub restricted_headers: Vec<String>,
    #[serde(default)]
    pub restricted_url_parameters: Vec<String>,
}

/// Everything a canary run needs, fixed before the run starts.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CanaryConfig {
    /// Target domain, substituted into every endpoint URL and used as the
    /// connection host.
    #[serde(default)]
    pub domain_name: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_endpoints")]
    pub endpoints: Vec<EndpointDescriptor>,
    /// Responses slower than this are reported with a warning.
    #[serde(default = "default_slow_response_threshold_ms")]
    pub slow_response_threshold_ms: u64,
    /// Value of the `User-Agent` header sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_ms: Option<u64>,
    #[serde(default)]
    pub redaction: RedactionConfig,
}

impl CanaryConfig {
    /// Built-in configuration for `domain`.
    pub fn for_domain(domain: &str) -> Self {
        Self {
            domain_name: domain.to_string(),
            port: default_port(),
            endpoints: default_endpoints(),
            slow_response_threshold_ms: default_slow_response_threshold_ms(),
            user_agent: default_user_agent(),
            request_timeout_ms: None,
            redaction: RedactionConfig::default(),
        }
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&yaml)
    }

    /// Replace the target domain.
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain_name = domain.into();
        self
    }

    /// Copy of this config with the domain substituted into every endpoint URL.
    pub fn resolve(&self) -> Self {
        let endpoints = self
            .endpoints
            .iter()
            .map(|ep| EndpointDescriptor {
                url: render_domain(&ep.url, &self.domain_name),
                ..ep.clone()
            })
            .collect();
        Self {
            endpoints,
            ..self.clone()
        }
    }

    /// Check the invariants a run relies on. Call on a resolved config.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.domain_name.trim().is_empty() {
            return Err(ConfigError::EmptyDomain);
        }
        if self.endpoints.is_empty() {
            return Err(ConfigError::EmptyEndpoints);
        }
        if self.slow_response_threshold_ms == 0 {
            return Err(ConfigError::InvalidThreshold);
        }
        if !is_valid_header_value(&self.user_agent) {
            return Err(ConfigError::InvalidUserAgent(self.user_agent.clone()));
        }

        let mut seen = HashSet::new();
        for ep in &self.endpoints {
            if !seen.insert(ep.name.as_str()) {
                return Err(ConfigError::DuplicateName {
                    name: ep.name.clone(),
                });
            }
            if !(100..=599).contains(&ep.expected_status) {
                return Err(ConfigError::InvalidStatus {
                    name: ep.name.clone(),
                    status: ep.expected_status,
                });
            }
            if ep.url.contains(DOMAIN_PLACEHOLDER) {
                return Err(ConfigError::UnresolvedPlaceholder {
                    name: ep.name.clone(),
                    url: ep.url.clone(),
                });
            }
            let target = ep.target()?;
            if target.scheme != "https" {
                return Err(ConfigError::NotHttps {
                    name: ep.name.clone(),
                    url: ep.url.clone(),
                });
            }
            if !target.host.eq_ignore_ascii_case(&self.domain_name) || target.port != self.port {
                return Err(ConfigError::ForeignOrigin {
                    name: ep.name.clone(),
                    url: ep.url.clone(),
                    domain: self.domain_name.clone(),
                    port: self.port,
                });
            }
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }
}

/// Visible ASCII plus space and tab, the same set `HeaderValue::from_str` accepts.
fn is_valid_header_value(value: &str) -> bool {
    !value.is_empty()
        && value
            .bytes()
            .all(|b| b == b'\t' || (0x20..0x7f).contains(&b))
}
