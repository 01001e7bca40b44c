use canary_api::ApiError;
use canary_config::ConfigError;
use serde::Serialize;

/// What one endpoint check observed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResult {
    pub name: String,
    pub observed_status: u16,
    pub response_time_ms: u64,
    pub passed: bool,
}

/// Results of a run in which every endpoint passed, in list order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunOutcome {
    pub results: Vec<CheckResult>,
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        self.results.iter().all(|r| r.passed)
    }
}

/// The reason a run stopped. Each endpoint variant names the first failing endpoint.
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    #[error("{endpoint}: expected status {expected}, got {observed}")]
    StatusMismatch {
        endpoint: String,
        expected: u16,
        observed: u16,
        response_time_ms: u64,
    },
    #[error("{endpoint}: {source}")]
    Network {
        endpoint: String,
        #[source]
        source: ApiError,
    },
    #[error("invalid canary configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to set up HTTP client: {0}")]
    Client(#[source] ApiError),
}

impl CheckError {
    /// Name of the endpoint that failed, if the failure came from a check.
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            Self::StatusMismatch { endpoint, .. } | Self::Network { endpoint, .. } => {
                Some(endpoint.as_str())
            }
            Self::Config(_) | Self::Client(_) => None,
        }
    }
}

/// Verdict handed back to the hosting runtime, serialized as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum RunReport {
    Success {
        results: Vec<CheckResult>,
    },
    #[serde(rename_all = "camelCase")]
    Failure {
        #[serde(skip_serializing_if = "Option::is_none")]
        endpoint: Option<String>,
        error: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        failed_check: Option<CheckResult>,
    },
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

impl From<Result<RunOutcome, CheckError>> for RunReport {
    fn from(result: Result<RunOutcome, CheckError>) -> Self {
        match result {
            Ok(outcome) => Self::Success {
                results: outcome.results,
            },
            Err(err) => {
                let failed_check = match &err {
                    CheckError::StatusMismatch {
                        endpoint,
                        observed,
                        response_time_ms,
                        ..
                    } => Some(CheckResult {
                        name: endpoint.clone(),
                        observed_status: *observed,
                        response_time_ms: *response_time_ms,
                        passed: false,
                    }),
                    _ => None,
                };
                Self::Failure {
                    endpoint: err.endpoint().map(str::to_string),
                    error: err.to_string(),
                    failed_check,
                }
            }
        }
    }
}
