use canary_api::{HttpStep, StepRequest};
use canary_config::{CanaryConfig, EndpointDescriptor};
use tracing::debug;

use crate::log::{LogSink, StepLog, TracingLog};
use crate::outcome::{CheckError, CheckResult, RunOutcome};

const USER_AGENT: &str = "User-Agent";

/// An endpoint paired with the request that checks it.
#[derive(Debug, Clone)]
struct PlannedStep {
    endpoint: EndpointDescriptor,
    request: StepRequest,
}

/// Checks a fixed, ordered list of endpoints one at a time.
///
/// The first endpoint that fails (wrong status or no response at all)
/// ends the run; endpoints after it are never requested. Slow responses
/// only produce a warning. The checker keeps no state between runs.
pub struct EndpointChecker<H, L = TracingLog> {
    config: CanaryConfig,
    steps: Vec<PlannedStep>,
    http: H,
    log: L,
}

impl<H: HttpStep> EndpointChecker<H, TracingLog> {
    pub fn new(config: &CanaryConfig, http: H) -> Result<Self, CheckError> {
        Self::with_log(config, http, TracingLog)
    }
}

impl<H: HttpStep, L: LogSink> EndpointChecker<H, L> {
    /// Resolve and validate `config`, then derive one request per endpoint.
    pub fn with_log(config: &CanaryConfig, http: H, log: L) -> Result<Self, CheckError> {
        let config = config.resolve();
        config.validate()?;

        let steps = config
            .endpoints
            .iter()
            .map(|endpoint| -> Result<PlannedStep, CheckError> {
                let target = endpoint.target()?;
                let request =
                    StepRequest::get(target.scheme, target.host, target.port, target.path)
                        .header(USER_AGENT, config.user_agent.as_str());
                Ok(PlannedStep {
                    endpoint: endpoint.clone(),
                    request,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            config,
            steps,
            http,
            log,
        })
    }

    /// The resolved configuration this checker runs with.
    pub fn config(&self) -> &CanaryConfig {
        &self.config
    }

    pub async fn run(&self) -> Result<RunOutcome, CheckError> {
        debug!(
            domain = %self.config.domain_name,
            endpoints = self.steps.len(),
            "starting canary run"
        );

        let mut results = Vec::with_capacity(self.steps.len());
        for step in &self.steps {
            results.push(self.check(step).await?);
        }
        Ok(RunOutcome { results })
    }

    async fn check(&self, step: &PlannedStep) -> Result<CheckResult, CheckError> {
        let name = step.endpoint.name.as_str();
        let expected = step.endpoint.expected_status;

        let resp = self
            .http
            .execute(name, &step.request)
            .await
            .map_err(|source| CheckError::Network {
                endpoint: name.to_string(),
                source,
            })?;
        let elapsed_ms = resp.elapsed_ms();

        if resp.status != expected {
            return Err(CheckError::StatusMismatch {
                endpoint: name.to_string(),
                expected,
                observed: resp.status,
                response_time_ms: elapsed_ms,
            });
        }

        if elapsed_ms > self.config.slow_response_threshold_ms {
            self.log.warn(&StepLog {
                endpoint: name,
                status: resp.status,
                elapsed_ms,
                message: &format!("High response time: {elapsed_ms}ms for {name}"),
            });
        }

        self.log.info(&StepLog {
            endpoint: name,
            status: resp.status,
            elapsed_ms,
            message: &format!(
                "{name} completed successfully - Status: {}, Response Time: {elapsed_ms}ms",
                resp.status
            ),
        });

        Ok(CheckResult {
            name: name.to_string(),
            observed_status: resp.status,
            response_time_ms: elapsed_ms,
            passed: true,
        })
    }
}

impl<H, L> std::fmt::Debug for EndpointChecker<H, L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EndpointChecker")
            .field("domain", &self.config.domain_name)
            .field("endpoints", &self.steps.len())
            .finish()
    }
}
