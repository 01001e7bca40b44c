use canary_api::{HttpClient, HttpStep, Redactor};
use canary_config::CanaryConfig;
use tracing::{debug, error};

use crate::checker::EndpointChecker;
use crate::log::LogSink;
use crate::outcome::{CheckError, RunReport};

/// Build a checker that checks the configured domain over HTTPS.
pub fn https_checker(config: &CanaryConfig) -> Result<EndpointChecker<HttpClient>, CheckError> {
    let resolved = config.resolve();
    resolved.validate()?;

    let redactor = Redactor::new(
        &resolved.redaction.restricted_headers,
        &resolved.redaction.restricted_url_parameters,
    );
    let http = HttpClient::new(resolved.request_timeout())
        .map_err(CheckError::Client)?
        .with_redactor(redactor);

    EndpointChecker::new(&resolved, http)
}

/// Run one pass and turn the result into the verdict for the hosting runtime.
pub async fn invoke<H: HttpStep, L: LogSink>(checker: &EndpointChecker<H, L>) -> RunReport {
    let result = checker.run().await;
    match &result {
        Ok(outcome) => debug!(endpoints = outcome.results.len(), "canary run succeeded"),
        Err(e) => error!(
            error = %e,
            endpoint = e.endpoint().unwrap_or_default(),
            "canary run failed"
        ),
    }
    RunReport::from(result)
}
