//! Tests for `EndpointChecker::run` against a scripted HTTP step and a
//! recording log sink.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use canary_api::{ApiError, HttpStep, StepRequest, StepResponse};
use canary_config::{CanaryConfig, ConfigError, EndpointDescriptor};
use canary_runner::{CheckError, CheckResult, EndpointChecker, LogSink, RunReport, StepLog};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

enum Scripted {
    Respond { status: u16, elapsed_ms: u64 },
    NetworkFailure,
}

fn ok(elapsed_ms: u64) -> Scripted {
    Scripted::Respond {
        status: 200,
        elapsed_ms,
    }
}

fn status(status: u16, elapsed_ms: u64) -> Scripted {
    Scripted::Respond { status, elapsed_ms }
}

/// Replays scripted responses in order and records every call.
#[derive(Default)]
struct ScriptedStep {
    script: Mutex<VecDeque<Scripted>>,
    calls: Mutex<Vec<(String, StepRequest)>>,
}

impl ScriptedStep {
    fn new(script: impl IntoIterator<Item = Scripted>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            calls: Mutex::default(),
        }
    }

    fn called_steps(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(step, _)| step.clone())
            .collect()
    }

    fn requests(&self) -> Vec<StepRequest> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, req)| req.clone())
            .collect()
    }
}

impl HttpStep for &ScriptedStep {
    async fn execute(&self, step: &str, request: &StepRequest) -> Result<StepResponse, ApiError> {
        self.calls
            .lock()
            .unwrap()
            .push((step.to_string(), request.clone()));
        let next = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected request for step {step}"));
        match next {
            Scripted::Respond { status, elapsed_ms } => Ok(StepResponse {
                status,
                elapsed: Duration::from_millis(elapsed_ms),
            }),
            Scripted::NetworkFailure => Err(ApiError::InvalidUrl(url::ParseError::EmptyHost)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Level {
    Info,
    Warn,
}

/// One recorded log call with its structured fields.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Line {
    level: Level,
    endpoint: String,
    status: u16,
    elapsed_ms: u64,
    message: String,
}

#[derive(Default)]
struct RecordingLog {
    lines: Mutex<Vec<Line>>,
}

impl RecordingLog {
    fn lines(&self) -> Vec<Line> {
        self.lines.lock().unwrap().clone()
    }

    fn at(&self, level: Level) -> Vec<Line> {
        self.lines()
            .into_iter()
            .filter(|line| line.level == level)
            .collect()
    }

    fn count(&self, level: Level) -> usize {
        self.at(level).len()
    }

    fn record(&self, level: Level, line: &StepLog<'_>) {
        self.lines.lock().unwrap().push(Line {
            level,
            endpoint: line.endpoint.to_string(),
            status: line.status,
            elapsed_ms: line.elapsed_ms,
            message: line.message.to_string(),
        });
    }
}

impl LogSink for &RecordingLog {
    fn info(&self, line: &StepLog<'_>) {
        self.record(Level::Info, line);
    }

    fn warn(&self, line: &StepLog<'_>) {
        self.record(Level::Warn, line);
    }
}

fn config() -> CanaryConfig {
    CanaryConfig::for_domain("example.com")
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

mod construction {
    use super::*;

    #[test]
    fn resolves_domain_into_requests() {
        let http = ScriptedStep::default();
        let checker = EndpointChecker::new(&config(), &http).unwrap();
        assert_eq!(
            checker.config().endpoints[0].url,
            "https://example.com/health"
        );
    }

    #[test]
    fn rejects_missing_domain() {
        let http = ScriptedStep::default();
        let err = EndpointChecker::new(&CanaryConfig::for_domain(""), &http).unwrap_err();
        assert!(
            matches!(err, CheckError::Config(ConfigError::EmptyDomain)),
            "got: {err}"
        );
    }

    #[test]
    fn rejects_empty_endpoint_list() {
        let mut config = config();
        config.endpoints.clear();
        let http = ScriptedStep::default();
        let err = EndpointChecker::new(&config, &http).unwrap_err();
        assert!(matches!(err, CheckError::Config(ConfigError::EmptyEndpoints)));
        assert!(err.endpoint().is_none());
    }

    #[test]
    fn rejects_endpoint_on_another_origin() {
        let mut config = config();
        config.endpoints.push(EndpointDescriptor::new(
            "Status Page",
            "https://status.other.net:8443/health",
            200,
        ));
        let http = ScriptedStep::default();
        let err = EndpointChecker::new(&config, &http).unwrap_err();
        match err {
            CheckError::Config(ConfigError::ForeignOrigin { name, domain, port, .. }) => {
                assert_eq!(name, "Status Page");
                assert_eq!(domain, "example.com");
                assert_eq!(port, 443);
            }
            other => panic!("expected ForeignOrigin, got: {other}"),
        }
        assert!(http.called_steps().is_empty());
    }

    #[test]
    fn debug_impl_shows_domain() {
        let http = ScriptedStep::default();
        let checker = EndpointChecker::new(&config(), &http).unwrap();
        let debug = format!("{checker:?}");
        assert!(debug.contains("example.com"), "got: {debug}");
    }
}

// ---------------------------------------------------------------------------
// Runs
// ---------------------------------------------------------------------------

mod run {
    use super::*;

    #[tokio::test]
    async fn all_passing_logs_one_info_line_per_endpoint_in_order() {
        let http = ScriptedStep::new([ok(40), ok(60), ok(80)]);
        let log = RecordingLog::default();
        let checker = EndpointChecker::with_log(&config(), &http, &log).unwrap();

        let outcome = checker.run().await.unwrap();

        assert!(outcome.is_success());
        assert_eq!(outcome.results.len(), 3);
        let logged: Vec<String> = log.lines().into_iter().map(|l| l.endpoint).collect();
        assert_eq!(logged, ["Health Check", "Network Status API", "Metrics API"]);
        assert_eq!(log.count(Level::Info), 3);
        assert_eq!(log.count(Level::Warn), 0);
    }

    #[tokio::test]
    async fn info_line_carries_status_and_elapsed_fields() {
        let mut config = config();
        config.endpoints = vec![EndpointDescriptor::new(
            "Accepted",
            "https://${domain_name}/queue",
            202,
        )];
        let http = ScriptedStep::new([status(202, 75)]);
        let log = RecordingLog::default();
        let checker = EndpointChecker::with_log(&config, &http, &log).unwrap();

        checker.run().await.unwrap();

        assert_eq!(
            log.lines(),
            [Line {
                level: Level::Info,
                endpoint: "Accepted".into(),
                status: 202,
                elapsed_ms: 75,
                message: "Accepted completed successfully - Status: 202, Response Time: 75ms"
                    .into(),
            }]
        );
    }

    #[tokio::test]
    async fn requests_carry_path_and_user_agent() {
        let http = ScriptedStep::new([ok(10), ok(10), ok(10)]);
        let log = RecordingLog::default();
        let checker = EndpointChecker::with_log(&config(), &http, &log).unwrap();

        checker.run().await.unwrap();

        let requests = http.requests();
        let paths: Vec<&str> = requests.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, ["/health", "/api/network/status", "/api/metrics"]);
        for req in &requests {
            assert_eq!(req.method.as_str(), "GET");
            assert_eq!(req.scheme, "https");
            assert_eq!(req.host, "example.com");
            assert_eq!(req.port, 443);
            assert_eq!(
                req.headers,
                [("User-Agent".to_string(), "CloudWatch-Synthetics".to_string())]
            );
        }
    }

    #[tokio::test]
    async fn slow_response_warns_but_passes() {
        let http = ScriptedStep::new([ok(50), ok(2500), ok(30)]);
        let log = RecordingLog::default();
        let checker = EndpointChecker::with_log(&config(), &http, &log).unwrap();

        let outcome = checker.run().await.unwrap();

        assert!(outcome.is_success());
        assert_eq!(http.called_steps().len(), 3);
        assert_eq!(
            log.at(Level::Warn),
            [Line {
                level: Level::Warn,
                endpoint: "Network Status API".into(),
                status: 200,
                elapsed_ms: 2500,
                message: "High response time: 2500ms for Network Status API".into(),
            }]
        );
        assert_eq!(log.count(Level::Info), 3);
        assert_eq!(
            outcome.results[1],
            CheckResult {
                name: "Network Status API".into(),
                observed_status: 200,
                response_time_ms: 2500,
                passed: true,
            }
        );
    }

    #[tokio::test]
    async fn warning_precedes_info_for_the_same_endpoint() {
        let http = ScriptedStep::new([ok(3000), ok(10), ok(10)]);
        let log = RecordingLog::default();
        let checker = EndpointChecker::with_log(&config(), &http, &log).unwrap();

        checker.run().await.unwrap();

        let lines = log.lines();
        assert_eq!(lines[0].level, Level::Warn);
        assert_eq!(lines[1].level, Level::Info);
        assert_eq!(lines[0].endpoint, lines[1].endpoint);
        assert_eq!(lines[0].elapsed_ms, 3000);
        assert_eq!(lines[1].elapsed_ms, 3000);
    }

    #[tokio::test]
    async fn threshold_is_exclusive() {
        let http = ScriptedStep::new([ok(2000), ok(2001), ok(10)]);
        let log = RecordingLog::default();
        let checker = EndpointChecker::with_log(&config(), &http, &log).unwrap();

        checker.run().await.unwrap();

        let warned: Vec<String> = log
            .at(Level::Warn)
            .into_iter()
            .map(|l| l.endpoint)
            .collect();
        assert_eq!(warned, ["Network Status API"]);
    }

    #[tokio::test]
    async fn threshold_is_configurable() {
        let mut config = config();
        config.slow_response_threshold_ms = 100;
        let http = ScriptedStep::new([ok(150), ok(50), ok(50)]);
        let log = RecordingLog::default();
        let checker = EndpointChecker::with_log(&config, &http, &log).unwrap();

        checker.run().await.unwrap();

        assert_eq!(log.count(Level::Warn), 1);
    }

    #[tokio::test]
    async fn status_mismatch_stops_the_run() {
        let http = ScriptedStep::new([ok(50), status(503, 10)]);
        let log = RecordingLog::default();
        let checker = EndpointChecker::with_log(&config(), &http, &log).unwrap();

        let err = checker.run().await.unwrap_err();

        match &err {
            CheckError::StatusMismatch {
                endpoint,
                expected,
                observed,
                ..
            } => {
                assert_eq!(endpoint, "Network Status API");
                assert_eq!(*expected, 200);
                assert_eq!(*observed, 503);
            }
            other => panic!("expected StatusMismatch, got: {other}"),
        }
        assert_eq!(
            err.to_string(),
            "Network Status API: expected status 200, got 503"
        );
        assert_eq!(http.called_steps(), ["Health Check", "Network Status API"]);
        assert_eq!(log.count(Level::Info), 1);
    }

    #[tokio::test]
    async fn mismatch_on_first_endpoint_checks_nothing_else() {
        let http = ScriptedStep::new([status(500, 5)]);
        let log = RecordingLog::default();
        let checker = EndpointChecker::with_log(&config(), &http, &log).unwrap();

        let err = checker.run().await.unwrap_err();

        assert_eq!(err.endpoint(), Some("Health Check"));
        assert_eq!(http.called_steps().len(), 1);
        assert!(log.lines().is_empty());
    }

    #[tokio::test]
    async fn slow_mismatch_does_not_warn() {
        let http = ScriptedStep::new([status(404, 5000)]);
        let log = RecordingLog::default();
        let checker = EndpointChecker::with_log(&config(), &http, &log).unwrap();

        assert!(checker.run().await.is_err());
        assert_eq!(log.count(Level::Warn), 0);
    }

    #[tokio::test]
    async fn non_200_expectation_is_honoured() {
        let mut config = config();
        config.endpoints = vec![EndpointDescriptor::new(
            "Legacy Redirect",
            "https://${domain_name}/old",
            301,
        )];
        let http = ScriptedStep::new([status(301, 5)]);
        let log = RecordingLog::default();
        let checker = EndpointChecker::with_log(&config, &http, &log).unwrap();

        let outcome = checker.run().await.unwrap();
        assert_eq!(outcome.results[0].observed_status, 301);
    }

    #[tokio::test]
    async fn network_failure_stops_the_run() {
        let http = ScriptedStep::new([Scripted::NetworkFailure]);
        let log = RecordingLog::default();
        let checker = EndpointChecker::with_log(&config(), &http, &log).unwrap();

        let err = checker.run().await.unwrap_err();

        match &err {
            CheckError::Network { endpoint, .. } => assert_eq!(endpoint, "Health Check"),
            other => panic!("expected Network, got: {other}"),
        }
        assert_eq!(http.called_steps(), ["Health Check"]);
        assert!(log.lines().is_empty());
    }

    #[tokio::test]
    async fn repeated_runs_are_independent() {
        let http = ScriptedStep::new([ok(10), ok(2500), ok(10), ok(10), ok(2500), ok(10)]);
        let log = RecordingLog::default();
        let checker = EndpointChecker::with_log(&config(), &http, &log).unwrap();

        let first = checker.run().await.unwrap();
        let after_first = log.lines();
        let second = checker.run().await.unwrap();
        let all = log.lines();

        assert_eq!(first, second);
        assert_eq!(http.called_steps().len(), 6);
        assert_eq!(all.len(), after_first.len() * 2);
        assert_eq!(&all[after_first.len()..], after_first.as_slice());
    }
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

mod report {
    use super::*;

    #[tokio::test]
    async fn success_report_lists_results() {
        let http = ScriptedStep::new([ok(50), ok(2500), ok(30)]);
        let log = RecordingLog::default();
        let checker = EndpointChecker::with_log(&config(), &http, &log).unwrap();

        let report = RunReport::from(checker.run().await);

        assert!(report.is_success());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["results"][1]["name"], "Network Status API");
        assert_eq!(json["results"][1]["responseTimeMs"], 2500);
    }

    #[tokio::test]
    async fn failure_report_names_the_endpoint() {
        let http = ScriptedStep::new([ok(50), status(503, 10)]);
        let log = RecordingLog::default();
        let checker = EndpointChecker::with_log(&config(), &http, &log).unwrap();

        let report = RunReport::from(checker.run().await);

        assert!(!report.is_success());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "failure");
        assert_eq!(json["endpoint"], "Network Status API");
        assert_eq!(json["failedCheck"]["observedStatus"], 503);
        assert_eq!(json["failedCheck"]["passed"], false);
    }

    #[tokio::test]
    async fn network_failure_report_has_no_failed_check() {
        let http = ScriptedStep::new([Scripted::NetworkFailure]);
        let log = RecordingLog::default();
        let checker = EndpointChecker::with_log(&config(), &http, &log).unwrap();

        let json = serde_json::to_value(RunReport::from(checker.run().await)).unwrap();

        assert_eq!(json["endpoint"], "Health Check");
        assert!(json.get("failedCheck").is_none());
    }
}
