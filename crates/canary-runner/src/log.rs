use tracing::{info, warn};

/// One per-endpoint log line and the fields that travel with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepLog<'a> {
    pub endpoint: &'a str,
    pub status: u16,
    pub elapsed_ms: u64,
    pub message: &'a str,
}

/// Destination for the canary's per-endpoint log lines.
///
/// A run emits one `info` line per passing endpoint and one `warn` line per
/// slow response, nothing else. Formatting and shipping belong to the sink.
pub trait LogSink: Send + Sync {
    fn info(&self, line: &StepLog<'_>);
    fn warn(&self, line: &StepLog<'_>);
}

/// Forwards to `tracing`, with the endpoint, status and elapsed time as
/// structured fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLog;

impl LogSink for TracingLog {
    fn info(&self, line: &StepLog<'_>) {
        info!(
            endpoint = line.endpoint,
            status = line.status,
            elapsed_ms = line.elapsed_ms,
            "{}",
            line.message
        );
    }

    fn warn(&self, line: &StepLog<'_>) {
        warn!(
            endpoint = line.endpoint,
            status = line.status,
            elapsed_ms = line.elapsed_ms,
            "{}",
            line.message
        );
    }
}
