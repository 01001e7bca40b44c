pub mod checker;
pub mod handler;
pub mod log;
pub mod outcome;
pub mod settings;
pub mod telemetry;

pub use checker::EndpointChecker;
pub use log::{LogSink, StepLog, TracingLog};
pub use outcome::{CheckError, CheckResult, RunOutcome, RunReport};
