pub mod client;
pub mod redact;
pub mod step;

pub use client::{ApiError, HttpClient};
pub use redact::{REDACTED, Redactor};
pub use step::{HttpStep, StepRequest, StepResponse};
