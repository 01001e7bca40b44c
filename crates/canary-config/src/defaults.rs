use crate::config::EndpointDescriptor;

pub const DEFAULT_PORT: u16 = 443;
pub const DEFAULT_SLOW_RESPONSE_THRESHOLD_MS: u64 = 2000;
pub const DEFAULT_USER_AGENT: &str = "CloudWatch-Synthetics";

/// The endpoints checked when no config file supplies its own list.
///
/// URLs carry the `${domain_name}` placeholder and are resolved against
/// the configured domain before a run.
pub fn default_endpoints() -> Vec<EndpointDescriptor> {
    vec![
        EndpointDescriptor::new("Health Check", "https://${domain_name}/health", 200),
        EndpointDescriptor::new(
            "Network Status API",
            "https://${domain_name}/api/network/status",
            200,
        ),
        EndpointDescriptor::new("Metrics API", "https://${domain_name}/api/metrics", 200),
    ]
}

pub(crate) fn default_port() -> u16 {
    DEFAULT_PORT
}

pub(crate) fn default_slow_response_threshold_ms() -> u64 {
    DEFAULT_SLOW_RESPONSE_THRESHOLD_MS
}

pub(crate) fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}
