#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("no endpoints configured")]
    EmptyEndpoints,
    #[error("domain name is empty")]
    EmptyDomain,
    #[error("endpoint {name}: URL {url} still contains the domain placeholder")]
    UnresolvedPlaceholder { name: String, url: String },
    #[error("endpoint {name}: invalid URL {url}: {source}")]
    InvalidUrl {
        name: String,
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("endpoint {name}: URL {url} must use https")]
    NotHttps { name: String, url: String },
    #[error("endpoint {name}: URL {url} has no host")]
    MissingHost { name: String, url: String },
    #[error("endpoint {name}: URL {url} is not on {domain}:{port}")]
    ForeignOrigin {
        name: String,
        url: String,
        domain: String,
        port: u16,
    },
    #[error("duplicate endpoint name: {name}")]
    DuplicateName { name: String },
    #[error("endpoint {name}: expected status {status} is not a valid HTTP status code")]
    InvalidStatus { name: String, status: u16 },
    #[error("slow response threshold must be greater than zero")]
    InvalidThreshold,
    #[error("user agent {0:?} is not a valid header value")]
    InvalidUserAgent(String),
}
