use std::path::{Path, PathBuf};

use canary_config::{CanaryConfig, ConfigError};
use tracing::info;

/// Path of a YAML config file, used when `--config` is not given.
pub const CONFIG_ENV: &str = "CANARY_CONFIG";
/// Target domain, used when `--domain` is not given.
pub const DOMAIN_ENV: &str = "CANARY_DOMAIN_NAME";

/// Load the canary configuration.
///
/// The file comes from `config_path`, falling back to `CANARY_CONFIG`; with
/// neither, the built-in endpoint list is used. A domain from `domain` or
/// `CANARY_DOMAIN_NAME` overrides the one in the file. The result is not
/// validated here; [`crate::EndpointChecker`] does that at construction.
pub fn load(config_path: Option<&Path>, domain: Option<&str>) -> Result<CanaryConfig, ConfigError> {
    let path = config_path
        .map(Path::to_path_buf)
        .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));

    let mut config = match path {
        Some(path) => {
            info!(path = %path.display(), "loading canary config");
            CanaryConfig::from_path(&path)?
        }
        None => CanaryConfig::for_domain(""),
    };

    let domain = domain
        .map(str::to_string)
        .or_else(|| std::env::var(DOMAIN_ENV).ok());
    if let Some(domain) = domain {
        config = config.with_domain(domain);
    }

    Ok(config)
}
