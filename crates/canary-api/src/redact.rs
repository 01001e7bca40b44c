use url::{Url, form_urlencoded};

pub const REDACTED: &str = "REDACTED";

/// Masks restricted header values and query parameters before they are logged.
///
/// Names are matched case-insensitively for headers and exactly for query
/// parameters.
#[derive(Debug, Clone, Default)]
pub struct Redactor {
    restricted_headers: Vec<String>,
    restricted_url_parameters: Vec<String>,
}

impl Redactor {
    pub fn new(restricted_headers: &[String], restricted_url_parameters: &[String]) -> Self {
        Self {
            restricted_headers: restricted_headers.to_vec(),
            restricted_url_parameters: restricted_url_parameters.to_vec(),
        }
    }

    /// `url` with the value of every restricted query parameter replaced.
    ///
    /// Works on the raw query so that everything else is logged exactly as
    /// it was sent.
    pub fn url(&self, url: &Url) -> String {
        let Some(query) = url.query() else {
            return url.to_string();
        };
        if self.restricted_url_parameters.is_empty() {
            return url.to_string();
        }

        let redacted_query = query
            .split('&')
            .map(|pair| {
                let raw_key = pair.split_once('=').map_or(pair, |(k, _)| k);
                let restricted = form_urlencoded::parse(raw_key.as_bytes())
                    .next()
                    .is_some_and(|(key, _)| {
                        self.restricted_url_parameters.iter().any(|p| *p == key)
                    });
                if restricted {
                    format!("{raw_key}={REDACTED}")
                } else {
                    pair.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join("&");

        let mut redacted = url.clone();
        redacted.set_query(Some(&redacted_query));
        redacted.to_string()
    }

    pub fn headers(&self, headers: &[(String, String)]) -> Vec<(String, String)> {
        headers
            .iter()
            .map(|(name, value)| {
                let restricted = self
                    .restricted_headers
                    .iter()
                    .any(|h| h.eq_ignore_ascii_case(name));
                let value = if restricted { REDACTED } else { value.as_str() };
                (name.clone(), value.to_string())
            })
            .collect()
    }
}
