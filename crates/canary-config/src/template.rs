/// Placeholder substituted with the target domain at deploy time.
pub const DOMAIN_PLACEHOLDER: &str = "${domain_name}";

/// Substitute `domain` for every [`DOMAIN_PLACEHOLDER`] in `template`.
pub fn render_domain(template: &str, domain: &str) -> String {
    template.replace(DOMAIN_PLACEHOLDER, domain)
}
