use url::Url;

/// Host part of a website value, lower-cased and without `www.`.
///
/// Values without a scheme are read as `https` URLs.
pub fn website_domain(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    let url = if trimmed.contains("://") {
        Url::parse(trimmed)
    } else {
        Url::parse(&format!("https://{}", trimmed.trim_start_matches('/')))
    }
    .ok()?;

    let host = url.host_str()?.trim_end_matches('.').to_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host);
    if host.is_empty() {
        return None;
    }
    Some(host.to_string())
}

#[cfg(test)]
mod tests {
    use super::website_domain;

    #[test]
    fn website_domain_strips_scheme_and_path() {
        assert_eq!(
            website_domain("https://www.JPerez.es/contacto?x=1").as_deref(),
            Some("jperez.es")
        );
    }

    #[test]
    fn website_domain_accepts_bare_host() {
        assert_eq!(website_domain("jperez.es").as_deref(), Some("jperez.es"));
        assert_eq!(
            website_domain("http://jperez.es:8080").as_deref(),
            Some("jperez.es")
        );
    }

    #[test]
    fn website_domain_ignores_userinfo() {
        assert_eq!(
            website_domain("https://contacto@alfa.es/").as_deref(),
            Some("alfa.es")
        );
        assert_eq!(website_domain("//alfa.es").as_deref(), Some("alfa.es"));
    }

    #[test]
    fn website_domain_rejects_empty() {
        assert!(website_domain("  ").is_none());
        assert!(website_domain("https://").is_none());
    }
}
