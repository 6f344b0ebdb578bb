use url::Url;

/// Pull the lowercased host out of a website value, tolerating bare
/// domains without a scheme. A leading `www.` label is dropped so the
/// crawl's `www.roxul.com` and a target list's `roxul.com` agree.
pub fn extract_host(website: &str) -> Option<String> {
    let trimmed = website.trim();
    if trimmed.is_empty() {
        return None;
    }

    let lowered = trimmed.to_ascii_lowercase();
    let parsed = if lowered.starts_with("http://") || lowered.starts_with("https://") {
        Url::parse(trimmed).ok()?
    } else {
        Url::parse(&format!("https://{}", trimmed)).ok()?
    };

    let host = parsed.host_str()?.to_ascii_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host);
    if host.is_empty() {
        None
    } else {
        Some(host.to_string())
    }
}

/// Registrable-domain approximation: the last two labels of a host with
/// three or more labels, `None` otherwise. Wrong for multi-label public
/// suffixes like `.co.uk`; swap in a public-suffix lookup here if those
/// ever show up in source data.
pub fn base_domain(host: &str) -> Option<String> {
    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() > 2 {
        Some(labels[labels.len() - 2..].join("."))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_from_full_url() {
        assert_eq!(
            extract_host("https://www.roxul.com/products/insulation"),
            Some("roxul.com".to_string())
        );
        assert_eq!(
            extract_host("http://epd.armstrong.com/docs/123.pdf"),
            Some("epd.armstrong.com".to_string())
        );
    }

    #[test]
    fn test_host_from_bare_domain() {
        assert_eq!(extract_host("roxul.com"), Some("roxul.com".to_string()));
        assert_eq!(
            extract_host("www.vulcanmaterials.com"),
            Some("vulcanmaterials.com".to_string())
        );
    }

    #[test]
    fn test_host_is_lowercased() {
        assert_eq!(
            extract_host("HTTPS://WWW.Example.COM/Path"),
            Some("example.com".to_string())
        );
    }

    #[test]
    fn test_unparsable_values_yield_none() {
        assert_eq!(extract_host(""), None);
        assert_eq!(extract_host("   "), None);
        assert_eq!(extract_host("not a url"), None);
    }

    #[test]
    fn test_base_domain_strips_subdomains() {
        assert_eq!(
            base_domain("epd.armstrong.com"),
            Some("armstrong.com".to_string())
        );
        assert_eq!(
            base_domain("docs.green.example.com"),
            Some("example.com".to_string())
        );
    }

    #[test]
    fn test_base_domain_none_for_two_labels() {
        assert_eq!(base_domain("roxul.com"), None);
    }
}
