use url::Url;

/// Extracts the domain (host plus explicit port) from a URL
///
/// The port is part of the domain so that two servers on the same host but
/// different ports are treated as different sites.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use docsift::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
///
/// let url = Url::parse("http://127.0.0.1:8080/").unwrap();
/// assert_eq!(extract_domain(&url), Some("127.0.0.1:8080".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_lowercase();
    match url.port() {
        Some(port) => Some(format!("{}:{}", host, port)),
        None => Some(host),
    }
}

/// Returns true if `url` belongs to `base_domain`
///
/// URLs without a host are treated as relative and therefore internal.
pub fn is_internal_link(url: &Url, base_domain: &str) -> bool {
    match extract_domain(url) {
        Some(domain) => domain == base_domain,
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_simple_domain() {
        let url = Url::parse("https://example.com/").unwrap();
        assert_eq!(extract_domain(&url), Some("example.com".to_string()));
    }

    #[test]
    fn test_extract_subdomain() {
        let url = Url::parse("https://docs.example.com/post").unwrap();
        assert_eq!(extract_domain(&url), Some("docs.example.com".to_string()));
    }

    #[test]
    fn test_extract_with_port() {
        let url = Url::parse("https://example.com:8080/").unwrap();
        assert_eq!(extract_domain(&url), Some("example.com:8080".to_string()));
    }

    #[test]
    fn test_extract_mixed_case() {
        let url = Url::parse("https://Example.COM/").unwrap();
        assert_eq!(extract_domain(&url), Some("example.com".to_string()));
    }

    #[test]
    fn test_internal_link_same_domain() {
        let url = Url::parse("https://example.com/docs/a").unwrap();
        assert!(is_internal_link(&url, "example.com"));
    }

    #[test]
    fn test_external_link_other_domain() {
        let url = Url::parse("https://other.com/docs").unwrap();
        assert!(!is_internal_link(&url, "example.com"));
    }

    #[test]
    fn test_subdomain_is_external() {
        let url = Url::parse("https://blog.example.com/").unwrap();
        assert!(!is_internal_link(&url, "example.com"));
    }

    #[test]
    fn test_different_port_is_external() {
        let url = Url::parse("http://127.0.0.1:9000/").unwrap();
        assert!(!is_internal_link(&url, "127.0.0.1:8000"));
    }
}
