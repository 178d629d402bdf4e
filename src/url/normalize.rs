use crate::UrlError;
use url::Url;

/// Canonicalizes a URL string for visited-set membership
///
/// # Canonicalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Accept only `http` and `https`
/// 3. Require a host
/// 4. Keep scheme, host (with an explicit port, if any) and path
/// 5. Drop query string and fragment
/// 6. Trim trailing slashes, so `/docs/` and `/docs` are the same page
///
/// # Examples
///
/// ```
/// use docsift::url::canonicalize_url;
///
/// let url = canonicalize_url("https://example.com/docs/?page=2#intro").unwrap();
/// assert_eq!(url, "https://example.com/docs");
/// ```
pub fn canonicalize_url(url_str: &str) -> Result<String, UrlError> {
    let url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;
    canonicalize(&url)
}

/// Canonicalizes an already-parsed URL
pub fn canonicalize(url: &Url) -> Result<String, UrlError> {
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    let host = url.host_str().ok_or(UrlError::MissingDomain)?;

    let mut canonical = match url.port() {
        Some(port) => format!("{}://{}:{}{}", url.scheme(), host, port, url.path()),
        None => format!("{}://{}{}", url.scheme(), host, url.path()),
    };

    while canonical.ends_with('/') {
        canonical.pop();
    }

    Ok(canonical)
}

/// Turns user input into a crawlable seed URL
///
/// Surrounding whitespace is removed and `https://` is prepended when the
/// input carries no `http://` or `https://` scheme.
///
/// ```
/// use docsift::url::prepare_seed_url;
///
/// let url = prepare_seed_url("docs.example.com/start").unwrap();
/// assert_eq!(url.as_str(), "https://docs.example.com/start");
/// ```
pub fn prepare_seed_url(input: &str) -> Result<Url, UrlError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(UrlError::Parse("empty URL".to_string()));
    }

    let with_scheme = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    let url = Url::parse(&with_scheme).map_err(|e| UrlError::Parse(e.to_string()))?;
    if url.host_str().is_none() {
        return Err(UrlError::MissingDomain);
    }

    Ok(url)
}
