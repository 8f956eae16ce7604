//! URL helpers for validation and icon lookup

use url::Url;

/// Icon used when a URL cannot be parsed
pub const DEFAULT_FAVICON: &str = "/default-favicon.png";

/// Check that the string parses as an absolute URL
pub fn is_valid_url(input: &str) -> bool {
    Url::parse(input).is_ok()
}

/// Conventional favicon location for a site: `scheme://host/favicon.ico`
pub fn favicon_url(input: &str) -> String {
    match Url::parse(input) {
        Ok(url) => match url.host_str() {
            Some(host) => format!("{}://{}/favicon.ico", url.scheme(), host),
            None => DEFAULT_FAVICON.to_string(),
        },
        Err(_) => DEFAULT_FAVICON.to_string(),
    }
}

/// Host name of the URL, or an empty string
pub fn domain(input: &str) -> String {
    Url::parse(input)
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_url() {
        assert!(is_valid_url("https://example.com"));
        assert!(is_valid_url("http://localhost:8080/path?q=1"));
        assert!(!is_valid_url("example.com"));
        assert!(!is_valid_url(""));
    }

    #[test]
    fn test_favicon_url() {
        assert_eq!(
            favicon_url("https://docs.rs/serde/latest"),
            "https://docs.rs/favicon.ico"
        );
        assert_eq!(favicon_url("not a url"), DEFAULT_FAVICON);
        // No host component
        assert_eq!(favicon_url("mailto:someone@example.com"), DEFAULT_FAVICON);
    }

    #[test]
    fn test_domain() {
        assert_eq!(domain("https://www.rust-lang.org/learn"), "www.rust-lang.org");
        assert_eq!(domain("garbage"), "");
    }
}
