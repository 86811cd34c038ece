use url::Url;

use crate::error::InvalidInput;

/// Trim surrounding whitespace; this is the form stored with a measurement.
pub fn normalize_url(input: &str) -> &str {
    input.trim()
}

/// True iff `input` is an absolute URL with a scheme and a non-empty host.
///
/// Never fails and never touches the network: anything that does not parse
/// is simply invalid.
pub fn is_valid_url(input: &str) -> bool {
    match Url::parse(normalize_url(input)) {
        Ok(url) => !url.scheme().is_empty() && url.host_str().is_some_and(|h| !h.is_empty()),
        Err(_) => false,
    }
}

/// Like [`is_valid_url`], but returns the normalized URL or a typed error.
pub fn validate_url(input: &str) -> Result<String, InvalidInput> {
    if is_valid_url(input) {
        Ok(normalize_url(input).to_string())
    } else {
        Err(InvalidInput::Url(input.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_absolute_urls() {
        assert!(is_valid_url("https://example.com"));
        assert!(is_valid_url("http://example.com/path?q=1"));
        assert!(is_valid_url("https://127.0.0.1:8080/"));
        assert!(is_valid_url("  https://example.com  "));
    }

    #[test]
    fn rejects_inputs_without_scheme_or_host() {
        assert!(!is_valid_url(""));
        assert!(!is_valid_url("not-a-url"));
        assert!(!is_valid_url("/relative/path"));
        assert!(!is_valid_url("example.com"));
        assert!(!is_valid_url("mailto:someone@example.com"));
        assert!(!is_valid_url("file:///etc/passwd"));
        assert!(!is_valid_url("http://"));
    }

    #[test]
    fn garbage_is_invalid_not_a_panic() {
        for input in ["\u{0}", "::::", "http://[::1", "https://exa mple.com", "%%%"] {
            assert!(!is_valid_url(input), "{input:?} should be invalid");
        }
    }

    #[test]
    fn validate_url_returns_trimmed_input() {
        assert_eq!(
            validate_url(" https://example.com/a ").unwrap(),
            "https://example.com/a"
        );
        assert_eq!(
            validate_url("nope"),
            Err(InvalidInput::Url("nope".to_string()))
        );
    }
}
