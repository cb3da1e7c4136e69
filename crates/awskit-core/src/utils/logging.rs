/// Redaction helpers for values that must not reach the logs verbatim
use regex::Regex;
use std::sync::LazyLock;

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap());

/// Redacts email addresses from text, preserving domain for debugging
///
/// # Examples
/// ```
/// use awskit_core::utils::logging::redact_email;
///
/// assert_eq!(redact_email("user@example.com"), "***@example.com");
/// assert_eq!(redact_email("Sent to: test@acme.com"), "Sent to: ***@acme.com");
/// ```
pub fn redact_email(text: &str) -> String {
    EMAIL_PATTERN
        .replace_all(text, |caps: &regex::Captures| {
            let email = &caps[0];
            match email.find('@') {
                Some(at_pos) => format!("***{}", &email[at_pos..]),
                None => "***@***".to_string(),
            }
        })
        .to_string()
}

/// Masks a credential, keeping the scheme and the last four characters
///
/// # Examples
/// ```
/// use awskit_core::utils::logging::redact_token;
///
/// assert_eq!(redact_token("Bearer eyJhbGciOiJSUzI1NiJ9.abcd"), "Bearer ***abcd");
/// assert_eq!(redact_token("abc"), "***");
/// ```
pub fn redact_token(value: &str) -> String {
    const VISIBLE_SUFFIX: usize = 4;
    const MIN_LENGTH_TO_SHOW_SUFFIX: usize = 12;

    let (scheme, secret) = match value.split_once(' ') {
        Some((scheme, secret)) => (Some(scheme), secret),
        None => (None, value),
    };

    let masked = if secret.len() < MIN_LENGTH_TO_SHOW_SUFFIX || !secret.is_ascii() {
        "***".to_string()
    } else {
        format!("***{}", &secret[secret.len() - VISIBLE_SUFFIX..])
    };

    match scheme {
        Some(scheme) => format!("{} {}", scheme, masked),
        None => masked,
    }
}

/// Joins a recipient list for logging with every address redacted
pub fn redact_recipients(addresses: &[String]) -> String {
    addresses
        .iter()
        .map(|a| redact_email(a))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_email() {
        assert_eq!(redact_email("user@example.com"), "***@example.com");
        assert_eq!(
            redact_email("From: alice@foo.com To: bob@bar.com"),
            "From: ***@foo.com To: ***@bar.com"
        );
        assert_eq!(redact_email("no address here"), "no address here");
    }

    #[test]
    fn test_redact_token() {
        assert_eq!(redact_token("Bearer 0123456789abcdef"), "Bearer ***cdef");
        assert_eq!(redact_token("Bearer short"), "Bearer ***");
        assert_eq!(redact_token(""), "***");
        assert_eq!(redact_token("0123456789abcdef"), "***cdef");
    }

    #[test]
    fn test_redact_recipients() {
        let to = vec!["a@x.com".to_string(), "b@y.org".to_string()];
        assert_eq!(redact_recipients(&to), "***@x.com, ***@y.org");
        assert_eq!(redact_recipients(&[]), "");
    }
}
