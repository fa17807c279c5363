//! Target URL validation and normalization.
//!
//! Produces the canonical string form stored in `links.target_url`.

use url::Url;

/// Errors that can occur during URL normalization.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum UrlNormalizationError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL has no host")]
    MissingHost,
}

/// Normalizes a user-supplied target URL to its canonical form.
///
/// # Rules
///
/// 1. The input is parsed as an absolute URL.
/// 2. If it does not parse, it is parsed again with `https://` prepended, so
///    scheme-less input such as `example.com/a` is accepted. The same retry
///    applies to `host:port` input such as `localhost:3000`, which otherwise
///    parses with the host as its scheme.
/// 3. The scheme must be `http` or `https` and a host must be present.
/// 4. The serialization of the parsed URL is the canonical form: the host is
///    lowercased, default ports are dropped and an empty path becomes `/`.
///    Query and fragment are kept as given.
///
/// Any other input that parses with a non-HTTP scheme (`ftp:`, `javascript:`,
/// `mailto:`) is rejected.
///
/// # Errors
///
/// Returns [`UrlNormalizationError::InvalidFormat`] if neither parse succeeds,
/// [`UrlNormalizationError::UnsupportedProtocol`] for non-HTTP(S) schemes and
/// [`UrlNormalizationError::MissingHost`] for host-less URLs.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(normalize_target("example.com/a").unwrap(), "https://example.com/a");
/// assert_eq!(normalize_target("HTTP://Example.COM:80/x").unwrap(), "http://example.com/x");
/// assert!(normalize_target("ftp://x").is_err());
/// ```
pub fn normalize_target(input: &str) -> Result<String, UrlNormalizationError> {
    let input = input.trim();

    let url = match Url::parse(input) {
        Ok(url) if is_http(&url) => url,
        Ok(url) if is_host_with_port(input, url.scheme()) => {
            Url::parse(&format!("https://{input}"))
                .map_err(|_| UrlNormalizationError::UnsupportedProtocol)?
        }
        Ok(_) => return Err(UrlNormalizationError::UnsupportedProtocol),
        Err(first) => Url::parse(&format!("https://{input}"))
            .map_err(|_| UrlNormalizationError::InvalidFormat(first.to_string()))?,
    };

    if !is_http(&url) {
        return Err(UrlNormalizationError::UnsupportedProtocol);
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => {}
        _ => return Err(UrlNormalizationError::MissingHost),
    }

    Ok(url.to_string())
}

fn is_http(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}

/// True for `host:port[/...]` input that the URL parser read as `scheme:path`.
///
/// `example.com:8080/a` parses with scheme `example.com`; `mailto:a@b` and
/// `javascript:...` do not match because no port digits follow the colon.
fn is_host_with_port(input: &str, scheme: &str) -> bool {
    if input.contains("://") {
        return false;
    }

    let Some((head, rest)) = input.split_once(':') else {
        return false;
    };
    if !head.eq_ignore_ascii_case(scheme) {
        return false;
    }

    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    digits > 0 && matches!(rest.as_bytes().get(digits), None | Some(b'/' | b'?' | b'#'))
}
