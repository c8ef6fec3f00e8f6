use crate::error::{AppError, AppResult};
use url::{Host, Url};

/// Normalize and validate a user-supplied URL.
///
/// Trims whitespace, prefixes `https://` when no protocol is present, and
/// validates the result as an absolute http(s) URL with a dotted domain or
/// an IP host. The returned string is
/// exactly what gets stored and matched on for dedup: no canonicalization
/// beyond protocol prefixing, so `https://example.com` and
/// `https://example.com/` remain distinct URLs.
pub fn normalize_url(raw: &str) -> AppResult<String> {
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        return Err(AppError::InvalidUrl(
            "Please provide a URL to shorten".to_string(),
        ));
    }

    let candidate = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    let parsed = Url::parse(&candidate).map_err(|_| {
        AppError::InvalidUrl("Please enter a valid URL (e.g., https://example.com)".to_string())
    })?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(AppError::InvalidUrl(
            "URL must use the http or https protocol".to_string(),
        ));
    }

    // Domain hosts need a TLD; bare names like "localhost" are rejected.
    // IP hosts pass as-is.
    match parsed.host() {
        Some(Host::Domain(domain)) if domain.contains('.') => {}
        Some(Host::Ipv4(_)) | Some(Host::Ipv6(_)) => {}
        _ => {
            return Err(AppError::InvalidUrl(
                "Please enter a valid URL (e.g., https://example.com)".to_string(),
            ));
        }
    }

    Ok(candidate)
}
