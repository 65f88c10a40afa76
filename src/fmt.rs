//! Debug formatting helpers that keep credentials out of logs.

use std::fmt;
use url::Url;

const REDACTED: &str = "***";

/// Formats an optional secret without revealing it.
///
/// `None` stays `None` so the log still shows whether the value was supplied.
pub fn secret(value: &Option<String>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match value {
        Some(_) => write!(f, "Some({REDACTED:?})"),
        None => f.write_str("None"),
    }
}

/// Formats an optional connection URL with its password component masked.
pub fn connection_url(value: &Option<String>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match value {
        Some(raw) => write!(f, "Some({:?})", redact_url(raw)),
        None => f.write_str("None"),
    }
}

/// Replace the password in a connection URL with a placeholder.
///
/// Strings that do not parse as a URL are masked entirely, since they may
/// still embed credentials in some other form.
pub fn redact_url(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(mut url) => {
            if url.password().is_some() && url.set_password(Some(REDACTED)).is_err() {
                return REDACTED.to_owned();
            }
            url.to_string()
        }
        Err(_) if raw.is_empty() => String::new(),
        Err(_) => REDACTED.to_owned(),
    }
}
