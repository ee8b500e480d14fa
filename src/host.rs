//! Hostname resolution for the greeting page.
//!
//! Wraps the OS hostname lookup in a result type so callers choose the
//! fallback explicitly instead of handling a panic or a propagated error.

use std::ffi::OsString;

/// The operating environment could not provide a usable hostname.
///
/// Raised when the OS call fails, or when the returned name is empty or not
/// valid UTF-8.
#[derive(Debug, thiserror::Error)]
pub enum HostnameError {
    #[error("hostname lookup failed: {0}")]
    Lookup(#[from] std::io::Error),
    #[error("hostname is not valid UTF-8: {0:?}")]
    NotUtf8(OsString),
    #[error("hostname is empty")]
    Empty,
}

/// Ask the OS for the current machine's network name.
///
/// Resolved fresh on each call; nothing is cached.
pub fn resolve_hostname() -> Result<String, HostnameError> {
    let raw = hostname::get()?;
    let name = raw.into_string().map_err(HostnameError::NotUtf8)?;
    if name.is_empty() {
        return Err(HostnameError::Empty);
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolved_hostname_is_never_empty() {
        // On any host where resolution succeeds, the name must be non-empty;
        // the error paths are covered by the greeting rendering tests.
        if let Ok(name) = resolve_hostname() {
            assert!(!name.is_empty());
        }
    }
}
