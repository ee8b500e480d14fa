//! Greeting page handler.
//!
//! Renders a static HTML greeting that includes the container's hostname.
//! Hostname resolution can fail (no name configured, non-UTF-8 name); the
//! failure is recovered here by substituting a placeholder, so the client
//! always receives a 200 response.

use axum::response::Html;
use tracing::instrument;

use crate::config::HOSTNAME_PLACEHOLDER;
use crate::host::{resolve_hostname, HostnameError};

/// Greeting page handler.
///
/// Always returns 200 with an HTML body; a hostname resolution failure only
/// changes the rendered name to the placeholder.
#[instrument(name = "home::index")]
pub async fn index() -> Html<String> {
    let resolved = resolve_hostname();
    if let Err(ref e) = resolved {
        tracing::debug!(error = %e, "Hostname resolution failed, using placeholder");
    }
    Html(render_greeting(resolved))
}

/// Render the greeting body, matching the resolution result explicitly.
fn render_greeting(hostname: Result<String, HostnameError>) -> String {
    let name = match hostname {
        Ok(name) => name,
        Err(_) => HOSTNAME_PLACEHOLDER.to_string(),
    };
    format!("<h1>Hello from Java multi-stage build! 🚀</h1><p>Container hostname: {name}</p>")
}
