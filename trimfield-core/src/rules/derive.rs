//! Helpers that derive list patterns from a browser tab URL.

use log::debug;
use url::Url;

/// Builds a `*://<host>/*` pattern covering every page on the URL's host.
///
/// Falls back to a plain string split when the URL cannot be parsed or has
/// no host component.
pub fn domain_pattern(tab_url: &str) -> String {
    let host = match Url::parse(tab_url) {
        Ok(parsed) => match parsed.host_str() {
            Some(host) => host.to_string(),
            None => fallback_host(tab_url),
        },
        Err(e) => {
            debug!("Could not parse tab URL '{}' ({}); splitting by hand.", tab_url, e);
            fallback_host(tab_url)
        }
    };
    format!("*://{}/*", host)
}

/// Strips an `http://`/`https://` prefix and cuts at the first `/`, `?` or `#`.
pub fn fallback_host(tab_url: &str) -> String {
    let trimmed = tab_url.trim();
    let rest = ["https://", "http://"]
        .iter()
        .find_map(|scheme| {
            trimmed
                .get(..scheme.len())
                .filter(|prefix| prefix.eq_ignore_ascii_case(scheme))
                .map(|_| &trimmed[scheme.len()..])
        })
        .unwrap_or(trimmed);
    rest.split(['/', '?', '#']).next().unwrap_or_default().to_string()
}
