//! Content-validity predicate for subscription payloads.
//!
//! A reachable URL only counts as healthy if its body looks like a proxy
//! subscription. Three shapes are accepted: a base64-encoded node list,
//! a plain-text list of proxy-scheme URIs, and a Clash-style YAML config.

use base64::Engine as _;
use base64::engine::general_purpose::{STANDARD, URL_SAFE};

/// URI schemes that mark a line as a proxy node.
const NODE_SCHEMES: &[&str] = &[
    "ss://",
    "ssr://",
    "vmess://",
    "vless://",
    "trojan://",
    "hysteria2://",
    "tuic://",
];

/// Whether a fetched body is a plausible subscription payload.
pub fn is_valid_subscription(body: &str) -> bool {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return false;
    }
    if has_node_uris(trimmed) || looks_like_clash(trimmed) {
        return true;
    }
    decodes_to_node_list(trimmed)
}

/// Any non-comment line carrying a known proxy scheme.
fn has_node_uris(body: &str) -> bool {
    body.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .any(|line| NODE_SCHEMES.iter().any(|scheme| line.starts_with(scheme)))
}

/// A Clash config is a YAML mapping with a top-level `proxies:` key.
fn looks_like_clash(body: &str) -> bool {
    body.lines()
        .map(str::trim_end)
        .any(|line| line == "proxies:" || line.starts_with("proxies:"))
}

/// Base64 subscriptions are a node list encoded in one blob, often without
/// padding and sometimes url-safe. Decode and look for node URIs inside.
fn decodes_to_node_list(body: &str) -> bool {
    let compact: String = body.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.len() < 8 {
        return false;
    }
    let unpadded = compact.trim_end_matches('=');
    for engine in [&STANDARD, &URL_SAFE] {
        let mut candidate = unpadded.to_string();
        while candidate.len() % 4 != 0 {
            candidate.push('=');
        }
        if let Ok(bytes) = engine.decode(&candidate) {
            let decoded = String::from_utf8_lossy(&bytes);
            if NODE_SCHEMES.iter().any(|scheme| decoded.contains(scheme)) {
                return true;
            }
        }
    }
    false
}
