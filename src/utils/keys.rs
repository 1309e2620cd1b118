//! Key derivation helpers
//!
//! Callers are identified by user id when authenticated, falling back to the
//! client IP taken from proxy headers. Cache keys are namespaced strings so
//! unrelated subsystems never collide.

/// Derive a rate-limit caller key from request identity material.
///
/// Prefers an authenticated user id (`user:<id>`), then the first hop of a
/// `x-forwarded-for` header, then a `x-real-ip` value (`ip:<addr>`). Returns
/// `ip:unknown` when nothing usable is present so anonymous traffic still
/// shares one bounded counter.
pub fn caller_key(
    user_id: Option<&str>,
    forwarded_for: Option<&str>,
    real_ip: Option<&str>,
) -> String {
    if let Some(id) = user_id {
        if !id.is_empty() {
            return format!("user:{id}");
        }
    }

    if let Some(xff) = forwarded_for {
        // Only the first hop is the client; the rest are proxies
        if let Some(first) = xff.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return format!("ip:{first}");
            }
        }
    }

    if let Some(ip) = real_ip {
        if !ip.is_empty() {
            return format!("ip:{ip}");
        }
    }

    "ip:unknown".to_string()
}

/// Build a colon-delimited cache key under a namespace.
///
/// `scoped("events", &["42", "tickets"])` yields `events:42:tickets`.
pub fn scoped(namespace: &str, parts: &[&str]) -> String {
    let mut key = String::from(namespace);
    for part in parts {
        key.push(':');
        key.push_str(part);
    }
    key
}
