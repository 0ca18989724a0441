use crate::routes;

/// Served for every path without an active handler, `/r2` and `/d1` included
pub async fn fallback_handler() -> String {
    usage_hint()
}

pub fn usage_hint() -> String {
    format!("Try {}, {}, or {}", routes::KV, routes::R2, routes::D1)
}
