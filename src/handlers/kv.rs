use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::State;

pub const KV_KEY: &str = "hello";
pub const KV_VALUE: &str = "world";

/// ANY /kv handler - Write the demo pair, then read it back
///
/// The put is awaited before the get is issued. Store failures are not
/// handled here; they propagate to the `ApiError` boundary.
pub async fn kv_handler(State(state): State<AppState>) -> Result<String, ApiError> {
    state.kv.put(KV_KEY, KV_VALUE).await?;
    let value = state.kv.get(KV_KEY).await?;

    tracing::info!("KV round trip on key '{}' returned: {:?}", KV_KEY, value);
    Ok(format!("KV says: {}", value.as_deref().unwrap_or("null")))
}
