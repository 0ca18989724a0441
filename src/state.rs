use crate::store::SharedKvStore;

/// Capabilities handed to every request handler
///
/// Built once at startup; cloning only bumps the store's reference count.
#[derive(Clone)]
pub struct AppState {
    pub kv: SharedKvStore,
}
