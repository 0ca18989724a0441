pub mod kv;
pub mod fallback;

pub use kv::kv_handler;
pub use fallback::fallback_handler;
