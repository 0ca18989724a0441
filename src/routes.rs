// Route path constants - single source of truth for all served paths

pub const KV: &str = "/kv";
pub const R2: &str = "/r2";
pub const D1: &str = "/d1";
