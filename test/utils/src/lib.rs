use std::env;
use std::path::PathBuf;

use uuid::Uuid;

/// Returns a unique throwaway directory for cache tests. Callers are
/// responsible for removing it when the test is done.
pub fn temp_cache_dir() -> PathBuf {
    return env::temp_dir()
        .join("matcha-tests")
        .join(Uuid::new_v4().to_string());
}
