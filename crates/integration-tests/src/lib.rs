//! Shared fixtures for the end-to-end suites: a post service wired to the
//! seeded in-memory store.

use std::sync::{Arc, Once};

use services::PostService;
use storage_adapters::MemoryStore;

static TRACING: Once = Once::new();

/// Installs a test subscriber honoring `RUST_LOG`. Safe to call from every
/// test; only the first call wins.
pub fn init_tracing() {
    TRACING.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .init();
    });
}

/// A service over the demo dataset (two posts, two categories, three
/// tags, two authors).
pub fn demo_service() -> PostService {
    PostService::new(Arc::new(MemoryStore::with_demo_data()))
}

/// A service over an empty store, alongside the store for direct seeding.
pub fn empty_service() -> (Arc<MemoryStore>, PostService) {
    let store = Arc::new(MemoryStore::new());
    (store.clone(), PostService::new(store))
}
