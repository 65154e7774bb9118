pub mod result_cache;
pub mod types;

// Re-export cache types
pub use result_cache::ResultCache;
pub use types::{CacheEntry, CacheStats};
