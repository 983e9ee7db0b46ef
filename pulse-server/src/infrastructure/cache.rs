use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use actix_web::web::Bytes;

/// A cached rendering of a response body.
#[derive(Debug, Clone)]
pub struct CachedPage {
    pub body: Bytes,
    pub content_type: Option<String>,
}

struct Entry {
    page: CachedPage,
    stored_at: Instant,
}

/// Whole-response cache keyed by route. Entries live for a fixed window and
/// expire lazily on lookup; `clear` is the explicit invalidation hook for
/// administration and tests.
#[derive(Clone)]
pub struct PageCache {
    entries: Arc<RwLock<HashMap<String, Entry>>>,
    ttl: Duration,
}

impl PageCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    pub fn get(&self, key: &str) -> Option<CachedPage> {
        let mut entries = self.entries.write().unwrap();
        match entries.get(key) {
            Some(entry) if entry.stored_at.elapsed() < self.ttl => Some(entry.page.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    pub fn store(&self, key: String, page: CachedPage) {
        let mut entries = self.entries.write().unwrap();
        entries.insert(
            key,
            Entry {
                page,
                stored_at: Instant::now(),
            },
        );
    }

    pub fn clear(&self) {
        self.entries.write().unwrap().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(body: &str) -> CachedPage {
        CachedPage {
            body: Bytes::copy_from_slice(body.as_bytes()),
            content_type: Some("application/json".into()),
        }
    }

    #[test]
    fn stored_pages_are_served_within_the_window() {
        let cache = PageCache::new(Duration::from_secs(20));
        cache.store("/".into(), page("first"));
        assert_eq!(cache.get("/").unwrap().body, Bytes::from_static(b"first"));
    }

    #[test]
    fn a_zero_window_never_serves_hits() {
        let cache = PageCache::new(Duration::ZERO);
        cache.store("/".into(), page("first"));
        assert!(cache.get("/").is_none());
    }

    #[test]
    fn clear_invalidates_before_expiry() {
        let cache = PageCache::new(Duration::from_secs(20));
        cache.store("/".into(), page("first"));
        cache.clear();
        assert!(cache.get("/").is_none());
    }

    #[test]
    fn keys_are_independent() {
        let cache = PageCache::new(Duration::from_secs(20));
        cache.store("/?page=1".into(), page("one"));
        assert!(cache.get("/?page=2").is_none());
    }
}
