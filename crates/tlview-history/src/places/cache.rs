use std::collections::HashMap;

use tokio::sync::RwLock;

use super::{PlaceDetails, PlaceLookup};

/// Memoizes successful lookups by place id.
///
/// Misses and failures are not cached, so a later request retries them.
pub struct PlaceDetailsCache {
    lookup: Box<dyn PlaceLookup>,
    entries: RwLock<HashMap<String, PlaceDetails>>,
}

impl PlaceDetailsCache {
    #[must_use]
    pub fn new(lookup: Box<dyn PlaceLookup>) -> Self {
        Self {
            lookup,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Cached or freshly fetched details; `None` when unknown or on failure.
    pub async fn get(&self, place_id: &str) -> Option<PlaceDetails> {
        if place_id.trim().is_empty() {
            return None;
        }
        if let Some(hit) = self.entries.read().await.get(place_id) {
            return Some(hit.clone());
        }

        match self.lookup.lookup(place_id).await {
            Ok(Some(details)) => {
                self.entries
                    .write()
                    .await
                    .insert(place_id.to_owned(), details.clone());
                Some(details)
            }
            Ok(None) => {
                tracing::debug!(place_id, "place not found");
                None
            }
            Err(err) => {
                tracing::warn!(place_id, error = %err, "failed to fetch place details");
                None
            }
        }
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::places::PlacesError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    struct CountingLookup {
        calls: Arc<AtomicU32>,
        fail: bool,
    }

    #[async_trait]
    impl PlaceLookup for CountingLookup {
        async fn lookup(&self, place_id: &str) -> Result<Option<PlaceDetails>, PlacesError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(PlacesError::Status {
                    status: "OVER_QUERY_LIMIT".to_string(),
                    place_id: place_id.to_string(),
                    message: String::new(),
                });
            }
            if place_id == "unknown" {
                return Ok(None);
            }
            Ok(Some(PlaceDetails {
                place_id: place_id.to_string(),
                name: Some("Cafe".to_string()),
                formatted_address: None,
                formatted_phone_number: None,
                rating: Some(4.5),
                website: None,
                types: vec!["cafe".to_string()],
                opening_hours: Vec::new(),
                photo_references: Vec::new(),
            }))
        }
    }

    fn cache(fail: bool) -> (PlaceDetailsCache, Arc<AtomicU32>) {
        let calls = Arc::new(AtomicU32::new(0));
        let lookup = CountingLookup {
            calls: Arc::clone(&calls),
            fail,
        };
        (PlaceDetailsCache::new(Box::new(lookup)), calls)
    }

    #[tokio::test]
    async fn caches_successful_lookups() {
        let (cache, calls) = cache(false);
        let first = cache.get("p1").await.expect("details");
        let second = cache.get("p1").await.expect("details");
        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn misses_are_not_cached() {
        let (cache, calls) = cache(false);
        assert!(cache.get("unknown").await.is_none());
        assert!(cache.get("unknown").await.is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn failures_resolve_to_none_and_are_retried() {
        let (cache, calls) = cache(true);
        assert!(cache.get("p1").await.is_none());
        assert!(cache.get("p1").await.is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn blank_place_id_short_circuits() {
        let (cache, calls) = cache(false);
        assert!(cache.get("").await.is_none());
        assert!(cache.get("  ").await.is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
