use crate::db::UrlStore;
use crate::error::{AppError, AppResult};
use crate::models::UrlRecord;
use tracing::{debug, warn};

/// Result of a short-id allocation
pub struct Allocation {
    pub record: UrlRecord,
    /// False when an existing mapping for the same URL was reused
    pub created: bool,
}

/// Map a normalized URL to a short id.
///
/// Shortening is idempotent per exact URL string: when a record with the
/// same `original_url` already exists, its id is returned unchanged.
/// Otherwise a random id is drawn (nanoid's default 64-character alphabet,
/// `A-Za-z0-9_-`) and inserted, retrying up to `max_attempts` times when the
/// id is already taken. Both the pre-insert existence check and a
/// `DuplicateShortId` insert failure count as a collision; the latter covers
/// the race where a concurrent request commits the same id between check and
/// insert.
///
/// # Errors
///
/// Returns `AppError::AllocationExhausted` when every attempt collided.
pub async fn allocate(
    store: &impl UrlStore,
    normalized_url: &str,
    length: usize,
    max_attempts: u32,
) -> AppResult<Allocation> {
    if let Some(existing) = store.find_by_original_url(normalized_url).await? {
        debug!(short_id = %existing.short_id, "Reusing existing mapping");
        return Ok(Allocation {
            record: existing,
            created: false,
        });
    }

    for attempt in 1..=max_attempts {
        let short_id = nanoid::nanoid!(length);

        if store.short_id_exists(&short_id).await? {
            continue;
        }

        match store.insert_url(&short_id, normalized_url).await {
            Ok(record) => {
                return Ok(Allocation {
                    record,
                    created: true,
                })
            }
            Err(AppError::DuplicateShortId(id)) => {
                warn!(short_id = %id, attempt, "Lost allocation race, regenerating");
                continue;
            }
            Err(e) => return Err(e),
        }
    }

    Err(AppError::AllocationExhausted)
}

/// Check that a path segment looks like a short id: 6-10 characters from
/// the generation alphabet. Anything else falls through to the 404 page.
pub fn is_valid_short_id(candidate: &str) -> bool {
    (6..=10).contains(&candidate.len())
        && candidate
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::Mutex;

    /// In-memory store double. `pending_duplicates` makes that many inserts
    /// fail with `DuplicateShortId` (a simulated lost race);
    /// `every_id_taken` makes the existence pre-check collide on every draw.
    #[derive(Default)]
    struct MemoryStore {
        records: Mutex<Vec<UrlRecord>>,
        pending_duplicates: Mutex<u32>,
        every_id_taken: bool,
    }

    impl MemoryStore {
        fn with_pending_duplicates(count: u32) -> Self {
            MemoryStore {
                pending_duplicates: Mutex::new(count),
                ..MemoryStore::default()
            }
        }

        fn saturated() -> Self {
            MemoryStore {
                every_id_taken: true,
                ..MemoryStore::default()
            }
        }
    }

    #[async_trait]
    impl UrlStore for MemoryStore {
        async fn find_by_original_url(&self, original_url: &str) -> AppResult<Option<UrlRecord>> {
            Ok(self
                .records
                .lock()
                .unwrap()
                .iter()
                .find(|r| r.original_url == original_url)
                .cloned())
        }

        async fn short_id_exists(&self, short_id: &str) -> AppResult<bool> {
            Ok(self.every_id_taken
                || self
                    .records
                    .lock()
                    .unwrap()
                    .iter()
                    .any(|r| r.short_id == short_id))
        }

        async fn insert_url(&self, short_id: &str, original_url: &str) -> AppResult<UrlRecord> {
            let mut pending = self.pending_duplicates.lock().unwrap();
            if *pending > 0 {
                *pending -= 1;
                return Err(AppError::DuplicateShortId(short_id.to_string()));
            }
            drop(pending);

            let mut records = self.records.lock().unwrap();
            let record = UrlRecord {
                id: records.len() as i64 + 1,
                short_id: short_id.to_string(),
                original_url: original_url.to_string(),
                created_at: Utc::now(),
                clicks: 0,
                last_clicked: None,
                is_active: true,
            };
            records.push(record.clone());
            Ok(record)
        }
    }

    #[tokio::test]
    async fn test_allocation_is_idempotent_per_url() {
        let store = MemoryStore::default();

        let first = allocate(&store, "https://example.com", 8, 10).await.unwrap();
        assert!(first.created);
        assert_eq!(first.record.clicks, 0);
        assert!(first.record.is_active);

        let second = allocate(&store, "https://example.com", 8, 10).await.unwrap();
        assert!(!second.created);
        assert_eq!(second.record.short_id, first.record.short_id);
    }

    #[tokio::test]
    async fn test_distinct_urls_get_distinct_ids() {
        let store = MemoryStore::default();

        let bare = allocate(&store, "https://example.com", 8, 10).await.unwrap();
        // Exact-string dedup: the trailing slash is a different URL
        let slash = allocate(&store, "https://example.com/", 8, 10).await.unwrap();

        assert!(slash.created);
        assert_ne!(bare.record.short_id, slash.record.short_id);
    }

    #[tokio::test]
    async fn test_retries_when_insert_loses_race() {
        // Two inserts fail with DuplicateShortId before one sticks
        let store = MemoryStore::with_pending_duplicates(2);

        let allocation = allocate(&store, "https://example.com", 8, 10).await.unwrap();

        assert!(allocation.created);
        assert_eq!(*store.pending_duplicates.lock().unwrap(), 0);
        assert_eq!(store.records.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_exhausted_when_every_attempt_collides() {
        let store = MemoryStore::saturated();

        let result = allocate(&store, "https://example.com", 8, 10).await;

        assert!(matches!(result, Err(AppError::AllocationExhausted)));
        assert!(store.records.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_exhausted_when_every_insert_loses_race() {
        // The pre-check passes but every insert reports a duplicate
        let store = MemoryStore::with_pending_duplicates(u32::MAX);

        let result = allocate(&store, "https://example.com", 8, 3).await;

        assert!(matches!(result, Err(AppError::AllocationExhausted)));
    }

    #[test]
    fn test_generated_id_length() {
        for _ in 0..100 {
            assert_eq!(nanoid::nanoid!(8).len(), 8);
        }
    }

    #[test]
    fn test_generated_id_alphabet() {
        for _ in 0..100 {
            let id = nanoid::nanoid!(8);
            assert!(
                id.bytes()
                    .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_'),
                "unexpected character in {}",
                id
            );
        }
    }

    #[test]
    fn test_generated_ids_pass_route_validation() {
        for _ in 0..100 {
            assert!(is_valid_short_id(&nanoid::nanoid!(8)));
        }
    }

    #[test]
    fn test_valid_short_ids() {
        assert!(is_valid_short_id("abc123"));
        assert!(is_valid_short_id("Abc-12_xYz"));
        assert!(is_valid_short_id("unknownid1"));
    }

    #[test]
    fn test_invalid_short_ids() {
        assert!(!is_valid_short_id("short"));
        assert!(!is_valid_short_id("elevenchars"));
        assert!(!is_valid_short_id("abc.123"));
        assert!(!is_valid_short_id("abc 123!"));
        assert!(!is_valid_short_id(""));
    }
}
