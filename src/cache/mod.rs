//! Process-wide memoisation of search results keyed by the literal query string

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, info};

use crate::models::Product;
use crate::traits::ListingSource;

/// Fixed-capacity least-recently-used store of query results.
///
/// Entries never expire by time, only when a newer query needs the slot.
pub struct QueryCache {
    capacity: usize,
    state: Mutex<LruState>,
}

#[derive(Default)]
struct LruState {
    entries: HashMap<String, Vec<Product>>,
    /// Keys from least to most recently used
    order: VecDeque<String>,
}

impl LruState {
    fn touch(&mut self, key: &str) {
        if let Some(pos) = self.order.iter().position(|k| k == key)
            && let Some(k) = self.order.remove(pos)
        {
            self.order.push_back(k);
        }
    }
}

impl QueryCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            state: Mutex::new(LruState::default()),
        }
    }

    pub fn get(&self, query: &str) -> Option<Vec<Product>> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let hit = state.entries.get(query).cloned()?;
        state.touch(query);
        Some(hit)
    }

    pub fn insert(&self, query: String, products: Vec<Product>) {
        if self.capacity == 0 {
            return;
        }

        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if state.entries.insert(query.clone(), products).is_some() {
            state.touch(&query);
            return;
        }

        state.order.push_back(query);
        while state.order.len() > self.capacity {
            if let Some(evicted) = state.order.pop_front() {
                debug!("Evicting cached query: {}", evicted);
                state.entries.remove(&evicted);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .entries
            .len()
    }
}

/// Wraps a [`ListingSource`], answering repeated queries from a [`QueryCache`]
pub struct CachedSource<S> {
    inner: S,
    cache: QueryCache,
}

impl<S: ListingSource> CachedSource<S> {
    pub fn new(inner: S, capacity: usize) -> Self {
        Self {
            inner,
            cache: QueryCache::new(capacity),
        }
    }
}

#[async_trait]
impl<S: ListingSource> ListingSource for CachedSource<S> {
    async fn search(&self, query: &str) -> Result<Vec<Product>> {
        if let Some(products) = self.cache.get(query) {
            info!("Cache hit for query: {}", query);
            return Ok(products);
        }

        let products = self.inner.search(query).await?;

        // Empty pages are usually upstream trouble, so only real results are memoised
        if !products.is_empty() {
            self.cache.insert(query.to_string(), products.clone());
            info!("Cached {} products ({} queries held)", products.len(), self.cache.len());
        }

        Ok(products)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn product(title: &str) -> Product {
        Product {
            title: title.to_string(),
            price: 10_000,
            specs: Vec::new(),
            url: String::new(),
            image: String::new(),
            rating: None,
            discount: None,
            reviews: None,
        }
    }

    #[test]
    fn test_evicts_least_recently_used() {
        let cache = QueryCache::new(2);
        cache.insert("a".to_string(), vec![product("A")]);
        cache.insert("b".to_string(), vec![product("B")]);

        // Reading "a" makes "b" the eviction candidate
        assert!(cache.get("a").is_some());
        cache.insert("c".to_string(), vec![product("C")]);

        assert_eq!(cache.len(), 2);
        assert!(cache.get("b").is_none());
        assert_eq!(cache.get("a").unwrap()[0].title, "A");
        assert_eq!(cache.get("c").unwrap()[0].title, "C");
    }

    #[test]
    fn test_reinsert_replaces_without_growing() {
        let cache = QueryCache::new(2);
        cache.insert("a".to_string(), vec![product("old")]);
        cache.insert("a".to_string(), vec![product("new")]);

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("a").unwrap()[0].title, "new");
    }

    #[test]
    fn test_zero_capacity_disables_caching() {
        let cache = QueryCache::new(0);
        cache.insert("a".to_string(), vec![product("A")]);
        assert!(cache.get("a").is_none());
    }

    struct CountingSource {
        calls: AtomicUsize,
        results: Vec<Product>,
    }

    #[async_trait]
    impl ListingSource for CountingSource {
        async fn search(&self, _query: &str) -> Result<Vec<Product>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.results.clone())
        }
    }

    #[tokio::test]
    async fn test_cached_source_fetches_once_per_query() {
        let source = CachedSource::new(
            CountingSource {
                calls: AtomicUsize::new(0),
                results: vec![product("Pixel 8a")],
            },
            4,
        );

        let first = source.search("pixel").await.unwrap();
        let second = source.search("pixel").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(source.inner.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_cached_source_does_not_memoise_empty_results() {
        let source = CachedSource::new(
            CountingSource {
                calls: AtomicUsize::new(0),
                results: Vec::new(),
            },
            4,
        );

        source.search("nothing").await.unwrap();
        source.search("nothing").await.unwrap();

        assert_eq!(source.inner.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_insert_and_get_stay_consistent() {
        const CAPACITY: usize = 3;
        let cache = Arc::new(QueryCache::new(CAPACITY));

        let tasks: Vec<_> = (0..8)
            .map(|task| {
                let cache = Arc::clone(&cache);
                tokio::spawn(async move {
                    for round in 0..200 {
                        let key = format!("q{}", (task + round) % 6);
                        if round % 3 == 0 {
                            if let Some(hit) = cache.get(&key) {
                                // Values are tagged with the key they were stored under
                                assert_eq!(hit.len(), 1);
                                assert!(hit[0].title.starts_with(&format!("{key}/")));
                            }
                        } else {
                            cache.insert(key.clone(), vec![product(&format!("{key}/{task}"))]);
                        }
                        tokio::task::yield_now().await;
                    }
                })
            })
            .collect();

        for task in tasks {
            task.await.unwrap();
        }

        assert!(cache.len() <= CAPACITY);

        let state = cache.state.lock().unwrap();
        assert_eq!(state.order.len(), state.entries.len());
        let ordered: HashSet<&String> = state.order.iter().collect();
        assert_eq!(ordered.len(), state.order.len());
        assert!(state.order.iter().all(|key| state.entries.contains_key(key)));
    }

    struct EchoSource;

    #[async_trait]
    impl ListingSource for EchoSource {
        async fn search(&self, query: &str) -> Result<Vec<Product>> {
            tokio::task::yield_now().await;
            Ok(vec![product(query)])
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_cached_source_serves_concurrent_requests() {
        let source = Arc::new(CachedSource::new(EchoSource, 2));

        let tasks: Vec<_> = (0..8)
            .map(|task| {
                let source = Arc::clone(&source);
                tokio::spawn(async move {
                    for round in 0..50 {
                        let query = format!("phones {}", (task * round) % 4);
                        let products = source.search(&query).await.unwrap();
                        assert_eq!(products, vec![product(&query)]);
                    }
                })
            })
            .collect();

        for task in tasks {
            task.await.unwrap();
        }

        assert!(source.cache.len() <= 2);
    }
}
