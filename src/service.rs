//! Memoizing fetch layer over the sports API
//!
//! `SportsService` makes sure each resource is fetched at most once at a time:
//! all callers asking for the same key share one future. A shared future checks
//! the expiring cache before touching the network and writes successful results
//! through to it. Failures resolve to an empty value and drop the memo so the
//! next caller retries.

use futures::future::{BoxFuture, FutureExt, Shared};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::cache::{CacheManager, Collection};
use crate::data::{League, SportsApi};
use crate::filter::{filter_leagues, SportFilter};

/// Resource key for the full league catalogue
pub const ALL_LEAGUES_KEY: &str = "all";

type MemoFuture<V> = Shared<BoxFuture<'static, V>>;

struct MemoSlot<V: Clone> {
    generation: u64,
    future: MemoFuture<V>,
}

/// Map from resource key to the one shared fetch for that key
struct Memo<V: Clone> {
    slots: Mutex<HashMap<String, MemoSlot<V>>>,
    next_generation: AtomicU64,
}

impl<V: Clone + Send + Sync + 'static> Memo<V> {
    fn new() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
            next_generation: AtomicU64::new(0),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, MemoSlot<V>>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the memoized future for `key`, registering a new one if absent
    ///
    /// The slot is inserted before anyone polls the new future, so callers
    /// racing on the same key always coalesce onto one fetch.
    fn get_or_start(
        &self,
        key: &str,
        start: impl FnOnce(u64) -> BoxFuture<'static, V>,
    ) -> MemoFuture<V> {
        let mut slots = self.lock();
        if let Some(slot) = slots.get(key) {
            return slot.future.clone();
        }

        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        let future = start(generation).shared();
        slots.insert(
            key.to_string(),
            MemoSlot {
                generation,
                future: future.clone(),
            },
        );
        future
    }

    /// Drops the slot for `key` if it still belongs to `generation`
    fn invalidate(&self, key: &str, generation: u64) {
        let mut slots = self.lock();
        if slots.get(key).is_some_and(|slot| slot.generation == generation) {
            slots.remove(key);
        }
    }

    fn clear(&self) {
        self.lock().clear();
    }

    #[cfg(test)]
    fn contains(&self, key: &str) -> bool {
        self.lock().contains_key(key)
    }
}

struct Inner<A> {
    api: A,
    cache: Arc<CacheManager>,
    leagues: Memo<Vec<League>>,
    badges: Memo<Option<String>>,
}

impl<A: SportsApi> Inner<A> {
    async fn load_leagues(&self, generation: u64) -> Vec<League> {
        if let Some(leagues) = self
            .cache
            .get::<Vec<League>>(Collection::Leagues, ALL_LEAGUES_KEY)
        {
            tracing::debug!(count = leagues.len(), "leagues served from cache");
            return leagues;
        }

        match self.api.list_leagues().await {
            Ok(leagues) => {
                tracing::info!(count = leagues.len(), "fetched leagues");
                self.cache
                    .set(Collection::Leagues, ALL_LEAGUES_KEY, &leagues, None);
                leagues
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to fetch leagues");
                self.leagues.invalidate(ALL_LEAGUES_KEY, generation);
                Vec::new()
            }
        }
    }

    async fn load_badge(&self, league_id: &str, generation: u64) -> Option<String> {
        if let Some(badge) = self
            .cache
            .get::<Option<String>>(Collection::Badges, league_id)
        {
            tracing::debug!(league_id, "badge served from cache");
            return badge;
        }

        match self.api.season_badge(league_id).await {
            Ok(badge) => {
                tracing::info!(league_id, found = badge.is_some(), "fetched season badge");
                self.cache.set(Collection::Badges, league_id, &badge, None);
                badge
            }
            Err(e) => {
                tracing::warn!(league_id, error = %e, "failed to fetch badge");
                self.badges.invalidate(league_id, generation);
                None
            }
        }
    }
}

/// Cache-backed, request-coalescing access to leagues and badges
///
/// Cloning is cheap and clones share memo state.
pub struct SportsService<A> {
    inner: Arc<Inner<A>>,
}

impl<A> Clone for SportsService<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A: SportsApi> SportsService<A> {
    pub fn new(api: A, cache: Arc<CacheManager>) -> Self {
        Self {
            inner: Arc::new(Inner {
                api,
                cache,
                leagues: Memo::new(),
                badges: Memo::new(),
            }),
        }
    }

    pub fn cache(&self) -> &Arc<CacheManager> {
        &self.inner.cache
    }

    /// All leagues; empty if the API is unavailable and nothing is cached
    pub async fn leagues(&self) -> Vec<League> {
        let inner = Arc::clone(&self.inner);
        let future = self.inner.leagues.get_or_start(ALL_LEAGUES_KEY, move |generation| {
            async move { inner.load_leagues(generation).await }.boxed()
        });
        future.await
    }

    /// Season badge URL for a league, or `None` if it has none or the fetch failed
    pub async fn season_badge(&self, league_id: &str) -> Option<String> {
        let inner = Arc::clone(&self.inner);
        let id = league_id.to_string();
        let future = self.inner.badges.get_or_start(league_id, move |generation| {
            async move { inner.load_badge(&id, generation).await }.boxed()
        });
        future.await
    }

    /// Filtered leagues, cached per search term and sport
    ///
    /// Results are only cached when the catalogue itself loaded, so an outage
    /// never pins an empty result.
    pub async fn search(&self, search_term: &str, sport: &SportFilter) -> Vec<League> {
        let key = search_key(search_term, sport);
        if let Some(results) = self
            .inner
            .cache
            .get::<Vec<League>>(Collection::SearchResults, &key)
        {
            tracing::debug!(%key, "search served from cache");
            return results;
        }

        let leagues = self.leagues().await;
        let results = filter_leagues(&leagues, search_term, sport);
        if !leagues.is_empty() {
            self.inner
                .cache
                .set(Collection::SearchResults, &key, &results, None);
        }
        results
    }

    /// Clears every cache collection and forgets all memoized fetches
    pub fn clear_cache(&self) {
        for collection in Collection::ALL {
            self.inner.cache.clear(collection);
        }
        self.inner.leagues.clear();
        self.inner.badges.clear();
    }
}

/// Cache key for a search: lowercased term and the sport selection
///
/// The term is length-prefixed so a `|` inside it cannot collide with the
/// separator.
fn search_key(search_term: &str, sport: &SportFilter) -> String {
    let term = search_term.to_lowercase();
    format!("{}:{}|{}", term.len(), term, sport)
}
