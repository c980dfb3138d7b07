//! End-to-end scenarios for the expiring cache and the fetch layer
//!
//! Drives the public API with a manual clock and a counting fake API.

use chrono::{Duration, TimeZone, Utc};
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

use sportsleagues::cache::{CacheManager, Collection, FileStore, ManualClock, MemoryStore};
use sportsleagues::config::CacheSettings;
use sportsleagues::data::{League, SportsApi, SportsApiError};
use sportsleagues::filter::{filter_leagues, SportFilter};
use sportsleagues::service::{SportsService, ALL_LEAGUES_KEY};

/// Counts league requests; always answers with the same catalogue
#[derive(Default, Clone)]
struct CountingApi {
    calls: Arc<AtomicUsize>,
}

impl SportsApi for CountingApi {
    fn list_leagues(&self) -> impl Future<Output = Result<Vec<League>, SportsApiError>> + Send {
        async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            Ok(vec![League::new("1", "Network League", "Soccer")])
        }
    }

    fn season_badge(
        &self,
        _league_id: &str,
    ) -> impl Future<Output = Result<Option<String>, SportsApiError>> + Send {
        async move { Ok(None) }
    }
}

fn settings_with_search_ttl(minutes: u64) -> CacheSettings {
    let mut settings = CacheSettings::production();
    settings.search_results.ttl_minutes = minutes;
    settings
}

#[test]
fn search_result_expires_after_ttl() {
    let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap());
    let cache = CacheManager::with_clock(
        Arc::new(MemoryStore::new()),
        settings_with_search_ttl(1),
        Arc::new(clock.clone()),
    );

    cache.set(Collection::SearchResults, "q1", &vec!["A"], None);

    clock.advance(Duration::seconds(30));
    assert_eq!(
        cache.get::<Vec<String>>(Collection::SearchResults, "q1"),
        Some(vec!["A".to_string()])
    );

    clock.advance(Duration::seconds(31));
    assert_eq!(cache.get::<Vec<String>>(Collection::SearchResults, "q1"), None);
    assert_eq!(cache.stats()[&Collection::SearchResults].count, 0);
}

#[test]
fn restart_sweeps_expired_entries_and_keeps_live_ones() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap());
    let open = || {
        CacheManager::with_clock(
            Arc::new(FileStore::with_dir(temp_dir.path().to_path_buf())),
            CacheSettings::production(),
            Arc::new(clock.clone()),
        )
    };

    let cache = open();
    cache.set(Collection::SearchResults, "q1", &vec!["A"], None);
    cache.set(Collection::Badges, "4328", &Some("b.png"), None);
    drop(cache);

    clock.advance(Duration::hours(2));
    let reopened = open();

    assert_eq!(reopened.stats()[&Collection::SearchResults].count, 0);
    assert_eq!(
        reopened.get::<Option<String>>(Collection::Badges, "4328"),
        Some(Some("b.png".to_string()))
    );
}

#[test]
fn cleanup_counts_only_expired_entries() {
    let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap());
    let cache = CacheManager::with_clock(
        Arc::new(MemoryStore::new()),
        CacheSettings::production(),
        Arc::new(clock.clone()),
    );
    cache.set(Collection::SearchResults, "a", &1, None);
    cache.set(Collection::SearchResults, "b", &2, None);
    cache.set(Collection::Leagues, ALL_LEAGUES_KEY, &Vec::<League>::new(), None);

    clock.advance(Duration::minutes(60));

    assert_eq!(cache.cleanup(), 2);
    assert_eq!(cache.cleanup(), 0);
    assert_eq!(cache.stats()[&Collection::Leagues].count, 1);
}

#[tokio::test]
async fn cached_leagues_are_served_without_network() {
    let api = CountingApi::default();
    let cache = Arc::new(CacheManager::new(
        Arc::new(MemoryStore::new()),
        CacheSettings::production(),
    ));
    let cached = vec![League::new("1", "Cached League", "Soccer")];
    cache.set(Collection::Leagues, ALL_LEAGUES_KEY, &cached, None);
    let service = SportsService::new(api.clone(), cache);

    assert_eq!(service.leagues().await, cached);
    assert_eq!(api.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn back_to_back_fetches_make_one_network_call() {
    let api = CountingApi::default();
    let cache = Arc::new(CacheManager::new(
        Arc::new(MemoryStore::new()),
        CacheSettings::production(),
    ));
    let service = SportsService::new(api.clone(), cache);

    let first = service.leagues();
    let second = service.leagues();
    let (first, second) = tokio::join!(first, second);

    assert_eq!(first, second);
    assert_eq!(api.calls.load(Ordering::SeqCst), 1);
}

#[test]
fn league_filter_examples() {
    let leagues = vec![
        League::new("1", "Premier League", "Soccer").with_alternate_name("EPL"),
        League::new("2", "NBA", "Basketball"),
    ];

    let epl = filter_leagues(&leagues, "epl", &SportFilter::parse("All"));
    assert_eq!(epl, vec![leagues[0].clone()]);

    let basketball = filter_leagues(&leagues, "", &SportFilter::parse("Basketball"));
    assert_eq!(basketball, vec![leagues[1].clone()]);
}
