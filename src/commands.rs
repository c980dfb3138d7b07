//! Command execution
//!
//! Wires the cache, the API client and the fetch layer together according to
//! a `RuntimeConfig`, then runs one subcommand and prints its output.

use std::io::Write;
use std::sync::Arc;

use crate::app::App;
use crate::cache::{CacheManager, Collection, FileStore, MemoryStore, Store};
use crate::cli::{parse_league_id, CacheAction, CliError, Command, RuntimeConfig, StorageChoice};
use crate::data::SportsApi;
use crate::filter::SportFilter;
use crate::output::{format_badge, format_league, format_stats};
use crate::service::SportsService;

/// Errors surfaced to the user by a command
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error(transparent)]
    Cli(#[from] CliError),

    /// Writing command output failed
    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

/// Builds the cache selected by the configuration
///
/// Construction sweeps expired entries.
pub fn build_cache(config: &RuntimeConfig) -> Arc<CacheManager> {
    let store: Arc<dyn Store> = match &config.storage {
        StorageChoice::Memory => Arc::new(MemoryStore::new()),
        StorageChoice::Disk(dir) => Arc::new(FileStore::with_dir(dir.clone())),
    };
    Arc::new(CacheManager::new(store, config.cache_settings()))
}

/// Runs one command against the service, writing results to `out`
pub async fn run<A: SportsApi, W: Write>(
    command: Command,
    service: &SportsService<A>,
    out: &mut W,
) -> Result<(), CommandError> {
    match command {
        Command::List { search, sport } => {
            let mut app = App::new();
            app.load(service).await;
            app.on_search_change(search);
            app.on_sport_change(&sport);

            if let Some(error) = app.error() {
                writeln!(out, "{}", error)?;
                return Ok(());
            }
            let leagues = app.filtered_leagues();
            for league in &leagues {
                writeln!(out, "{}", format_league(league))?;
            }
            writeln!(out, "{} of {} leagues", leagues.len(), app.leagues().len())?;
        }
        Command::Sports => {
            let mut app = App::new();
            app.load(service).await;
            if let Some(error) = app.error() {
                writeln!(out, "{}", error)?;
                return Ok(());
            }
            for sport in app.unique_sports() {
                writeln!(out, "{}", sport)?;
            }
        }
        Command::Search { term, sport } => {
            let results = service.search(&term, &SportFilter::parse(&sport)).await;
            if results.is_empty() {
                writeln!(out, "No leagues found")?;
            }
            for league in &results {
                writeln!(out, "{}", format_league(league))?;
            }
        }
        Command::Badge { league_id } => {
            let league_id = parse_league_id(&league_id)?;
            let mut app = App::new();
            app.show_badge(service, league_id).await;
            writeln!(out, "{}", format_badge(league_id, app.badge()))?;
        }
        Command::Cache { action } => run_cache_action(action, service, out)?,
    }
    Ok(())
}

fn run_cache_action<A: SportsApi, W: Write>(
    action: CacheAction,
    service: &SportsService<A>,
    out: &mut W,
) -> Result<(), CommandError> {
    let cache = service.cache();
    match action {
        CacheAction::Stats => {
            for line in format_stats(&cache.stats()) {
                writeln!(out, "{}", line)?;
            }
        }
        CacheAction::Cleanup => {
            let deleted = cache.cleanup();
            writeln!(out, "Cleaned up {} expired cache items", deleted)?;
        }
        CacheAction::Clear { collection: Some(collection) } => {
            cache.clear(collection);
            writeln!(out, "Cleared {}", collection)?;
        }
        CacheAction::Clear { collection: None } => {
            service.clear_cache();
            let names: Vec<&str> = Collection::ALL.iter().map(|c| c.as_str()).collect();
            writeln!(out, "Cleared {}", names.join(", "))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ApiConfig, CacheSettings, Environment};
    use crate::data::{League, SportsApiError};
    use std::future::Future;
    use tempfile::TempDir;

    /// API that serves a fixed catalogue, or fails every call
    struct FixedApi {
        leagues: Option<Vec<League>>,
    }

    impl SportsApi for FixedApi {
        fn list_leagues(&self) -> impl Future<Output = Result<Vec<League>, SportsApiError>> + Send {
            let result = self
                .leagues
                .clone()
                .ok_or(SportsApiError::UnexpectedStatus(500));
            async move { result }
        }

        fn season_badge(
            &self,
            league_id: &str,
        ) -> impl Future<Output = Result<Option<String>, SportsApiError>> + Send {
            let result = match &self.leagues {
                Some(_) if league_id == "4328" => Ok(Some("https://x/epl.png".to_string())),
                Some(_) => Ok(None),
                None => Err(SportsApiError::UnexpectedStatus(500)),
            };
            async move { result }
        }
    }

    fn service(leagues: Option<Vec<League>>) -> SportsService<FixedApi> {
        let cache = Arc::new(CacheManager::new(
            Arc::new(MemoryStore::new()),
            CacheSettings::production(),
        ));
        SportsService::new(FixedApi { leagues }, cache)
    }

    fn catalogue() -> Option<Vec<League>> {
        Some(vec![
            League::new("4328", "Premier League", "Soccer").with_alternate_name("EPL"),
            League::new("4387", "NBA", "Basketball"),
        ])
    }

    async fn run_to_string<A: SportsApi>(command: Command, service: &SportsService<A>) -> String {
        let mut out = Vec::new();
        run(command, service, &mut out).await.expect("command should succeed");
        String::from_utf8(out).unwrap()
    }

    #[tokio::test]
    async fn test_list_filters_by_search() {
        let output = run_to_string(
            Command::List {
                search: "epl".to_string(),
                sport: "All".to_string(),
            },
            &service(catalogue()),
        )
        .await;

        assert!(output.contains("Premier League"));
        assert!(!output.contains("NBA"));
        assert!(output.contains("1 of 2 leagues"));
    }

    #[tokio::test]
    async fn test_list_reports_load_failure() {
        let output = run_to_string(Command::default(), &service(None)).await;
        assert_eq!(output.trim(), "Could not load leagues");
    }

    #[tokio::test]
    async fn test_sports_lists_distinct_sorted() {
        let output = run_to_string(Command::Sports, &service(catalogue())).await;
        assert_eq!(output, "Basketball\nSoccer\n");
    }

    #[tokio::test]
    async fn test_search_by_sport() {
        let output = run_to_string(
            Command::Search {
                term: String::new(),
                sport: "Basketball".to_string(),
            },
            &service(catalogue()),
        )
        .await;
        assert!(output.contains("NBA"));
        assert!(!output.contains("Premier League"));
    }

    #[tokio::test]
    async fn test_badge_found_and_missing() {
        let svc = service(catalogue());

        let found = run_to_string(
            Command::Badge {
                league_id: "4328".to_string(),
            },
            &svc,
        )
        .await;
        assert_eq!(found.trim(), "https://x/epl.png");

        let missing = run_to_string(
            Command::Badge {
                league_id: "4387".to_string(),
            },
            &svc,
        )
        .await;
        assert!(missing.contains("No badge available"));
    }

    #[tokio::test]
    async fn test_badge_rejects_blank_id() {
        let mut out = Vec::new();
        let result = run(
            Command::Badge {
                league_id: " ".to_string(),
            },
            &service(catalogue()),
            &mut out,
        )
        .await;

        assert!(matches!(
            result,
            Err(CommandError::Cli(CliError::InvalidLeagueId(_)))
        ));
    }

    #[tokio::test]
    async fn test_cache_stats_and_clear() {
        let svc = service(catalogue());
        svc.leagues().await;

        let stats = run_to_string(
            Command::Cache {
                action: CacheAction::Stats,
            },
            &svc,
        )
        .await;
        assert!(stats.lines().next().unwrap().contains("1 entries"));

        let cleared = run_to_string(
            Command::Cache {
                action: CacheAction::Clear { collection: None },
            },
            &svc,
        )
        .await;
        assert_eq!(cleared.trim(), "Cleared leagues, badges, searchResults");
        assert_eq!(svc.cache().stats()[&Collection::Leagues].count, 0);
    }

    #[tokio::test]
    async fn test_cache_cleanup_reports_count() {
        let output = run_to_string(
            Command::Cache {
                action: CacheAction::Cleanup,
            },
            &service(catalogue()),
        )
        .await;
        assert_eq!(output.trim(), "Cleaned up 0 expired cache items");
    }

    #[test]
    fn test_build_cache_on_disk_persists() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let config = RuntimeConfig {
            environment: Environment::Production,
            api: ApiConfig::test(),
            storage: StorageChoice::Disk(temp_dir.path().to_path_buf()),
        };

        build_cache(&config).set(Collection::Badges, "4328", &"b.png", None);
        let reopened = build_cache(&config);

        assert_eq!(
            reopened.get::<String>(Collection::Badges, "4328").as_deref(),
            Some("b.png")
        );
    }
}
