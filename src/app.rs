//! Application state for the league browser
//!
//! This module holds the view state (loaded leagues, search text, selected
//! sport, selected league and its badge) and the user intents that change it.
//! It never renders anything; the CLI prints from it.

use crate::data::{League, SportsApi};
use crate::filter::{filter_leagues, unique_sports, SportFilter};
use crate::service::SportsService;

/// Message shown when the catalogue comes back empty
pub const LOAD_ERROR_MESSAGE: &str = "Could not load leagues";

/// Loading state of the selected league's badge
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BadgeState {
    /// No league selected
    #[default]
    Idle,
    /// Badge fetch in progress for the selected league
    Loading,
    /// Badge fetched; `None` means the league has no badge
    Loaded(Option<String>),
}

/// Main application struct managing view state
#[derive(Debug, Clone)]
pub struct App {
    /// All leagues, in API order
    leagues: Vec<League>,
    /// True until the first load completes
    loading: bool,
    /// User-facing error, if the load produced nothing
    error: Option<String>,
    /// Current free-text search
    search_term: String,
    /// Current sport selection
    selected_sport: SportFilter,
    /// League whose badge is shown
    selected_league_id: Option<String>,
    badge: BadgeState,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    /// Creates a new App in the loading state
    pub fn new() -> Self {
        Self {
            leagues: Vec::new(),
            loading: true,
            error: None,
            search_term: String::new(),
            selected_sport: SportFilter::All,
            selected_league_id: None,
            badge: BadgeState::Idle,
        }
    }

    pub fn leagues(&self) -> &[League] {
        &self.leagues
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn selected_sport(&self) -> &SportFilter {
        &self.selected_sport
    }

    pub fn selected_league_id(&self) -> Option<&str> {
        self.selected_league_id.as_deref()
    }

    pub fn badge(&self) -> &BadgeState {
        &self.badge
    }

    /// Leagues matching the current search and sport
    pub fn filtered_leagues(&self) -> Vec<League> {
        filter_leagues(&self.leagues, &self.search_term, &self.selected_sport)
    }

    /// Sports available for the sport selector
    pub fn unique_sports(&self) -> Vec<String> {
        unique_sports(&self.leagues)
    }

    /// Loads the league catalogue and leaves the loading state
    ///
    /// The service never fails; an empty catalogue is the only sign that
    /// nothing could be loaded.
    pub async fn load<A: SportsApi>(&mut self, service: &SportsService<A>) {
        self.loading = true;
        let leagues = service.leagues().await;
        self.finish_loading(leagues);
    }

    /// Applies a loaded catalogue
    pub fn finish_loading(&mut self, leagues: Vec<League>) {
        self.error = leagues.is_empty().then(|| LOAD_ERROR_MESSAGE.to_string());
        self.leagues = leagues;
        self.loading = false;
    }

    pub fn on_search_change(&mut self, text: impl Into<String>) {
        self.search_term = text.into();
    }

    /// Sets the sport filter; `"All"` clears it
    pub fn on_sport_change(&mut self, sport: &str) {
        self.selected_sport = SportFilter::parse(sport);
    }

    /// Toggles the selected league
    ///
    /// # Returns
    /// The league id whose badge should now be fetched, or `None` when the
    /// selection was cleared.
    pub fn select_league(&mut self, id: &str) -> Option<String> {
        if self.selected_league_id.as_deref() == Some(id) {
            self.selected_league_id = None;
            self.badge = BadgeState::Idle;
            None
        } else {
            self.selected_league_id = Some(id.to_string());
            self.badge = BadgeState::Loading;
            Some(id.to_string())
        }
    }

    /// Records a fetched badge if `id` is still the selected league
    ///
    /// Results for a league that has since been deselected are dropped.
    pub fn badge_loaded(&mut self, id: &str, badge: Option<String>) {
        if self.selected_league_id.as_deref() == Some(id) {
            self.badge = BadgeState::Loaded(badge);
        }
    }

    /// Selects a league and fetches its badge through the service
    pub async fn show_badge<A: SportsApi>(&mut self, service: &SportsService<A>, id: &str) {
        if let Some(id) = self.select_league(id) {
            let badge = service.season_badge(&id).await;
            self.badge_loaded(&id, badge);
        }
    }
}
