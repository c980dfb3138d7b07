//! Core data models for the sports leagues CLI
//!
//! Types mirror TheSportsDB JSON payloads, so field names follow the API's
//! `idLeague` / `strLeague` naming on the wire.

pub mod client;

pub use client::{HttpSportsApi, SportsApi, SportsApiError};

use serde::{Deserialize, Serialize};

/// A sports league as listed by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct League {
    /// Unique league identifier
    #[serde(rename = "idLeague")]
    pub id: String,
    /// Display name, e.g. "English Premier League"
    #[serde(rename = "strLeague")]
    pub name: String,
    /// Sport the league belongs to, e.g. "Soccer"
    #[serde(rename = "strSport")]
    pub sport: String,
    /// Alternate names, e.g. "Premier League, EPL"
    #[serde(rename = "strLeagueAlternate", default)]
    pub alternate_name: Option<String>,
}

impl League {
    pub fn new(id: impl Into<String>, name: impl Into<String>, sport: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            sport: sport.into(),
            alternate_name: None,
        }
    }

    pub fn with_alternate_name(mut self, alternate_name: impl Into<String>) -> Self {
        self.alternate_name = Some(alternate_name.into());
        self
    }
}

/// Envelope returned by the league listing endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct LeaguesResponse {
    /// The API sends `null` instead of an empty array
    #[serde(default)]
    pub leagues: Option<Vec<League>>,
}

impl LeaguesResponse {
    pub fn into_leagues(self) -> Vec<League> {
        self.leagues.unwrap_or_default()
    }
}

/// One season of a league
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Season {
    /// Season label, e.g. "2023-2024"
    #[serde(rename = "strSeason", default)]
    pub name: Option<String>,
    /// URL of the season badge image
    #[serde(rename = "strBadge", default)]
    pub badge: Option<String>,
}

/// Envelope returned by the seasons endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct SeasonsResponse {
    #[serde(default)]
    pub seasons: Option<Vec<Season>>,
}

impl SeasonsResponse {
    /// Badge of the first season, ignoring missing or blank URLs
    pub fn first_badge(self) -> Option<String> {
        self.seasons
            .unwrap_or_default()
            .into_iter()
            .next()
            .and_then(|season| season.badge)
            .filter(|badge| !badge.trim().is_empty())
    }
}
