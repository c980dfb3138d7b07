//! League search and sport filtering
//!
//! Pure functions over a league slice; no I/O and no state.

use std::collections::BTreeSet;
use std::fmt;

use crate::data::League;

/// Label the UI uses for "no sport filter"
pub const ALL_SPORTS: &str = "All";

/// Sport selection for filtering
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SportFilter {
    /// Every sport matches
    #[default]
    All,
    /// Only leagues whose sport equals this name exactly
    Sport(String),
}

impl SportFilter {
    /// Parses a sport selection; `"All"` disables the filter
    pub fn parse(selection: &str) -> Self {
        if selection == ALL_SPORTS {
            SportFilter::All
        } else {
            SportFilter::Sport(selection.to_string())
        }
    }

    pub fn matches(&self, league: &League) -> bool {
        match self {
            SportFilter::All => true,
            SportFilter::Sport(sport) => league.sport == *sport,
        }
    }
}

impl fmt::Display for SportFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SportFilter::All => f.write_str(ALL_SPORTS),
            SportFilter::Sport(sport) => f.write_str(sport),
        }
    }
}

/// Returns the leagues matching both the search text and the sport, in input order
///
/// The search is case-insensitive and matches a substring of either the
/// league name or its alternate name. An empty search matches everything.
pub fn filter_leagues(leagues: &[League], search_term: &str, sport: &SportFilter) -> Vec<League> {
    let search = search_term.to_lowercase();
    leagues
        .iter()
        .filter(|league| matches_search(league, &search) && sport.matches(league))
        .cloned()
        .collect()
}

fn matches_search(league: &League, search: &str) -> bool {
    league.name.to_lowercase().contains(search)
        || league
            .alternate_name
            .as_deref()
            .is_some_and(|alternate| alternate.to_lowercase().contains(search))
}

/// Distinct sports across the leagues, sorted
pub fn unique_sports(leagues: &[League]) -> Vec<String> {
    leagues
        .iter()
        .map(|league| league.sport.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
