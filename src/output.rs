//! Plain-text formatting for command output

use std::collections::BTreeMap;

use crate::app::BadgeState;
use crate::cache::{Collection, CollectionStats};
use crate::data::League;

/// One line per league: id, name, sport and any alternate names
pub fn format_league(league: &League) -> String {
    match league.alternate_name.as_deref().filter(|alt| !alt.is_empty()) {
        Some(alternate) => format!(
            "{:>6}  {} ({}) [{}]",
            league.id, league.name, league.sport, alternate
        ),
        None => format!("{:>6}  {} ({})", league.id, league.name, league.sport),
    }
}

pub fn format_badge(league_id: &str, badge: &BadgeState) -> String {
    match badge {
        BadgeState::Loaded(Some(url)) => url.clone(),
        BadgeState::Loaded(None) => format!("No badge available for league {}", league_id),
        BadgeState::Idle | BadgeState::Loading => format!("No badge loaded for league {}", league_id),
    }
}

/// Human-readable byte size (B, KB, MB)
pub fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    let bytes_f = bytes as f64;
    if bytes_f >= KB * KB {
        format!("{:.1} MB", bytes_f / (KB * KB))
    } else if bytes_f >= KB {
        format!("{:.1} KB", bytes_f / KB)
    } else {
        format!("{} B", bytes)
    }
}

/// Stats table, one line per collection
pub fn format_stats(stats: &BTreeMap<Collection, CollectionStats>) -> Vec<String> {
    stats
        .iter()
        .map(|(collection, stats)| {
            format!(
                "{:<14}{:>6} entries  ~{}",
                collection.as_str(),
                stats.count,
                format_size(stats.approx_bytes)
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_league_with_and_without_alternate() {
        let epl = League::new("4328", "English Premier League", "Soccer").with_alternate_name("EPL");
        assert_eq!(
            format_league(&epl),
            "  4328  English Premier League (Soccer) [EPL]"
        );

        let nba = League::new("4387", "NBA", "Basketball").with_alternate_name("");
        assert_eq!(format_league(&nba), "  4387  NBA (Basketball)");
    }

    #[test]
    fn test_format_badge() {
        let loaded = BadgeState::Loaded(Some("https://x/b.png".to_string()));
        assert_eq!(format_badge("1", &loaded), "https://x/b.png");
        assert_eq!(
            format_badge("1", &BadgeState::Loaded(None)),
            "No badge available for league 1"
        );
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0 MB");
    }

    #[test]
    fn test_format_stats_lists_collections_in_order() {
        let mut stats = BTreeMap::new();
        stats.insert(
            Collection::SearchResults,
            CollectionStats {
                count: 1,
                approx_bytes: 100,
            },
        );
        stats.insert(
            Collection::Leagues,
            CollectionStats {
                count: 3,
                approx_bytes: 4096,
            },
        );

        let lines = format_stats(&stats);

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("leagues"));
        assert!(lines[0].contains("3 entries"));
        assert!(lines[0].contains("~4.0 KB"));
        assert!(lines[1].starts_with("searchResults"));
    }
}
