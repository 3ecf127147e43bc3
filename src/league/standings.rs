//! Ranked standings and their textual rendering

use crate::error::Result;
use crate::league::PlayerRecord;
use crate::types::PlayerId;
use crate::utils::NAME_COLUMN_WIDTH;
use serde::{Deserialize, Serialize};

/// One row of the ranking table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    /// 1 = highest rated
    pub position: usize,
    pub player_id: PlayerId,
    pub rating: f64,
    pub games_played: usize,
}

/// Sort records by rating, highest first
pub fn rank<'a>(records: impl IntoIterator<Item = &'a PlayerRecord>) -> Vec<&'a PlayerRecord> {
    let mut ranked: Vec<&PlayerRecord> = records.into_iter().collect();
    ranked.sort_by(|a, b| b.rating().total_cmp(&a.rating()));
    ranked
}

/// Number already-ranked records
pub fn standings(ranked: &[&PlayerRecord]) -> Vec<Standing> {
    ranked
        .iter()
        .enumerate()
        .map(|(index, record)| Standing {
            position: index + 1,
            player_id: record.identity().to_string(),
            rating: record.rating(),
            games_played: record.games_played(),
        })
        .collect()
}

/// Header row of the ranking table
pub fn table_header() -> String {
    format!("{:<width$}| Ranking", "Player Name", width = NAME_COLUMN_WIDTH)
}

/// Render already-ranked records as a text table, one player per line
pub fn render_table(ranked: &[&PlayerRecord]) -> String {
    let mut table = table_header();
    for record in ranked {
        table.push('\n');
        table.push_str(&record.to_string());
    }
    table
}

/// Render standings as pretty-printed JSON
pub fn render_json(standings: &[Standing]) -> Result<String> {
    Ok(serde_json::to_string_pretty(standings)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rating::InMemoryRatingStore;

    fn records(ratings: &[(&str, f64)]) -> Vec<PlayerRecord> {
        let store = InMemoryRatingStore::new();
        ratings
            .iter()
            .map(|(name, rating)| PlayerRecord::create(name, *rating, &store).unwrap())
            .collect()
    }

    #[test]
    fn test_rank_orders_by_rating_descending() {
        let players = records(&[("low", 1400.0), ("high", 1600.0), ("mid", 1500.0)]);
        let ranked = rank(&players);

        let names: Vec<&str> = ranked.iter().map(|r| r.identity()).collect();
        assert_eq!(names, vec!["high", "mid", "low"]);
    }

    #[test]
    fn test_standings_positions() {
        let players = records(&[("low", 1400.0), ("high", 1600.0)]);
        let rows = standings(&rank(&players));

        assert_eq!(rows[0].position, 1);
        assert_eq!(rows[0].player_id, "high");
        assert_eq!(rows[1].position, 2);
        assert_eq!(rows[1].rating, 1400.0);
    }

    #[test]
    fn test_render_table() {
        let players = records(&[("bob", 1485.0), ("alice", 1515.0)]);
        let table = render_table(&rank(&players));

        let expected = "\
Player Name    | Ranking
alice          | 1515
bob            | 1485";
        assert_eq!(table, expected);
    }

    #[test]
    fn test_render_empty_table() {
        assert_eq!(render_table(&[]), table_header());
    }

    #[test]
    fn test_render_json() {
        let players = records(&[("alice", 1515.0)]);
        let json = render_json(&standings(&rank(&players))).unwrap();

        let parsed: Vec<Standing> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[0].player_id, "alice");
        assert_eq!(parsed[0].position, 1);
    }
}
