//! Composed result of one polling cycle

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

use super::{
    Assignment, Campaign, Dispatch, Planet, SpaceStation, SteamNewsItem, WarStatistics,
    HUMAN_FACTION,
};

/// Immutable snapshot handed to the presentation layer.
/// Every list is always present, possibly empty.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AggregateSnapshot {
    pub war_stats: Option<WarStatistics>,
    pub assignments: Vec<Assignment>,
    pub planets: Vec<Planet>,
    pub campaigns: Vec<Campaign>,
    pub dispatches: Vec<Dispatch>,
    pub steam_news: Vec<SteamNewsItem>,
    pub space_stations: Vec<SpaceStation>,
    pub last_updated: DateTime<Utc>,
}

/// A planet ranked by activity, joined with its campaign
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlanetActivity<'a> {
    pub planet: &'a Planet,
    pub campaign: Option<&'a Campaign>,
}

impl AggregateSnapshot {
    /// Empty snapshot stamped at `last_updated`
    pub fn empty(last_updated: DateTime<Utc>) -> Self {
        Self {
            war_stats: None,
            assignments: Vec::new(),
            planets: Vec::new(),
            campaigns: Vec::new(),
            dispatches: Vec::new(),
            steam_news: Vec::new(),
            space_stations: Vec::new(),
            last_updated,
        }
    }

    /// Busiest planets: human-held or with players present, sorted by
    /// player count descending (stable), first `limit`.
    pub fn top_planets(&self, limit: usize) -> Vec<PlanetActivity<'_>> {
        let by_index: HashMap<u32, &Campaign> = self
            .campaigns
            .iter()
            .map(|c| (c.planet_index, c))
            .collect();

        let mut active: Vec<PlanetActivity<'_>> = self
            .planets
            .iter()
            .filter(|p| p.current_owner == HUMAN_FACTION || p.statistics.player_count > 0)
            .map(|planet| PlanetActivity {
                planet,
                campaign: by_index.get(&planet.index).copied(),
            })
            .collect();

        active.sort_by(|a, b| {
            b.planet
                .statistics
                .player_count
                .cmp(&a.planet.statistics.player_count)
        });
        active.truncate(limit);
        active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PlanetStatistics;
    use chrono::TimeZone;

    fn make_planet(index: u32, owner: &str, players: u64) -> Planet {
        Planet {
            index,
            name: format!("Planet {}", index),
            current_owner: owner.to_string(),
            enemy_faction: None,
            statistics: PlanetStatistics {
                player_count: players,
                missions_won: 0,
                missions_lost: 0,
            },
            sector: None,
            biome: None,
            hazards: Vec::new(),
            position: None,
        }
    }

    fn make_campaign(planet_index: u32) -> Campaign {
        Campaign {
            id: planet_index as u64,
            planet_index,
            planet_name: String::new(),
            faction: "Terminids".into(),
            progress: 0.4,
            event: None,
        }
    }

    fn snapshot() -> AggregateSnapshot {
        AggregateSnapshot::empty(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap())
    }

    #[test]
    fn test_empty_snapshot_has_all_lists() {
        let snap = snapshot();
        let json = serde_json::to_value(&snap).unwrap();
        for key in [
            "assignments",
            "planets",
            "campaigns",
            "dispatches",
            "steamNews",
            "spaceStations",
        ] {
            assert_eq!(json[key], serde_json::json!([]), "{} should be []", key);
        }
        assert!(json["warStats"].is_null());
    }

    #[test]
    fn test_top_planets_sorted_and_truncated() {
        let mut snap = snapshot();
        snap.planets = vec![
            make_planet(1, "Terminids", 100),
            make_planet(2, "Automaton", 5000),
            make_planet(3, "Humans", 0),
            make_planet(4, "Illuminate", 0),
            make_planet(5, "Terminids", 2500),
        ];

        let top = snap.top_planets(3);
        let indices: Vec<u32> = top.iter().map(|a| a.planet.index).collect();
        assert_eq!(indices, vec![2, 5, 1]);
    }

    #[test]
    fn test_top_planets_keeps_idle_human_planets() {
        let mut snap = snapshot();
        snap.planets = vec![make_planet(3, "Humans", 0), make_planet(4, "Illuminate", 0)];

        let top = snap.top_planets(5);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].planet.index, 3);
    }

    #[test]
    fn test_top_planets_joins_campaign() {
        let mut snap = snapshot();
        snap.planets = vec![make_planet(7, "Terminids", 10), make_planet(8, "Terminids", 5)];
        snap.campaigns = vec![make_campaign(8)];

        let top = snap.top_planets(5);
        assert!(top[0].campaign.is_none());
        assert_eq!(top[1].campaign.map(|c| c.planet_index), Some(8));
    }
}
