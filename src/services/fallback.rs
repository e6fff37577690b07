//! Static substitute data for categories whose endpoint rejected
//!
//! Values are fixed; the only input is `now`, which anchors timestamps so
//! substituted dispatches and news still read as current.

use crate::types::{
    Assignment, Campaign, Dispatch, DispatchKind, Planet, PlanetStatistics, Position, Reward,
    SpaceStation, SteamNewsItem, Task, WarStatistics,
};
use chrono::{DateTime, Duration, Utc};

pub fn war_statistics() -> Option<WarStatistics> {
    Some(WarStatistics {
        missions_won: 1_250_000,
        missions_lost: 250_000,
        mission_success_rate: 83.0,
        terminid_kills: 450_000_000,
        automaton_kills: 180_000_000,
        illuminate_kills: 0,
        deaths: 12_000_000,
        accuracy: 68.0,
        time_played: 3_600_000_000,
        player_count: 50_000,
    })
}

pub fn assignments(now: DateTime<Utc>) -> Vec<Assignment> {
    vec![Assignment {
        id: 1,
        title: "MAJOR ORDER".into(),
        briefing: "Liberate the Umlaut sector".into(),
        description: Some("Secure every planet in the sector against the Terminid advance.".into()),
        tasks: vec![Task {
            task_type: "Liberate".into(),
            current: 1.0,
            target: 3.0,
        }],
        progress: 1.0,
        target: 3.0,
        progress_percentage: 100.0 / 3.0,
        expires_at: Some(now + Duration::days(3)),
        reward: Some(Reward {
            reward_type: "Medals".into(),
            amount: 45,
        }),
    }]
}

pub fn planets() -> Vec<Planet> {
    vec![
        planet(0, "Super Earth", "Humans", 0, 0.0, 0.0),
        planet(64, "Meridia", "Terminids", 12_000, 0.12, -0.41),
        planet(126, "Malevelon Creek", "Automaton", 8_000, -0.53, 0.37),
    ]
}

fn planet(index: u32, name: &str, owner: &str, players: u64, x: f64, y: f64) -> Planet {
    Planet {
        index,
        name: name.into(),
        current_owner: owner.into(),
        enemy_faction: super::normalizer::enemy_faction(owner),
        statistics: PlanetStatistics {
            player_count: players,
            missions_won: players / 2,
            missions_lost: players / 10,
        },
        sector: None,
        biome: None,
        hazards: Vec::new(),
        position: Some(Position { x, y }),
    }
}

pub fn campaigns() -> Vec<Campaign> {
    vec![
        Campaign {
            id: 1,
            planet_index: 64,
            planet_name: "Meridia".into(),
            faction: "Terminids".into(),
            progress: 0.45,
            event: None,
        },
        Campaign {
            id: 2,
            planet_index: 126,
            planet_name: "Malevelon Creek".into(),
            faction: "Automaton".into(),
            progress: 0.2,
            event: None,
        },
    ]
}

pub fn dispatches(now: DateTime<Utc>) -> Vec<Dispatch> {
    vec![
        Dispatch {
            id: 1,
            kind: DispatchKind::MajorOrder,
            message: "Helldivers, a new Major Order has been issued. Report to your Destroyer."
                .into(),
            published: Some(now - Duration::hours(2)),
            author: Some("High Command".into()),
        },
        Dispatch {
            id: 2,
            kind: DispatchKind::Tactical,
            message: "Automaton forces are massing near Malevelon Creek.".into(),
            published: Some(now - Duration::hours(8)),
            author: Some("High Command".into()),
        },
    ]
}

pub fn steam_news(now: DateTime<Utc>) -> Vec<SteamNewsItem> {
    vec![SteamNewsItem {
        id: "0".into(),
        title: "Galactic War status temporarily unavailable".into(),
        url: "https://store.steampowered.com/news/app/553850".into(),
        contents: "Live news could not be loaded. Showing placeholder content.".into(),
        published: Some(now - Duration::days(1)),
        author: "Arrowhead".into(),
    }]
}

pub fn space_stations(now: DateTime<Utc>) -> Vec<SpaceStation> {
    vec![SpaceStation {
        id: 749_875_195,
        planet_index: 64,
        position: Some(Position { x: 0.12, y: -0.41 }),
        election_end: Some(now + Duration::hours(12)),
    }]
}
