//! Canonical war entities produced by the normalizers

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// Sentinel for enum/string fields missing upstream
pub const UNKNOWN: &str = "Unknown";

/// Faction name the upstream API uses for the player side
pub const HUMAN_FACTION: &str = "Humans";

/// Galaxy-wide counters from the war summary
#[derive(Debug, Clone, Serialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct WarStatistics {
    pub missions_won: u64,
    pub missions_lost: u64,
    /// Percentage in `[0, 100]` as reported upstream
    pub mission_success_rate: f64,
    pub terminid_kills: u64,
    pub automaton_kills: u64,
    pub illuminate_kills: u64,
    pub deaths: u64,
    /// Percentage in `[0, 100]` as reported upstream
    pub accuracy: f64,
    /// Seconds
    pub time_played: u64,
    pub player_count: u64,
}

/// One Major Order sub-task
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub task_type: String,
    pub current: f64,
    pub target: f64,
}

impl Task {
    /// `current / target * 100`, clamped to `[0, 100]`
    pub fn percentage(&self) -> f64 {
        percentage(self.current, self.target)
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Reward {
    pub reward_type: String,
    pub amount: u64,
}

/// A Major Order
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: u64,
    pub title: String,
    pub briefing: String,
    pub description: Option<String>,
    pub tasks: Vec<Task>,
    pub progress: f64,
    pub target: f64,
    pub progress_percentage: f64,
    pub expires_at: Option<DateTime<Utc>>,
    pub reward: Option<Reward>,
}

impl Assignment {
    /// Time left before expiry; `None` when no expiry is known.
    /// Already-expired orders yield a zero duration.
    pub fn time_remaining(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.expires_at
            .map(|expiry| (expiry - now).max(Duration::zero()))
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PlanetStatistics {
    pub player_count: u64,
    pub missions_won: u64,
    pub missions_lost: u64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Planet {
    pub index: u32,
    pub name: String,
    pub current_owner: String,
    /// Owner when hostile; absent for human-held planets
    pub enemy_faction: Option<String>,
    pub statistics: PlanetStatistics,
    pub sector: Option<String>,
    pub biome: Option<String>,
    pub hazards: Vec<String>,
    pub position: Option<Position>,
}

/// Defense event attached to a campaign planet
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub faction: String,
    /// `1 - health / maxHealth`, clamped to `[0, 1]`
    pub progress: f64,
    pub end_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: u64,
    pub planet_index: u32,
    pub planet_name: String,
    pub faction: String,
    /// Liberation or defense progress in `[0, 1]`
    pub progress: f64,
    pub event: Option<Event>,
}

/// Closed label set for dispatch types
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
pub enum DispatchKind {
    #[serde(rename = "DISPATCH")]
    Dispatch,
    #[serde(rename = "MAJOR ORDER")]
    MajorOrder,
    #[serde(rename = "TACTICAL")]
    Tactical,
    #[serde(rename = "SUPPLY")]
    Supply,
    #[serde(rename = "INTEL")]
    Intel,
}

impl DispatchKind {
    pub fn label(self) -> &'static str {
        match self {
            DispatchKind::Dispatch => "DISPATCH",
            DispatchKind::MajorOrder => "MAJOR ORDER",
            DispatchKind::Tactical => "TACTICAL",
            DispatchKind::Supply => "SUPPLY",
            DispatchKind::Intel => "INTEL",
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Dispatch {
    pub id: u64,
    pub kind: DispatchKind,
    pub message: String,
    pub published: Option<DateTime<Utc>>,
    pub author: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SteamNewsItem {
    pub id: String,
    pub title: String,
    pub url: String,
    pub contents: String,
    pub published: Option<DateTime<Utc>>,
    pub author: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SpaceStation {
    pub id: u64,
    pub planet_index: u32,
    pub position: Option<Position>,
    pub election_end: Option<DateTime<Utc>>,
}

/// `current / target * 100` clamped to `[0, 100]`; non-positive targets count as 1
pub fn percentage(current: f64, target: f64) -> f64 {
    let target = if target > 0.0 { target } else { 1.0 };
    let pct = current / target * 100.0;
    if pct.is_nan() {
        return 0.0;
    }
    pct.clamp(0.0, 100.0)
}
