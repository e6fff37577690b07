//! Payload normalization service
//!
//! One total function per entity kind. Each accepts whatever the endpoint
//! returned (already shape-resolved by `payload`) and produces canonical
//! entities: missing numbers become 0, missing lists become empty, missing
//! names and enum tags become `"Unknown"`.

use crate::services::payload::{
    self, parse_timestamp, RawAssignment, RawCampaign, RawDispatch, RawDispatchType, RawEvent,
    RawPlanet, RawPosition, RawSpaceStation, RawSteamNews, RawWarSummary,
};
use crate::types::{
    percentage, Assignment, Campaign, Dispatch, DispatchKind, Event, Planet, PlanetStatistics,
    Position, Reward, SpaceStation, SteamNewsItem, Task, WarStatistics, HUMAN_FACTION, UNKNOWN,
};
use serde_json::Value;

/// War summary; `None` only when the payload is not a record at all
pub fn war_statistics(payload: &Value) -> Option<WarStatistics> {
    let raw: RawWarSummary = payload::record(payload)?;
    let stats = raw.statistics.unwrap_or_default();

    Some(WarStatistics {
        missions_won: stats.missions_won.unwrap_or(0),
        missions_lost: stats.missions_lost.unwrap_or(0),
        mission_success_rate: stats.mission_success_rate.unwrap_or(0.0),
        terminid_kills: stats.terminid_kills.unwrap_or(0),
        automaton_kills: stats.automaton_kills.unwrap_or(0),
        illuminate_kills: stats.illuminate_kills.unwrap_or(0),
        deaths: stats.deaths.unwrap_or(0),
        accuracy: stats.accuracy.unwrap_or(0.0),
        time_played: stats.time_played.unwrap_or(0),
        player_count: stats.player_count.unwrap_or(0),
    })
}

pub fn assignments(payload: &Value) -> Vec<Assignment> {
    payload::records::<RawAssignment>(payload)
        .into_iter()
        .map(assignment)
        .collect()
}

/// Overall progress is `progress[0]` against `tasks[0].values[2]` (target defaults to 1).
fn assignment(raw: RawAssignment) -> Assignment {
    let progress = raw.progress.first().copied().unwrap_or(0.0);
    let target = raw
        .tasks
        .first()
        .and_then(|t| t.values.get(2).copied())
        .filter(|t| *t > 0.0)
        .unwrap_or(1.0);

    let tasks = raw
        .tasks
        .iter()
        .map(|t| Task {
            task_type: t
                .task_type
                .as_ref()
                .map(|tag| tag.to_label())
                .unwrap_or_else(|| UNKNOWN.to_string()),
            current: t.values.first().copied().unwrap_or(0.0),
            target: t.values.get(1).copied().filter(|v| *v > 0.0).unwrap_or(1.0),
        })
        .collect();

    let reward = raw.reward.map(|r| Reward {
        reward_type: r
            .reward_type
            .map(|tag| tag.to_label())
            .unwrap_or_else(|| UNKNOWN.to_string()),
        amount: r.amount.unwrap_or(0),
    });

    let title = raw.title.unwrap_or_else(|| UNKNOWN.to_string());
    let briefing = raw.briefing.unwrap_or_else(|| title.clone());

    Assignment {
        id: raw.id.unwrap_or(0),
        title,
        briefing,
        description: raw.description.filter(|d| !d.trim().is_empty()),
        tasks,
        progress,
        target,
        progress_percentage: percentage(progress, target),
        expires_at: parse_timestamp(&raw.expiration),
        reward,
    }
}

pub fn planets(payload: &Value) -> Vec<Planet> {
    payload::records::<RawPlanet>(payload)
        .into_iter()
        .map(planet)
        .collect()
}

fn planet(raw: RawPlanet) -> Planet {
    let current_owner = raw.current_owner.unwrap_or_else(|| UNKNOWN.to_string());
    let stats = raw.statistics.unwrap_or_default();

    Planet {
        index: raw.index.unwrap_or(0),
        name: raw.name.unwrap_or_else(|| UNKNOWN.to_string()),
        enemy_faction: enemy_faction(&current_owner),
        current_owner,
        statistics: PlanetStatistics {
            player_count: stats.player_count.unwrap_or(0),
            missions_won: stats.missions_won.unwrap_or(0),
            missions_lost: stats.missions_lost.unwrap_or(0),
        },
        sector: raw.sector,
        biome: raw.biome.and_then(|b| b.name),
        hazards: raw.hazards.into_iter().filter_map(|h| h.name).collect(),
        position: raw.position.map(position),
    }
}

/// The owning faction unless it is the player side
pub fn enemy_faction(current_owner: &str) -> Option<String> {
    if current_owner == HUMAN_FACTION {
        None
    } else {
        Some(current_owner.to_string())
    }
}

fn position(raw: RawPosition) -> Position {
    Position {
        x: raw.x.unwrap_or(0.0),
        y: raw.y.unwrap_or(0.0),
    }
}

pub fn campaigns(payload: &Value) -> Vec<Campaign> {
    payload::records::<RawCampaign>(payload)
        .into_iter()
        .map(campaign)
        .collect()
}

/// Progress is the event's progress when one is running, else the planet's liberation.
fn campaign(raw: RawCampaign) -> Campaign {
    let planet = raw.planet.unwrap_or_default();
    let event = planet.event.map(event);
    let progress = match &event {
        Some(e) => e.progress,
        None => depletion(planet.health, planet.max_health),
    };

    Campaign {
        id: raw.id.unwrap_or(0),
        planet_index: planet.index.unwrap_or(0),
        planet_name: planet.name.unwrap_or_else(|| UNKNOWN.to_string()),
        faction: raw
            .faction
            .or(planet.current_owner)
            .unwrap_or_else(|| UNKNOWN.to_string()),
        progress,
        event,
    }
}

fn event(raw: RawEvent) -> Event {
    Event {
        faction: raw.faction.unwrap_or_else(|| UNKNOWN.to_string()),
        progress: depletion(raw.health, raw.max_health),
        end_time: parse_timestamp(&raw.end_time),
    }
}

/// `1 - health / max_health` clamped to `[0, 1]`; unknown or zero max yields 0
pub fn depletion(health: Option<f64>, max_health: Option<f64>) -> f64 {
    match (health, max_health) {
        (Some(health), Some(max)) if max > 0.0 => (1.0 - health / max).clamp(0.0, 1.0),
        (None, Some(max)) if max > 0.0 => 1.0,
        _ => 0.0,
    }
}

pub fn dispatches(payload: &Value) -> Vec<Dispatch> {
    payload::records::<RawDispatch>(payload)
        .into_iter()
        .map(|raw| Dispatch {
            id: raw.id.unwrap_or(0),
            kind: raw
                .dispatch_type
                .as_ref()
                .map(dispatch_kind)
                .unwrap_or(DispatchKind::Dispatch),
            message: raw.message.unwrap_or_else(|| UNKNOWN.to_string()),
            published: parse_timestamp(&raw.published),
            author: raw.author.filter(|a| !a.trim().is_empty()),
        })
        .collect()
}

/// Map numeric codes and symbolic tags onto one label set; unknown values are `Dispatch`.
pub fn dispatch_kind(raw: &RawDispatchType) -> DispatchKind {
    match raw {
        RawDispatchType::Code(1) => DispatchKind::MajorOrder,
        RawDispatchType::Code(2) => DispatchKind::Tactical,
        RawDispatchType::Code(_) => DispatchKind::Dispatch,
        RawDispatchType::Tag(tag) => match tag.as_str() {
            "MAJOR_ORDER" => DispatchKind::MajorOrder,
            "TACTICAL_UPDATE" => DispatchKind::Tactical,
            "SUPPLY_DROP" => DispatchKind::Supply,
            "INTELLIGENCE" => DispatchKind::Intel,
            _ => DispatchKind::Dispatch,
        },
    }
}

pub fn steam_news(payload: &Value) -> Vec<SteamNewsItem> {
    payload::records::<RawSteamNews>(payload)
        .into_iter()
        .map(|raw: RawSteamNews| SteamNewsItem {
            id: raw
                .id
                .map(|id| id.to_label())
                .unwrap_or_else(|| UNKNOWN.to_string()),
            title: raw.title.unwrap_or_else(|| UNKNOWN.to_string()),
            url: raw.url.unwrap_or_else(|| UNKNOWN.to_string()),
            contents: raw.content.unwrap_or_else(|| UNKNOWN.to_string()),
            published: parse_timestamp(&raw.published_at),
            author: raw.author.unwrap_or_else(|| UNKNOWN.to_string()),
        })
        .collect()
}

pub fn space_stations(payload: &Value) -> Vec<SpaceStation> {
    payload::records::<RawSpaceStation>(payload)
        .into_iter()
        .map(|raw: RawSpaceStation| {
            let planet = raw.planet.unwrap_or_default();
            SpaceStation {
                id: raw.id.unwrap_or(0),
                planet_index: planet.index.unwrap_or(0),
                position: planet.position.map(position),
                election_end: parse_timestamp(&raw.election_end),
            }
        })
        .collect()
}
