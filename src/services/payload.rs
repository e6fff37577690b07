//! Upstream payload schema and shape resolution
//!
//! Every known wire shape is resolved here into one canonical raw form
//! before the normalizers run. Record fields are lenient: a value of the
//! wrong type becomes the field default instead of failing the record.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::debug;

/// Deserialize `T`, falling back to `T::default()` when the value has the wrong shape
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// List payload variants seen upstream
#[derive(Deserialize)]
#[serde(untagged)]
enum ListShape {
    Bare(Vec<Value>),
    Dispatches { dispatches: Vec<Value> },
    NewsItems { newsitems: Vec<Value> },
    AppNews { appnews: AppNews },
}

#[derive(Deserialize)]
struct AppNews {
    newsitems: Vec<Value>,
}

/// Resolve any known list shape into its items; unknown shapes yield nothing
pub fn list_items(payload: &Value) -> Vec<Value> {
    match ListShape::deserialize(payload) {
        Ok(ListShape::Bare(items))
        | Ok(ListShape::Dispatches { dispatches: items })
        | Ok(ListShape::NewsItems { newsitems: items })
        | Ok(ListShape::AppNews {
            appnews: AppNews { newsitems: items },
        }) => items,
        Err(_) => {
            if !payload.is_null() {
                debug!("unrecognised list payload shape, treating as empty");
            }
            Vec::new()
        }
    }
}

/// Decode every item of a list payload; items that are not records are dropped
pub fn records<T: DeserializeOwned>(payload: &Value) -> Vec<T> {
    list_items(payload)
        .into_iter()
        .filter(|item| item.is_object())
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(record) => Some(record),
            Err(e) => {
                debug!(error = %e, "skipping malformed list item");
                None
            }
        })
        .collect()
}

/// Decode a single-record payload; non-records yield `None`
pub fn record<T: DeserializeOwned>(payload: &Value) -> Option<T> {
    if !payload.is_object() {
        return None;
    }
    T::deserialize(payload).ok()
}

/// Parse a timestamp given as epoch seconds (number or numeric string) or RFC 3339
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .and_then(|secs| Utc.timestamp_opt(secs, 0).single()),
        Value::String(s) => {
            let s = s.trim();
            if let Ok(secs) = s.parse::<i64>() {
                return Utc.timestamp_opt(secs, 0).single();
            }
            DateTime::parse_from_rfc3339(s)
                .map(|dt| dt.with_timezone(&Utc))
                .ok()
                .or_else(|| {
                    // Zone-less ISO strings are UTC upstream
                    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
                        .ok()
                        .map(|naive| naive.and_utc())
                })
        }
        _ => None,
    }
}

/// Dispatch type: small integer code or symbolic tag
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawDispatchType {
    Code(i64),
    Tag(String),
}

/// Numeric or textual field (task types, reward types)
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawTag {
    Code(i64),
    Text(String),
}

impl RawTag {
    pub fn to_label(&self) -> String {
        match self {
            RawTag::Code(code) => code.to_string(),
            RawTag::Text(text) => text.clone(),
        }
    }
}

// ========== War summary ==========

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawWarSummary {
    #[serde(default, deserialize_with = "lenient")]
    pub statistics: Option<RawStatistics>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawStatistics {
    #[serde(default, deserialize_with = "lenient")]
    pub missions_won: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub missions_lost: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub mission_success_rate: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub terminid_kills: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub automaton_kills: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub illuminate_kills: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub deaths: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub accuracy: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub time_played: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub player_count: Option<u64>,
}

// ========== Assignments ==========

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAssignment {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub briefing: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub tasks: Vec<RawTask>,
    #[serde(default, deserialize_with = "lenient")]
    pub progress: Vec<f64>,
    #[serde(default, alias = "expiresAt")]
    pub expiration: Value,
    #[serde(default, deserialize_with = "lenient")]
    pub reward: Option<RawReward>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawTask {
    #[serde(rename = "type", default, deserialize_with = "lenient")]
    pub task_type: Option<RawTag>,
    #[serde(default, deserialize_with = "lenient")]
    pub values: Vec<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawReward {
    #[serde(rename = "type", default, deserialize_with = "lenient")]
    pub reward_type: Option<RawTag>,
    #[serde(default, deserialize_with = "lenient")]
    pub amount: Option<u64>,
}

// ========== Planets ==========

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPlanet {
    #[serde(default, deserialize_with = "lenient")]
    pub index: Option<u32>,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub sector: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub biome: Option<RawNamed>,
    #[serde(default, deserialize_with = "lenient")]
    pub hazards: Vec<RawNamed>,
    #[serde(default, deserialize_with = "lenient")]
    pub position: Option<RawPosition>,
    #[serde(default, deserialize_with = "lenient")]
    pub max_health: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub health: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub current_owner: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub event: Option<RawEvent>,
    #[serde(default, deserialize_with = "lenient")]
    pub statistics: Option<RawPlanetStatistics>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawNamed {
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawPosition {
    #[serde(default, deserialize_with = "lenient")]
    pub x: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub y: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPlanetStatistics {
    #[serde(default, deserialize_with = "lenient")]
    pub player_count: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub missions_won: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub missions_lost: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEvent {
    #[serde(default, deserialize_with = "lenient")]
    pub faction: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub health: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub max_health: Option<f64>,
    #[serde(default)]
    pub end_time: Value,
}

// ========== Campaigns ==========

#[derive(Debug, Default, Deserialize)]
pub struct RawCampaign {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub planet: Option<RawPlanet>,
    #[serde(default, deserialize_with = "lenient")]
    pub faction: Option<String>,
}

// ========== Dispatches ==========

#[derive(Debug, Default, Deserialize)]
pub struct RawDispatch {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<u64>,
    #[serde(rename = "type", default, deserialize_with = "lenient")]
    pub dispatch_type: Option<RawDispatchType>,
    #[serde(default, deserialize_with = "lenient")]
    pub message: Option<String>,
    #[serde(default)]
    pub published: Value,
    #[serde(default, deserialize_with = "lenient")]
    pub author: Option<String>,
}

// ========== Steam news ==========

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSteamNews {
    #[serde(default, alias = "gid", deserialize_with = "lenient")]
    pub id: Option<RawTag>,
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub url: Option<String>,
    #[serde(default, alias = "contents", deserialize_with = "lenient")]
    pub content: Option<String>,
    #[serde(default, alias = "date")]
    pub published_at: Value,
    #[serde(default, deserialize_with = "lenient")]
    pub author: Option<String>,
}

// ========== Space stations ==========

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSpaceStation {
    #[serde(default, alias = "id32", deserialize_with = "lenient")]
    pub id: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub planet: Option<RawPlanet>,
    #[serde(default)]
    pub election_end: Value,
}
