//! Time-window policies for dispatches and Steam news

use crate::types::{Dispatch, SteamNewsItem};
use chrono::{DateTime, Duration, Utc};
use std::cmp::Ordering;

/// Dispatches older than this are dropped
pub const DISPATCH_WINDOW_HOURS: i64 = 36;

/// News newer than this is "recent"
pub const NEWS_WINDOW_DAYS: i64 = 7;

/// Keep dispatches published strictly after `now - 36h`.
/// Dispatches without a usable timestamp are dropped.
pub fn recent_dispatches(dispatches: Vec<Dispatch>, now: DateTime<Utc>) -> Vec<Dispatch> {
    let cutoff = now - Duration::hours(DISPATCH_WINDOW_HOURS);
    dispatches
        .into_iter()
        .filter(|d| d.published.is_some_and(|t| t > cutoff))
        .collect()
}

/// Newest first. When the newest item falls inside the last 7 days, keep every
/// item inside that window; when the whole feed is stale, keep only the newest.
pub fn recent_news(mut items: Vec<SteamNewsItem>, now: DateTime<Utc>) -> Vec<SteamNewsItem> {
    if items.is_empty() {
        return items;
    }

    // Stable: equal timestamps keep upstream order; undated items sink to the end
    items.sort_by(|a, b| newest_first(a.published, b.published));

    let cutoff = now - Duration::days(NEWS_WINDOW_DAYS);
    let has_recent = items[0].published.is_some_and(|t| t > cutoff);

    if has_recent {
        items.retain(|item| item.published.is_some_and(|t| t > cutoff));
    } else {
        items.truncate(1);
    }
    items
}

fn newest_first(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
