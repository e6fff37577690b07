//! Plain-text rendering of a snapshot for the terminal

use std::fmt::Write;

use chrono::Duration;

use warstatus::types::{AggregateSnapshot, Assignment};

const TOP_PLANETS: usize = 5;
const MESSAGE_WIDTH: usize = 72;

/// Render the snapshot as a multi-section text report
pub fn render(snapshot: &AggregateSnapshot) -> String {
    let mut out = String::new();
    // Writing into a String never fails
    let _ = write_report(&mut out, snapshot);
    out
}

fn write_report(out: &mut String, snapshot: &AggregateSnapshot) -> std::fmt::Result {
    let now = snapshot.last_updated;
    writeln!(out, "War status @ {}", now.format("%Y-%m-%d %H:%M:%S UTC"))?;

    if let Some(stats) = &snapshot.war_stats {
        writeln!(out)?;
        writeln!(
            out,
            "  Players online   {}",
            format_number(stats.player_count)
        )?;
        writeln!(
            out,
            "  Missions         {} won / {} lost ({:.1}%)",
            format_number(stats.missions_won),
            format_number(stats.missions_lost),
            stats.mission_success_rate
        )?;
        writeln!(
            out,
            "  Kills            {} terminid / {} automaton / {} illuminate",
            format_number(stats.terminid_kills),
            format_number(stats.automaton_kills),
            format_number(stats.illuminate_kills)
        )?;
        writeln!(
            out,
            "  Deaths           {} (accuracy {:.0}%)",
            format_number(stats.deaths),
            stats.accuracy
        )?;
    }

    if !snapshot.assignments.is_empty() {
        writeln!(out, "\nMajor orders")?;
        for order in &snapshot.assignments {
            write_assignment(out, order, now)?;
        }
    }

    let top = snapshot.top_planets(TOP_PLANETS);
    if !top.is_empty() {
        writeln!(out, "\nActive planets")?;
        for entry in top {
            let progress = entry
                .campaign
                .map(|c| format!("{:>5.1}% vs {}", c.progress * 100.0, c.faction))
                .unwrap_or_default();
            writeln!(
                out,
                "  {:<20} {:>8} players  {}",
                truncate_str(&entry.planet.name, 20),
                format_number(entry.planet.statistics.player_count),
                progress
            )?;
        }
    }

    if !snapshot.dispatches.is_empty() {
        writeln!(out, "\nDispatches")?;
        for dispatch in &snapshot.dispatches {
            writeln!(
                out,
                "  [{}] {}",
                dispatch.kind.label(),
                truncate_str(first_line(&dispatch.message), MESSAGE_WIDTH)
            )?;
        }
    }

    if !snapshot.steam_news.is_empty() {
        writeln!(out, "\nNews")?;
        for item in &snapshot.steam_news {
            let date = item
                .published
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "----------".to_string());
            writeln!(out, "  {}  {}", date, truncate_str(&item.title, MESSAGE_WIDTH))?;
        }
    }

    Ok(())
}

fn write_assignment(
    out: &mut String,
    order: &Assignment,
    now: chrono::DateTime<chrono::Utc>,
) -> std::fmt::Result {
    let remaining = order
        .time_remaining(now)
        .map(format_remaining)
        .unwrap_or_else(|| "no expiry".to_string());
    writeln!(
        out,
        "  {} {} {:.1}%  ({})",
        truncate_str(&order.title, 32),
        format_percentage_bar(order.progress_percentage, 20),
        order.progress_percentage,
        remaining
    )?;
    for task in &order.tasks {
        writeln!(
            out,
            "    - {:<16} {} {:.1}%",
            truncate_str(&task.task_type, 16),
            format_percentage_bar(task.percentage(), 10),
            task.percentage()
        )?;
    }
    Ok(())
}

/// Format a number with thousand separators (e.g., 1234567 -> "1,234,567")
fn format_number(n: u64) -> String {
    let s = n.to_string();
    let len = s.len();
    let mut result = String::with_capacity(len + len / 3);

    for (i, ch) in s.bytes().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            result.push(',');
        }
        result.push(ch as char);
    }

    result
}

/// Example: 50.0% with width 10 → "█████░░░░░"
fn format_percentage_bar(percent: f64, width: usize) -> String {
    let filled = (((percent / 100.0) * width as f64).round() as usize).min(width);
    let empty = width - filled;
    format!("{}{}", "█".repeat(filled), "░".repeat(empty))
}

fn format_remaining(left: Duration) -> String {
    let secs = left.num_seconds().max(0);
    let days = secs / 86_400;
    let hours = (secs % 86_400) / 3600;
    let mins = (secs % 3600) / 60;

    if days > 0 {
        format!("{}d {:02}h left", days, hours)
    } else if hours > 0 {
        format!("{}h {:02}m left", hours, mins)
    } else {
        format!("{}m left", mins)
    }
}

fn first_line(s: &str) -> &str {
    s.lines().find(|l| !l.trim().is_empty()).unwrap_or("").trim()
}

/// Truncate a string to max chars, appending "…" if truncated
fn truncate_str(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        format!(
            "{}…",
            s.chars()
                .take(max_chars.saturating_sub(1))
                .collect::<String>()
        )
    }
}
