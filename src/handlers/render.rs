use crate::models::{Candidate, Comment, StatField};
use crate::voting::ranking::{self, Standing};
use std::collections::HashMap;

pub const TITLE: &str = "🏆 R4 Promotion Voting";
pub const SUBTITLE: &str = "Vote for alliance members to promote to R4 rank";
pub const FOOTER: &str =
    "🏰 Alliance vs Alliance Event Rankings • Vote responsibly: consider power, activity and contribution to the alliance";
pub const ACCENT_COLOUR: u32 = 0xFBBF24;

// Discord embed limits
pub const FIELD_VALUE_LIMIT: usize = 1024;
pub const DESCRIPTION_LIMIT: usize = 4096;

const BAR_WIDTH: usize = 10;

pub struct DashboardView {
    pub description: String,
    pub cards: Vec<(String, String)>,
    pub rankings: String,
}

pub fn dashboard_view(standings: &[Standing<'_>], total_votes: i64) -> DashboardView {
    DashboardView {
        description: format!("{}\n\n**Total Votes Cast: {}**", SUBTITLE, total_votes),
        cards: standings
            .iter()
            .map(|standing| (card_title(standing), clip(&card_body(standing), FIELD_VALUE_LIMIT)))
            .collect(),
        rankings: clip(&rankings_text(standings), FIELD_VALUE_LIMIT),
    }
}

pub fn card_title(standing: &Standing<'_>) -> String {
    let candidate = standing.candidate;
    format!(
        "#{} {} Lv.{} {}{}",
        candidate.rank,
        candidate.country,
        candidate.level,
        candidate.name,
        if standing.is_leader { " 👑" } else { "" }
    )
}

pub fn card_body(standing: &Standing<'_>) -> String {
    let candidate = standing.candidate;
    format!(
        "💪 Power: **{}**\n⚔️ Kills: **{}**\n💀 Deaths: **{}**\n❤️ Likes: **{}**\n🎁 Gift Level: **{}**\n{}\nVotes: **{}** ({:.1}%)",
        candidate.power,
        candidate.kills,
        candidate.deaths,
        candidate.likes,
        candidate.gift_level,
        progress_bar(standing.percentage / 100.0),
        standing.votes,
        standing.percentage
    )
}

pub fn rankings_text(standings: &[Standing<'_>]) -> String {
    standings
        .iter()
        .map(|standing| {
            format!(
                "{} **{}** ({}) · {} votes · {:.1}%",
                standing.medal(),
                standing.candidate.name,
                standing.candidate.power,
                standing.votes,
                standing.percentage
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Text bar for a fraction in `[0, 1]`; partial blocks round down.
pub fn progress_bar(fraction: f64) -> String {
    let fraction = if fraction.is_finite() { fraction.clamp(0.0, 1.0) } else { 0.0 };
    let filled = ((fraction * BAR_WIDTH as f64) + 1e-9).floor() as usize;
    let filled = filled.min(BAR_WIDTH);
    format!("`{}{}`", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

/// One block per stat field: a bar per candidate from the normalized series,
/// labelled with the cleaned magnitude.
pub fn comparison_blocks(candidates: &[Candidate], fields: &[StatField]) -> Vec<(String, String)> {
    let normalized = ranking::normalized_series(candidates, fields);
    let magnitudes: HashMap<(&str, StatField), f64> = ranking::long_form_series(candidates, fields)
        .into_iter()
        .filter_map(|point| {
            candidates
                .iter()
                .find(|c| c.name == point.candidate)
                .map(|c| ((c.name.as_str(), point.field), point.value))
        })
        .collect();

    fields
        .iter()
        .map(|&field| {
            let lines: Vec<String> = candidates
                .iter()
                .map(|candidate| {
                    let fraction = normalized
                        .get(&candidate.name)
                        .and_then(|row| row.get(&field))
                        .copied()
                        .unwrap_or(0.0);
                    let magnitude = magnitudes
                        .get(&(candidate.name.as_str(), field))
                        .map(|value| compact_number(*value))
                        .unwrap_or_else(|| "n/a".to_string());
                    format!("{} {}: {}", progress_bar(fraction), candidate.name, magnitude)
                })
                .collect();
            (field.label().to_string(), clip(&lines.join("\n"), FIELD_VALUE_LIMIT))
        })
        .collect()
}

pub fn compact_number(value: f64) -> String {
    let magnitude = value.abs();
    if magnitude >= 1e6 {
        format!("{:.1}M", value / 1e6)
    } else if magnitude >= 1e3 {
        format!("{:.1}K", value / 1e3)
    } else if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}

pub fn comments_text(candidate_name: &str, comments: &[Comment]) -> String {
    if comments.is_empty() {
        return format!("No comments yet for **{}**.", candidate_name);
    }

    let lines: Vec<String> = comments
        .iter()
        .enumerate()
        .map(|(i, comment)| {
            format!(
                "{}. {} *({})*",
                i + 1,
                comment.text,
                comment.created_at.format("%Y-%m-%d")
            )
        })
        .collect();
    clip(&lines.join("\n"), DESCRIPTION_LIMIT)
}

// Cut at a char boundary, marking the cut with an ellipsis
pub fn clip(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let mut clipped: String = text.chars().take(limit.saturating_sub(1)).collect();
    clipped.push('…');
    clipped
}
