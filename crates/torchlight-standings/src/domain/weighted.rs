//! Cross-league weighted ranking.
//!
//! A participant's average league total is blended with the season mean in
//! proportion to how many leagues back it up, so one lucky league cannot top
//! the leaderboard. The one, two and three league confidences are fixed
//! values the leaderboard has always used; from four leagues on the general
//! `1 - 1/(n+1)` curve applies.

use std::collections::BTreeMap;

use serde::Serialize;
use torchlight_core::model::MemberTotal;
use uuid::Uuid;

/// Confidence for a participant in exactly one league.
pub const ONE_LEAGUE_CONFIDENCE: f64 = 0.33;
/// Confidence for a participant in exactly two leagues.
pub const TWO_LEAGUE_CONFIDENCE: f64 = 0.55;
/// Confidence for a participant in exactly three leagues.
pub const THREE_LEAGUE_CONFIDENCE: f64 = 0.70;
/// Season mean used when the season has no league members yet.
pub const EMPTY_SEASON_MEAN: f64 = 0.0;

/// One participant's leaderboard entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightedRanking {
    /// Leaderboard position, starting at 1.
    pub position: usize,
    /// Participant identifier.
    pub participant_id: Uuid,
    /// Number of leagues the participant plays in this season.
    pub league_count: usize,
    /// Mean of the participant's league totals.
    pub raw_average: f64,
    /// Weight given to `raw_average`.
    pub confidence: f64,
    /// `raw_average * confidence + global_mean * (1 - confidence)`.
    pub weighted_score: f64,
}

/// The full leaderboard for a season.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Leaderboard {
    /// Mean of every league member total in the season.
    pub global_mean: f64,
    /// Entries ordered by `weighted_score` descending.
    pub rankings: Vec<WeightedRanking>,
}

/// Confidence assigned to a participant with `league_count` leagues.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn confidence(league_count: usize) -> f64 {
    match league_count {
        0 => 0.0,
        1 => ONE_LEAGUE_CONFIDENCE,
        2 => TWO_LEAGUE_CONFIDENCE,
        3 => THREE_LEAGUE_CONFIDENCE,
        n => 1.0 - 1.0 / (n as f64 + 1.0),
    }
}

/// Blends a raw average with the season mean.
#[must_use]
pub fn shrink(raw_average: f64, confidence: f64, global_mean: f64) -> f64 {
    raw_average * confidence + global_mean * (1.0 - confidence)
}

#[allow(clippy::cast_precision_loss)]
fn mean(values: &[i64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().map(|v| *v as f64).sum::<f64>() / values.len() as f64)
}

/// Computes the leaderboard from every league member total of a season.
#[must_use]
pub fn build_leaderboard(totals: &[MemberTotal]) -> Leaderboard {
    let all: Vec<i64> = totals.iter().map(|t| t.total_points).collect();
    let global_mean = mean(&all).unwrap_or(EMPTY_SEASON_MEAN);

    let mut by_participant: BTreeMap<Uuid, Vec<i64>> = BTreeMap::new();
    for total in totals {
        by_participant
            .entry(total.participant_id)
            .or_default()
            .push(total.total_points);
    }

    let mut rankings: Vec<WeightedRanking> = by_participant
        .into_iter()
        .filter_map(|(participant_id, league_totals)| {
            let raw_average = mean(&league_totals)?;
            let confidence = confidence(league_totals.len());
            Some(WeightedRanking {
                position: 0,
                participant_id,
                league_count: league_totals.len(),
                raw_average,
                confidence,
                weighted_score: shrink(raw_average, confidence, global_mean),
            })
        })
        .collect();

    // Stable sort keeps participant-id order among equal scores.
    rankings.sort_by(|a, b| b.weighted_score.total_cmp(&a.weighted_score));
    for (index, ranking) in rankings.iter_mut().enumerate() {
        ranking.position = index + 1;
    }

    Leaderboard {
        global_mean,
        rankings,
    }
}
