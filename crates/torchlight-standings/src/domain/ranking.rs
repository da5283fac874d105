//! League rank assignment.

use std::cmp::Reverse;
use std::collections::HashMap;

use torchlight_core::model::{LeagueMember, StandingRow};
use uuid::Uuid;

/// Orders members by total descending and numbers them 1..N.
///
/// Every member gets a distinct rank. Equal totals are ordered by
/// `joined_at` (earlier first), then participant id, so a rerun over the
/// same data always yields the same ranks. Members missing from `totals`
/// count as zero.
#[must_use]
pub fn rank_members(members: &[LeagueMember], totals: &HashMap<Uuid, i64>) -> Vec<StandingRow> {
    let mut ordered: Vec<(&LeagueMember, i64)> = members
        .iter()
        .map(|m| (m, totals.get(&m.participant_id).copied().unwrap_or(0)))
        .collect();
    ordered.sort_by_key(|(m, total)| (Reverse(*total), m.joined_at, m.participant_id));

    ordered
        .into_iter()
        .zip(1..)
        .map(|((member, total_points), rank)| StandingRow {
            participant_id: member.participant_id,
            total_points,
            rank,
        })
        .collect()
}
