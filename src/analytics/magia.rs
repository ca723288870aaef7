//! Special shot counts.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::state::game::{MagiaKind, MagiaRecord, Player, Team};

/// Special shot counts keyed by kind, always holding every kind in [`MagiaKind::ALL`] order.
pub type MagiaCounts = IndexMap<MagiaKind, u32>;

/// Tally records per kind, listing every kind.
pub(crate) fn count_by_kind<'a>(records: impl Iterator<Item = &'a MagiaRecord>) -> MagiaCounts {
    let mut counts: MagiaCounts = MagiaKind::ALL.into_iter().map(|kind| (kind, 0)).collect();
    for record in records {
        *counts.entry(record.kind).or_default() += 1;
    }
    counts
}

/// Sum of all kinds, saturating.
pub(crate) fn total_of(counts: &MagiaCounts) -> u32 {
    counts.values().fold(0u32, |sum, count| sum.saturating_add(*count))
}

/// Special shots tagged to one player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerMagiaStats {
    /// Roster identifier.
    pub player_id: String,
    /// Display name.
    pub player_name: String,
    /// Team of the player.
    pub team: Team,
    /// All shots tagged to the player.
    pub total: u32,
    /// Shots per kind.
    pub by_type: MagiaCounts,
}

/// Special shot stats for every roster player, in roster order.
pub fn player_magia_stats(magias: &[MagiaRecord], players: &[Player]) -> Vec<PlayerMagiaStats> {
    players
        .iter()
        .map(|player| {
            let by_type = count_by_kind(magias.iter().filter(|m| m.player_id == player.id));
            PlayerMagiaStats {
                player_id: player.id.clone(),
                player_name: player.name.clone(),
                team: player.team,
                total: total_of(&by_type),
                by_type,
            }
        })
        .collect()
}

/// Special shots of one team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMagiaStats {
    /// Team described.
    pub team: Team,
    /// All shots tagged to the team's players.
    pub total: u32,
    /// Shots per kind.
    pub by_type: MagiaCounts,
}

impl TeamMagiaStats {
    /// Build team stats from per-kind counts.
    pub fn from_counts(team: Team, by_type: MagiaCounts) -> Self {
        Self {
            team,
            total: total_of(&by_type),
            by_type,
        }
    }
}

/// Special shot stats for both teams, team 1 first.
pub fn team_magia_stats(magias: &[MagiaRecord], players: &[Player]) -> [TeamMagiaStats; 2] {
    Team::BOTH.map(|team| {
        let on_team = |record: &&MagiaRecord| {
            players
                .iter()
                .any(|player| player.team == team && player.id == record.player_id)
        };
        TeamMagiaStats::from_counts(team, count_by_kind(magias.iter().filter(on_team)))
    })
}
