//! Per-player and per-team shot statistics.

use serde::{Deserialize, Serialize};

use crate::{
    analytics::{KindTally, percentage},
    state::game::{Player, PointRecord, Position, Team},
};

/// Attributed actions of a single player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    /// Roster identifier.
    pub player_id: String,
    /// Display name.
    pub player_name: String,
    /// Team of the player.
    pub team: Team,
    /// Court position of the player.
    pub position: Position,
    /// Winning shots.
    pub winners: u32,
    /// Unforced errors committed.
    pub unforced_errors: u32,
    /// Errors forced on the opponents.
    pub forced_errors: u32,
    /// All classified actions attributed to the player.
    pub total_actions: u32,
    /// Positive actions over all actions, 0-100.
    pub effectiveness: u32,
}

impl PlayerStats {
    /// Tally the ledger entries attributed to `player`.
    pub fn for_player(history: &[PointRecord], player: &Player) -> Self {
        let tally = KindTally::from_records(
            history
                .iter()
                .filter(|record| record.player_id.as_deref() == Some(player.id.as_str())),
        );

        Self {
            player_id: player.id.clone(),
            player_name: player.name.clone(),
            team: player.team,
            position: player.position,
            winners: tally.winners,
            unforced_errors: tally.unforced_errors,
            forced_errors: tally.forced_errors,
            total_actions: tally.classified(),
            effectiveness: effectiveness(tally.winners, tally.unforced_errors, tally.forced_errors),
        }
    }
}

/// Share of positive actions (winners and forced errors) over all actions, rounded to 0-100.
pub fn effectiveness(winners: u32, unforced_errors: u32, forced_errors: u32) -> u32 {
    let positive = winners + forced_errors;
    percentage(positive, positive + unforced_errors)
}

/// Stats for every roster player, in roster order.
pub fn player_stats(history: &[PointRecord], players: &[Player]) -> Vec<PlayerStats> {
    players
        .iter()
        .map(|player| PlayerStats::for_player(history, player))
        .collect()
}

/// Points and attributed actions of one team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamStats {
    /// Team described.
    pub team: Team,
    /// Every point awarded to the team, attributed or not.
    pub total_points_won: u32,
    /// Winners by the team's players.
    pub total_winners: u32,
    /// Unforced errors by the team's players.
    pub total_unforced_errors: u32,
    /// Forced errors generated by the team's players.
    pub total_forced_errors: u32,
}

/// Stats for both teams, team 1 first.
pub fn team_stats(history: &[PointRecord], players: &[Player]) -> [TeamStats; 2] {
    Team::BOTH.map(|team| {
        let is_member = |id: &str| {
            players
                .iter()
                .any(|player| player.team == team && player.id == id)
        };
        let tally = KindTally::from_records(
            history
                .iter()
                .filter(|record| record.player_id.as_deref().is_some_and(is_member)),
        );

        TeamStats {
            team,
            total_points_won: history.iter().filter(|r| r.won_by == team).count() as u32,
            total_winners: tally.winners,
            total_unforced_errors: tally.unforced_errors,
            total_forced_errors: tally.forced_errors,
        }
    })
}
