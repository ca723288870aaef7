//! Statistics derived from the match ledgers.
//!
//! Everything here is recomputed from the session on demand; nothing is
//! maintained incrementally.

pub mod distribution;
pub mod flow;
pub mod magia;
pub mod performance;

use serde::{Deserialize, Serialize};

use crate::state::{
    MatchSession,
    game::{PointKind, PointRecord, Position, Team},
    scoring::CompletedSet,
};

use self::{
    distribution::{PointDistribution, TeamPointDistribution},
    flow::{MomentumPoint, StreakInfo},
    magia::{MagiaCounts, TeamMagiaStats},
    performance::{PlayerStats, TeamStats},
};

/// Team/position slots in the order used by summaries and share tokens.
pub const SLOTS: [(Team, Position); 4] = [
    (Team::One, Position::Drive),
    (Team::One, Position::Reves),
    (Team::Two, Position::Drive),
    (Team::Two, Position::Reves),
];

/// `part / whole` as a percentage rounded half up, 0 when `whole` is 0.
pub fn percentage(part: u32, whole: u32) -> u32 {
    if whole == 0 {
        return 0;
    }
    let (part, whole) = (u64::from(part), u64::from(whole));
    ((200 * part + whole) / (2 * whole)) as u32
}

/// Counts of classified points by kind.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct KindTally {
    pub(crate) winners: u32,
    pub(crate) unforced_errors: u32,
    pub(crate) forced_errors: u32,
}

impl KindTally {
    pub(crate) fn from_records<'a>(records: impl Iterator<Item = &'a PointRecord>) -> Self {
        records.fold(Self::default(), |mut tally, record| {
            match record.kind {
                Some(PointKind::Winner) => tally.winners += 1,
                Some(PointKind::UnforcedError) => tally.unforced_errors += 1,
                Some(PointKind::ForcedError) => tally.forced_errors += 1,
                None => {}
            }
            tally
        })
    }

    pub(crate) fn classified(&self) -> u32 {
        self.winners + self.unforced_errors + self.forced_errors
    }
}

/// Player as shown on the results screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryPlayer {
    /// Display name, empty for an unfilled slot.
    pub name: String,
    /// Team of the slot.
    pub team: Team,
    /// Position of the slot.
    pub position: Position,
}

/// Player statistics without roster identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerLine {
    /// Display name.
    pub player_name: String,
    /// Team of the slot.
    pub team: Team,
    /// Position of the slot.
    pub position: Position,
    /// Winning shots.
    pub winners: u32,
    /// Unforced errors committed.
    pub unforced_errors: u32,
    /// Errors forced on the opponents.
    pub forced_errors: u32,
    /// Positive actions over all actions, 0-100.
    pub effectiveness: u32,
}

/// Breaks of serve won by one team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakLine {
    /// Team described.
    pub team: Team,
    /// Games won on the other team's serve.
    pub break_points_won: u32,
}

/// Special shot statistics without roster identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MagiaLine {
    /// Display name.
    pub player_name: String,
    /// Team of the slot.
    pub team: Team,
    /// All shots tagged to the player.
    pub total: u32,
    /// Shots per kind.
    pub by_type: MagiaCounts,
}

/// Everything shown on the results screen, free of ledger detail.
///
/// Player-indexed collections follow [`SLOTS`] order. This is also exactly
/// what a share token carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSummary {
    /// Players per slot.
    pub players: [SummaryPlayer; 4],
    /// Finished sets, oldest first.
    pub completed_sets: Vec<CompletedSet>,
    /// Winner, absent when the match was ended early.
    pub winning_team: Option<Team>,
    /// Attributed actions per slot.
    pub player_stats: [PlayerLine; 4],
    /// Points and actions per team.
    pub team_stats: [TeamStats; 2],
    /// Longest point runs per team.
    pub streaks: [StreakInfo; 2],
    /// Breaks of serve per team.
    pub breaks: [BreakLine; 2],
    /// How points were decided.
    pub distribution: PointDistribution,
    /// How each team's points were won.
    pub team_distribution: Option<[TeamPointDistribution; 2]>,
    /// Special shots per slot, present when any shot was tagged.
    pub magia_players: Option<[MagiaLine; 4]>,
    /// Special shots per team, present when any shot was tagged.
    pub magia_teams: Option<[TeamMagiaStats; 2]>,
    /// Point differential series, present when any point was played.
    pub momentum: Option<Vec<MomentumPoint>>,
}

impl MatchSummary {
    /// Compute the summary of a session.
    pub fn from_session(session: &MatchSession) -> Self {
        let history = &session.history;
        let players = &session.players;

        let slot_players = SLOTS.map(|(team, position)| SummaryPlayer {
            name: session
                .player_at(team, position)
                .map(|player| player.name.clone())
                .unwrap_or_default(),
            team,
            position,
        });

        let player_stats = SLOTS.map(|(team, position)| {
            let stats = session
                .player_at(team, position)
                .map(|player| PlayerStats::for_player(history, player));
            match stats {
                Some(stats) => PlayerLine {
                    player_name: stats.player_name,
                    team,
                    position,
                    winners: stats.winners,
                    unforced_errors: stats.unforced_errors,
                    forced_errors: stats.forced_errors,
                    effectiveness: stats.effectiveness,
                },
                None => PlayerLine {
                    player_name: String::new(),
                    team,
                    position,
                    winners: 0,
                    unforced_errors: 0,
                    forced_errors: 0,
                    effectiveness: 0,
                },
            }
        });

        let breaks = flow::break_points(history, &session.score).map(|info| BreakLine {
            team: info.team,
            break_points_won: info.break_points_won,
        });

        let (magia_players, magia_teams) = if session.magias.is_empty() {
            (None, None)
        } else {
            let per_player = SLOTS.map(|(team, position)| {
                let player = session.player_at(team, position);
                let by_type = magia::count_by_kind(
                    session
                        .magias
                        .iter()
                        .filter(|record| player.is_some_and(|p| p.id == record.player_id)),
                );
                MagiaLine {
                    player_name: player.map(|p| p.name.clone()).unwrap_or_default(),
                    team,
                    total: magia::total_of(&by_type),
                    by_type,
                }
            });
            (
                Some(per_player),
                Some(magia::team_magia_stats(&session.magias, players)),
            )
        };

        Self {
            players: slot_players,
            completed_sets: session.score.completed_sets.to_vec(),
            winning_team: session.winning_team,
            player_stats,
            team_stats: performance::team_stats(history, players),
            streaks: flow::streaks(history),
            breaks,
            distribution: distribution::point_distribution(history),
            team_distribution: Some(distribution::team_point_distribution(history)),
            magia_players,
            magia_teams,
            momentum: (!history.is_empty()).then(|| flow::momentum(history)),
        }
    }
}
