//! Teams, players, match rules and ledger records.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::state::scoring::ScoreSnapshot;

/// One of the two sides of a doubles match.
///
/// Serialized as the bare numbers `1` and `2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Team {
    /// Team 1, serving first.
    One,
    /// Team 2.
    Two,
}

/// Raised when a numeric team reference is neither `1` nor `2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid team `{0}`: expected 1 or 2")]
pub struct InvalidTeam(pub u8);

impl Team {
    /// Both teams in scoreboard order.
    pub const BOTH: [Team; 2] = [Team::One, Team::Two];

    /// The opposing team.
    pub fn other(self) -> Self {
        match self {
            Team::One => Team::Two,
            Team::Two => Team::One,
        }
    }

    /// Index into the `[team1, team2]` pairs used throughout the scoreboard.
    pub fn index(self) -> usize {
        match self {
            Team::One => 0,
            Team::Two => 1,
        }
    }

    /// Numeric label (`1` or `2`).
    pub fn number(self) -> u8 {
        self.into()
    }
}

impl From<Team> for u8 {
    fn from(value: Team) -> Self {
        match value {
            Team::One => 1,
            Team::Two => 2,
        }
    }
}

impl TryFrom<u8> for Team {
    type Error = InvalidTeam;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Team::One),
            2 => Ok(Team::Two),
            other => Err(InvalidTeam(other)),
        }
    }
}

/// Court side a player covers within their team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    /// Forehand side.
    Drive,
    /// Backhand side.
    Reves,
}

/// How a game is resolved once both teams reach 40.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeuceMode {
    /// The next point at 40-40 decides the game.
    #[default]
    GoldenPoint,
    /// A two point lead is required after 40-40.
    Advantage,
    /// Advantage is played until the game returns to deuce twice, then the next point decides.
    StarPoint,
}

/// Rules fixed for the lifetime of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Games required to win a set (with a two game lead).
    pub games_per_set: u32,
    /// Best-of-N sets.
    pub number_of_sets: u32,
    /// Deuce resolution rule.
    pub deuce_mode: DeuceMode,
    /// Whether a tiebreak is played when both teams reach `games_per_set`.
    pub tiebreak_enabled: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            games_per_set: 4,
            number_of_sets: 1,
            deuce_mode: DeuceMode::GoldenPoint,
            tiebreak_enabled: true,
        }
    }
}

impl MatchConfig {
    /// Number of sets a team must take to win the match.
    pub fn sets_to_win(&self) -> u32 {
        self.number_of_sets.div_ceil(2)
    }

    /// A configuration the scoring engine can make progress with.
    pub fn is_playable(&self) -> bool {
        self.games_per_set > 0 && self.number_of_sets > 0
    }
}

/// Participant fixed at match initialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Identifier referenced by point and magia records.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Side the player belongs to.
    pub team: Team,
    /// Court position within the team.
    pub position: Position,
}

/// Check that a roster has four players with unique ids and one player per team/position slot.
pub fn is_valid_roster(players: &[Player]) -> bool {
    if players.len() != 4 {
        return false;
    }

    let ids = players.iter().map(|p| p.id.as_str()).collect::<HashSet<_>>();
    let slots = players
        .iter()
        .map(|p| (p.team, p.position))
        .collect::<HashSet<_>>();

    ids.len() == 4 && slots.len() == 4
}

/// How a classified point ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PointKind {
    /// Outright winning shot by the acting player.
    Winner,
    /// Mistake by the acting player; the point goes to the opponents.
    UnforcedError,
    /// The acting player forced the opponents into an error.
    ForcedError,
}

impl PointKind {
    /// Team credited with the point when `actor_team` performed the action.
    pub fn scoring_team(self, actor_team: Team) -> Team {
        match self {
            PointKind::UnforcedError => actor_team.other(),
            PointKind::Winner | PointKind::ForcedError => actor_team,
        }
    }
}

/// Notable shot tagged independently of the point outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MagiaKind {
    /// Smash sent out over the fence for three.
    X3,
    /// Smash sent out over the side wall for four.
    X4,
    /// Drop shot.
    Dejada,
    /// Lob that dies after the bounce.
    Dormilona,
    /// Sliced overhead.
    Vibora,
    /// Point played from outside the court.
    SalidaDePista,
}

impl MagiaKind {
    /// Canonical ordering used by statistics and the share token.
    pub const ALL: [MagiaKind; 6] = [
        MagiaKind::X3,
        MagiaKind::X4,
        MagiaKind::Dejada,
        MagiaKind::Dormilona,
        MagiaKind::Vibora,
        MagiaKind::SalidaDePista,
    ];
}

/// Ledger entry for one point, carrying the scoreboard as it was before the point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointRecord {
    /// Session scoped identifier (`point-N`).
    pub id: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp_ms: u64,
    /// Classification, absent for quick points.
    pub kind: Option<PointKind>,
    /// Acting player, absent for quick points.
    pub player_id: Option<String>,
    /// Team awarded the point.
    pub won_by: Team,
    /// Scoreboard immediately before the point, restored verbatim on undo.
    pub score_before: ScoreSnapshot,
}

/// Ledger entry for a special shot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MagiaRecord {
    /// Session scoped identifier (`magia-N`).
    pub id: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp_ms: u64,
    /// Shot that was tagged.
    pub kind: MagiaKind,
    /// Player who played the shot.
    pub player_id: String,
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn roster() -> Vec<Player> {
        vec![
            player("a", "Ana", Team::One, Position::Drive),
            player("b", "Bea", Team::One, Position::Reves),
            player("c", "Carla", Team::Two, Position::Drive),
            player("d", "Dani", Team::Two, Position::Reves),
        ]
    }

    fn player(id: &str, name: &str, team: Team, position: Position) -> Player {
        Player {
            id: id.into(),
            name: name.into(),
            team,
            position,
        }
    }

    #[test]
    fn team_serializes_as_number() {
        assert_eq!(serde_json::to_string(&Team::Two).unwrap(), "2");
        assert_eq!(serde_json::from_str::<Team>("1").unwrap(), Team::One);
        assert!(serde_json::from_str::<Team>("3").is_err());
    }

    #[test]
    fn kinds_use_kebab_case() {
        assert_eq!(
            serde_json::to_string(&PointKind::UnforcedError).unwrap(),
            "\"unforced-error\""
        );
        assert_eq!(
            serde_json::to_string(&MagiaKind::SalidaDePista).unwrap(),
            "\"salida-de-pista\""
        );
        assert_eq!(serde_json::to_string(&MagiaKind::X3).unwrap(), "\"x3\"");
        assert_eq!(
            serde_json::to_string(&DeuceMode::StarPoint).unwrap(),
            "\"star-point\""
        );
    }

    #[test]
    fn unforced_error_credits_the_opponents() {
        assert_eq!(PointKind::UnforcedError.scoring_team(Team::One), Team::Two);
        assert_eq!(PointKind::Winner.scoring_team(Team::One), Team::One);
        assert_eq!(PointKind::ForcedError.scoring_team(Team::Two), Team::Two);
    }

    #[test]
    fn sets_to_win_rounds_up() {
        let mut config = MatchConfig::default();
        assert_eq!(config.sets_to_win(), 1);
        config.number_of_sets = 3;
        assert_eq!(config.sets_to_win(), 2);
        config.number_of_sets = 5;
        assert_eq!(config.sets_to_win(), 3);
    }

    #[test]
    fn roster_requires_one_player_per_slot() {
        assert!(is_valid_roster(&roster()));

        let mut duplicated_slot = roster();
        duplicated_slot[1].position = Position::Drive;
        assert!(!is_valid_roster(&duplicated_slot));

        let mut duplicated_id = roster();
        duplicated_id[3].id = "a".into();
        assert!(!is_valid_roster(&duplicated_id));

        assert!(!is_valid_roster(&roster()[..3]));
    }
}
