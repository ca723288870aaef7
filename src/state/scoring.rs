//! Scoreboard snapshot and the pure point-by-point scoring rules.
//!
//! [`advance`] never mutates its input: it returns a fresh snapshot. Completed
//! sets live behind an [`Arc`] so snapshots kept in the point ledger share the
//! set history with the live scoreboard until a new set is appended.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::state::game::{DeuceMode, MatchConfig, Team};

/// Points a team needs to take a tiebreak (with a two point lead).
pub const TIEBREAK_MIN_POINTS: u32 = 7;
/// Returns to deuce after which star-point mode plays a deciding point.
pub const STAR_POINT_DEUCE_RESETS: u32 = 2;

/// Regular game point value, serialized as `0`, `15`, `30` or `40`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum GamePoint {
    #[default]
    /// 0
    Love,
    /// 15
    Fifteen,
    /// 30
    Thirty,
    /// 40
    Forty,
}

/// Raised when deserializing a point value other than 0/15/30/40.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid game point `{0}`: expected 0, 15, 30 or 40")]
pub struct InvalidGamePoint(pub u8);

impl GamePoint {
    /// Value shown on the scoreboard.
    pub fn value(self) -> u8 {
        self.into()
    }

    /// Next value for the scoring team. 40 is handled by the game rules.
    fn next(self) -> Self {
        match self {
            GamePoint::Love => GamePoint::Fifteen,
            GamePoint::Fifteen => GamePoint::Thirty,
            GamePoint::Thirty | GamePoint::Forty => GamePoint::Forty,
        }
    }
}

impl From<GamePoint> for u8 {
    fn from(value: GamePoint) -> Self {
        match value {
            GamePoint::Love => 0,
            GamePoint::Fifteen => 15,
            GamePoint::Thirty => 30,
            GamePoint::Forty => 40,
        }
    }
}

impl TryFrom<u8> for GamePoint {
    type Error = InvalidGamePoint;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(GamePoint::Love),
            15 => Ok(GamePoint::Fifteen),
            30 => Ok(GamePoint::Thirty),
            40 => Ok(GamePoint::Forty),
            other => Err(InvalidGamePoint(other)),
        }
    }
}

/// Final score of a finished set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedSet {
    /// Games per team; the tiebreak winner is recorded with `games_per_set + 1`.
    pub games: [u32; 2],
    /// Whether the set was decided by a tiebreak.
    pub tiebreak_played: bool,
    /// Tiebreak points per team when one was played.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tiebreak_score: Option<[u32; 2]>,
}

/// Complete scoreboard at one instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSnapshot {
    /// Sets won per team.
    pub sets: [u32; 2],
    /// Games won per team in the current set.
    pub games: [u32; 2],
    /// Regular game points per team. Meaningless while `is_tiebreak` is set.
    pub points: [GamePoint; 2],
    /// Team holding advantage at deuce, if any.
    pub advantage: Option<Team>,
    /// Times the current game returned to deuce after an advantage was lost.
    #[serde(default)]
    pub deuce_resets: u32,
    /// Whether the current set is in a tiebreak.
    pub is_tiebreak: bool,
    /// Raw tiebreak points per team. Only meaningful while `is_tiebreak` is set.
    pub tiebreak_points: [u32; 2],
    /// Sets already decided, oldest first.
    pub completed_sets: Arc<Vec<CompletedSet>>,
    /// Zero based index of the set in progress.
    pub current_set_index: u32,
    /// Team currently serving.
    pub serving_team: Team,
}

impl Default for ScoreSnapshot {
    fn default() -> Self {
        Self {
            sets: [0, 0],
            games: [0, 0],
            points: [GamePoint::Love; 2],
            advantage: None,
            deuce_resets: 0,
            is_tiebreak: false,
            tiebreak_points: [0, 0],
            completed_sets: Arc::new(Vec::new()),
            current_set_index: 0,
            serving_team: Team::One,
        }
    }
}

/// Result of applying one point to a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advance {
    /// Scoreboard after the point.
    pub snapshot: ScoreSnapshot,
    /// Whether the point ended the match.
    pub match_over: bool,
    /// Winner of the match when `match_over` is set.
    pub winner: Option<Team>,
}

/// Apply one point won by `won_by` to `score` under `config`.
pub fn advance(score: &ScoreSnapshot, config: &MatchConfig, won_by: Team) -> Advance {
    let mut snapshot = score.clone();
    let winner = if snapshot.is_tiebreak {
        snapshot.tiebreak_point(config, won_by)
    } else {
        snapshot.regular_point(config, won_by)
    };

    Advance {
        snapshot,
        match_over: winner.is_some(),
        winner,
    }
}

impl ScoreSnapshot {
    /// Games played so far across the whole match, including completed sets.
    pub fn total_games(&self) -> u32 {
        let finished: u32 = self
            .completed_sets
            .iter()
            .map(|set| set.games[0] + set.games[1])
            .sum();
        finished + self.games[0] + self.games[1]
    }

    /// Point labels as shown on a scoreboard, team 1 first.
    pub fn point_display(&self) -> [String; 2] {
        if self.is_tiebreak {
            return self.tiebreak_points.map(|points| points.to_string());
        }

        match (self.points, self.advantage) {
            ([GamePoint::Forty, GamePoint::Forty], Some(Team::One)) => ["Ad".into(), "40".into()],
            ([GamePoint::Forty, GamePoint::Forty], Some(Team::Two)) => ["40".into(), "Ad".into()],
            (points, _) => points.map(|point| point.value().to_string()),
        }
    }

    fn regular_point(&mut self, config: &MatchConfig, won_by: Team) -> Option<Team> {
        let scorer = won_by.index();
        let opponent = won_by.other().index();

        match (self.points[scorer], self.points[opponent]) {
            (GamePoint::Forty, GamePoint::Forty) => self.deuce_point(config, won_by),
            (GamePoint::Forty, _) => self.win_game(config, won_by),
            (current, _) => {
                self.points[scorer] = current.next();
                None
            }
        }
    }

    fn deuce_point(&mut self, config: &MatchConfig, won_by: Team) -> Option<Team> {
        let deciding = match config.deuce_mode {
            DeuceMode::GoldenPoint => true,
            DeuceMode::Advantage => false,
            DeuceMode::StarPoint => self.deuce_resets >= STAR_POINT_DEUCE_RESETS,
        };

        if deciding || self.advantage == Some(won_by) {
            return self.win_game(config, won_by);
        }

        if self.advantage.take().is_some() {
            self.deuce_resets += 1;
        } else {
            self.advantage = Some(won_by);
        }
        None
    }

    fn win_game(&mut self, config: &MatchConfig, won_by: Team) -> Option<Team> {
        self.points = [GamePoint::Love; 2];
        self.advantage = None;
        self.deuce_resets = 0;
        self.games[won_by.index()] += 1;
        self.serving_team = self.serving_team.other();

        if let Some(set_winner) = self.set_winner(config) {
            return self.win_set(config, set_winner);
        }

        let target = config.games_per_set;
        if config.tiebreak_enabled && self.games == [target, target] {
            self.is_tiebreak = true;
            self.tiebreak_points = [0, 0];
        }

        None
    }

    fn set_winner(&self, config: &MatchConfig) -> Option<Team> {
        Team::BOTH.into_iter().find(|team| {
            let mine = self.games[team.index()];
            let theirs = self.games[team.other().index()];
            mine >= config.games_per_set && mine >= theirs + 2
        })
    }

    fn win_set(&mut self, config: &MatchConfig, won_by: Team) -> Option<Team> {
        let finished = CompletedSet {
            games: self.games,
            tiebreak_played: self.is_tiebreak,
            tiebreak_score: self.is_tiebreak.then_some(self.tiebreak_points),
        };
        Arc::make_mut(&mut self.completed_sets).push(finished);

        let index = won_by.index();
        self.sets[index] += 1;
        if self.sets[index] >= config.sets_to_win() {
            return Some(won_by);
        }

        self.games = [0, 0];
        self.points = [GamePoint::Love; 2];
        self.advantage = None;
        self.deuce_resets = 0;
        self.is_tiebreak = false;
        self.tiebreak_points = [0, 0];
        self.current_set_index += 1;
        None
    }

    fn tiebreak_point(&mut self, config: &MatchConfig, won_by: Team) -> Option<Team> {
        let scorer = won_by.index();
        self.tiebreak_points[scorer] += 1;

        let mine = self.tiebreak_points[scorer];
        let theirs = self.tiebreak_points[won_by.other().index()];
        if mine >= TIEBREAK_MIN_POINTS && mine >= theirs + 2 {
            self.games[scorer] = config.games_per_set + 1;
            return self.win_set(config, won_by);
        }

        // Serve changes after the first point, then every two points.
        let played = self.tiebreak_points[0] + self.tiebreak_points[1];
        if played % 2 == 1 {
            self.serving_team = self.serving_team.other();
        }

        None
    }
}

/// Operator supplied correction of the scoreboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreOverride {
    /// Sets won per team.
    pub sets: [u32; 2],
    /// Games per team in the current set.
    pub games: [u32; 2],
    /// Points per team in the current game.
    pub points: [GamePoint; 2],
    /// Team serving next.
    pub serving_team: Team,
}

impl ScoreOverride {
    /// Build the snapshot this override describes, or `None` when it would already
    /// decide the match or describes a set that can no longer be in progress.
    ///
    /// Past sets are back-filled as `games_per_set`-0 wins: team 1's sets first,
    /// then team 2's. Their real game scores are not known to the operator.
    pub fn into_snapshot(self, config: &MatchConfig) -> Option<ScoreSnapshot> {
        let sets_to_win = config.sets_to_win();
        if self.sets.iter().any(|&sets| sets >= sets_to_win) {
            return None;
        }

        let target = config.games_per_set;
        // With a tiebreak, games-all at the target is the furthest an open set goes.
        if config.tiebreak_enabled && self.games.iter().any(|&games| games > target) {
            return None;
        }
        let open_set = ScoreSnapshot {
            games: self.games,
            ..ScoreSnapshot::default()
        };
        if open_set.set_winner(config).is_some() {
            return None;
        }

        let completed_sets = Team::BOTH
            .into_iter()
            .flat_map(|team| {
                let games = match team {
                    Team::One => [target, 0],
                    Team::Two => [0, target],
                };
                (0..self.sets[team.index()]).map(move |_| CompletedSet {
                    games,
                    tiebreak_played: false,
                    tiebreak_score: None,
                })
            })
            .collect::<Vec<_>>();

        Some(ScoreSnapshot {
            sets: self.sets,
            games: self.games,
            points: self.points,
            advantage: None,
            deuce_resets: 0,
            is_tiebreak: config.tiebreak_enabled && self.games == [target, target],
            tiebreak_points: [0, 0],
            completed_sets: Arc::new(completed_sets),
            current_set_index: self.sets[0] + self.sets[1],
            serving_team: self.serving_team,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(deuce_mode: DeuceMode) -> MatchConfig {
        MatchConfig {
            games_per_set: 4,
            number_of_sets: 1,
            deuce_mode,
            tiebreak_enabled: false,
        }
    }

    fn play(score: &ScoreSnapshot, config: &MatchConfig, winners: &[Team]) -> Advance {
        let mut outcome = Advance {
            snapshot: score.clone(),
            match_over: false,
            winner: None,
        };
        for team in winners {
            outcome = advance(&outcome.snapshot, config, *team);
        }
        outcome
    }

    fn deuce(config: &MatchConfig) -> ScoreSnapshot {
        use Team::{One, Two};
        play(&ScoreSnapshot::default(), config, &[One, Two, One, Two, One, Two]).snapshot
    }

    #[test]
    fn points_progress_through_regular_values() {
        let config = config(DeuceMode::GoldenPoint);
        let after = play(&ScoreSnapshot::default(), &config, &[Team::One, Team::One]);
        assert_eq!(after.snapshot.points, [GamePoint::Thirty, GamePoint::Love]);
        assert_eq!(after.snapshot.point_display(), ["30".to_string(), "0".to_string()]);
    }

    #[test]
    fn four_straight_points_win_game_and_flip_serve() {
        let config = config(DeuceMode::GoldenPoint);
        let after = play(&ScoreSnapshot::default(), &config, &[Team::One; 4]);

        assert_eq!(after.snapshot.games, [1, 0]);
        assert_eq!(after.snapshot.points, [GamePoint::Love; 2]);
        assert_eq!(after.snapshot.serving_team, Team::Two);
        assert!(!after.match_over);
    }

    #[test]
    fn golden_point_decides_at_deuce() {
        let config = config(DeuceMode::GoldenPoint);
        let after = advance(&deuce(&config), &config, Team::Two);

        assert_eq!(after.snapshot.games, [0, 1]);
        assert_eq!(after.snapshot.advantage, None);
    }

    #[test]
    fn advantage_lost_returns_to_deuce_not_thirty() {
        let config = config(DeuceMode::Advantage);
        let at_deuce = deuce(&config);

        let ad_one = advance(&at_deuce, &config, Team::One).snapshot;
        assert_eq!(ad_one.advantage, Some(Team::One));
        assert_eq!(ad_one.point_display(), ["Ad".to_string(), "40".to_string()]);

        let back = advance(&ad_one, &config, Team::Two).snapshot;
        assert_eq!(back.advantage, None);
        assert_eq!(back.points, [GamePoint::Forty; 2]);
        assert_eq!(back.games, [0, 0]);

        let won = play(&back, &config, &[Team::One, Team::One]).snapshot;
        assert_eq!(won.games, [1, 0]);
        assert_eq!(won.deuce_resets, 0);
    }

    #[test]
    fn star_point_decides_after_two_lost_advantages() {
        use Team::{One, Two};
        let config = config(DeuceMode::StarPoint);

        let third_deuce = play(&deuce(&config), &config, &[One, Two, Two, One]).snapshot;
        assert_eq!(third_deuce.deuce_resets, 2);
        assert_eq!(third_deuce.advantage, None);

        let won = advance(&third_deuce, &config, Two).snapshot;
        assert_eq!(won.games, [0, 1]);
    }

    #[test]
    fn star_point_plays_advantage_before_the_deciding_deuce() {
        let config = config(DeuceMode::StarPoint);
        let after = advance(&deuce(&config), &config, Team::One).snapshot;
        assert_eq!(after.advantage, Some(Team::One));
        assert_eq!(after.games, [0, 0]);
    }

    #[test]
    fn set_requires_two_game_lead_without_tiebreak() {
        let config = config(DeuceMode::GoldenPoint);
        let mut score = ScoreSnapshot {
            games: [3, 3],
            ..ScoreSnapshot::default()
        };

        score = play(&score, &config, &[Team::One; 4]).snapshot;
        assert_eq!(score.games, [4, 3]);
        assert!(score.completed_sets.is_empty());

        let outcome = play(&score, &config, &[Team::One; 4]);
        assert!(outcome.match_over);
        assert_eq!(outcome.winner, Some(Team::One));
        assert_eq!(outcome.snapshot.completed_sets[0].games, [5, 3]);
        assert_eq!(outcome.snapshot.sets, [1, 0]);
    }

    #[test]
    fn tiebreak_starts_at_games_all_and_records_set() {
        let config = MatchConfig {
            tiebreak_enabled: true,
            ..config(DeuceMode::GoldenPoint)
        };
        let score = ScoreSnapshot {
            games: [4, 3],
            ..ScoreSnapshot::default()
        };

        let tiebreak = play(&score, &config, &[Team::Two; 4]).snapshot;
        assert!(tiebreak.is_tiebreak);
        assert_eq!(tiebreak.games, [4, 4]);

        use Team::{One, Two};
        let sequence = [One, One, Two, Two, One, Two, One, Two, One, Two, One, One];
        let outcome = play(&tiebreak, &config, &sequence);

        assert!(outcome.match_over);
        assert_eq!(outcome.winner, Some(One));
        let set = outcome.snapshot.completed_sets[0];
        assert_eq!(set.games, [5, 4]);
        assert!(set.tiebreak_played);
        assert_eq!(set.tiebreak_score, Some([7, 5]));
    }

    #[test]
    fn tiebreak_serve_rotates_after_first_point_then_every_two() {
        let config = MatchConfig {
            tiebreak_enabled: true,
            ..config(DeuceMode::GoldenPoint)
        };
        let mut score = ScoreSnapshot {
            games: [4, 4],
            is_tiebreak: true,
            serving_team: Team::One,
            ..ScoreSnapshot::default()
        };

        let mut servers = Vec::new();
        for _ in 0..5 {
            score = advance(&score, &config, Team::Two).snapshot;
            servers.push(score.serving_team);
        }

        use Team::{One, Two};
        assert_eq!(servers, vec![Two, Two, One, One, Two]);
        assert_eq!(score.point_display(), ["0".to_string(), "5".to_string()]);
    }

    #[test]
    fn winning_a_set_in_a_longer_match_starts_the_next_one() {
        let config = MatchConfig {
            number_of_sets: 3,
            ..config(DeuceMode::GoldenPoint)
        };
        let score = ScoreSnapshot {
            games: [3, 0],
            ..ScoreSnapshot::default()
        };

        let outcome = play(&score, &config, &[Team::One; 4]);
        assert!(!outcome.match_over);
        assert_eq!(outcome.snapshot.sets, [1, 0]);
        assert_eq!(outcome.snapshot.games, [0, 0]);
        assert_eq!(outcome.snapshot.current_set_index, 1);
        assert_eq!(outcome.snapshot.completed_sets.len(), 1);
    }

    #[test]
    fn advance_leaves_the_input_snapshot_untouched() {
        let config = MatchConfig {
            number_of_sets: 3,
            ..config(DeuceMode::GoldenPoint)
        };
        let before = ScoreSnapshot {
            games: [3, 0],
            points: [GamePoint::Forty, GamePoint::Love],
            ..ScoreSnapshot::default()
        };
        let copy = before.clone();

        let after = advance(&before, &config, Team::One).snapshot;
        assert_eq!(before, copy);
        assert!(before.completed_sets.is_empty());
        assert_eq!(after.completed_sets.len(), 1);
    }

    #[test]
    fn override_backfills_completed_sets() {
        let config = MatchConfig {
            number_of_sets: 5,
            tiebreak_enabled: true,
            ..config(DeuceMode::GoldenPoint)
        };
        let snapshot = ScoreOverride {
            sets: [2, 1],
            games: [4, 4],
            points: [GamePoint::Love; 2],
            serving_team: Team::Two,
        }
        .into_snapshot(&config)
        .unwrap();

        let games = snapshot
            .completed_sets
            .iter()
            .map(|set| set.games)
            .collect::<Vec<_>>();
        assert_eq!(games, vec![[4, 0], [4, 0], [0, 4]]);
        assert_eq!(snapshot.current_set_index, 3);
        assert!(snapshot.is_tiebreak);
        assert_eq!(snapshot.serving_team, Team::Two);
    }

    #[test]
    fn override_cannot_decide_the_match() {
        let config = config(DeuceMode::GoldenPoint);
        let result = ScoreOverride {
            sets: [1, 0],
            games: [0, 0],
            points: [GamePoint::Love; 2],
            serving_team: Team::One,
        }
        .into_snapshot(&config);
        assert!(result.is_none());
    }

    #[test]
    fn override_cannot_describe_a_finished_set() {
        let config = config(DeuceMode::GoldenPoint);
        let with_games = |games| {
            ScoreOverride {
                sets: [0, 0],
                games,
                points: [GamePoint::Love; 2],
                serving_team: Team::One,
            }
            .into_snapshot(&config)
        };

        assert!(with_games([4, 0]).is_none());
        assert!(with_games([2, 6]).is_none());
        assert!(with_games([4, 3]).is_some());
        assert!(with_games([7, 6]).is_some());

        let tiebreak = MatchConfig {
            tiebreak_enabled: true,
            ..config
        };
        let over_target = ScoreOverride {
            sets: [0, 0],
            games: [5, 4],
            points: [GamePoint::Love; 2],
            serving_team: Team::One,
        };
        assert!(over_target.into_snapshot(&tiebreak).is_none());
    }

    #[test]
    fn snapshot_serializes_points_as_numbers() {
        let snapshot = ScoreSnapshot {
            points: [GamePoint::Thirty, GamePoint::Forty],
            ..ScoreSnapshot::default()
        };
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["points"], serde_json::json!([30, 40]));
        assert_eq!(json["serving_team"], serde_json::json!(1));

        let back: ScoreSnapshot = serde_json::from_value(json).unwrap();
        assert_eq!(back, snapshot);
    }
}
