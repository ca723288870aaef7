//! Match session reducer. Every change to a match goes through
//! [`MatchSession::apply`]; actions that do not fit the current state are absorbed.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::state::{
    game::{
        MagiaKind, MagiaRecord, MatchConfig, Player, PointKind, PointRecord, Position, Team,
        is_valid_roster,
    },
    scoring::{Advance, ScoreOverride, ScoreSnapshot, advance},
};

/// Screen the operator is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    /// Players and rules are being chosen.
    #[default]
    Setup,
    /// Points are being recorded.
    Tracking,
    /// Final scoreboard and statistics.
    Results,
}

/// Actions accepted by [`MatchSession::apply`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchAction {
    /// Fix the roster and rules and start tracking from a blank scoreboard.
    InitializeMatch {
        /// Four players, one per team/position slot.
        players: Vec<Player>,
        /// Rules for the match.
        config: MatchConfig,
    },
    /// Record a classified point performed by a player.
    RecordPoint {
        /// How the point ended.
        kind: PointKind,
        /// Acting player.
        player_id: String,
    },
    /// Award a point to a team without attribution.
    RecordQuickPoint {
        /// Team receiving the point.
        team: Team,
    },
    /// Remove the last point and restore the scoreboard from before it.
    UndoPoint,
    /// Stop tracking and show results without declaring a winner.
    EndMatch,
    /// Discard the session.
    ResetMatch,
    /// Replace the scoreboard with an operator correction.
    SetScore {
        /// Corrected scoreboard values.
        score: ScoreOverride,
    },
    /// Tag a special shot.
    RecordMagia {
        /// Shot played.
        kind: MagiaKind,
        /// Player who played it.
        player_id: String,
    },
    /// Remove the last special shot tag.
    UndoMagia,
}

/// Why an action left the session unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbsorbReason {
    /// The match already has a winner.
    MatchOver,
    /// No match has been initialized.
    NotTracking,
    /// The referenced player is not on the roster.
    UnknownPlayer,
    /// Nothing to undo.
    EmptyLedger,
    /// Roster or rules passed to initialization are unusable.
    InvalidSetup,
    /// Score correction describes an already decided match or set.
    IllegalScore,
}

/// Outcome of applying an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The session changed.
    Applied,
    /// The action was ignored; the session is exactly as before.
    Absorbed(AbsorbReason),
}

impl Transition {
    /// Whether the session changed.
    pub fn is_applied(self) -> bool {
        matches!(self, Transition::Applied)
    }
}

/// Most recent entry across both ledgers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LastAction<'a> {
    /// A point was recorded last.
    Point(&'a PointRecord),
    /// A special shot was tagged last.
    Magia(&'a MagiaRecord),
}

/// Live match: roster, rules, scoreboard and both ledgers.
///
/// Every mutation goes through [`MatchSession::apply`]; actions that make no
/// sense in the current state are absorbed and leave the session untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSession {
    /// Current screen.
    pub screen: Screen,
    /// Rules fixed at initialization.
    pub config: MatchConfig,
    /// Roster fixed at initialization.
    pub players: Vec<Player>,
    /// Live scoreboard.
    pub score: ScoreSnapshot,
    /// Point ledger, oldest first.
    pub history: Vec<PointRecord>,
    /// Special shot ledger, oldest first.
    pub magias: Vec<MagiaRecord>,
    /// Whether a team reached the required sets.
    pub match_over: bool,
    /// Winner, absent while playing or when the match was ended early.
    pub winning_team: Option<Team>,
    #[serde(default)]
    point_seq: u64,
    #[serde(default)]
    magia_seq: u64,
}

impl Default for MatchSession {
    fn default() -> Self {
        Self {
            screen: Screen::Setup,
            config: MatchConfig::default(),
            players: Vec::new(),
            score: ScoreSnapshot::default(),
            history: Vec::new(),
            magias: Vec::new(),
            match_over: false,
            winning_team: None,
            point_seq: 0,
            magia_seq: 0,
        }
    }
}

impl MatchSession {
    /// Create an empty session on the setup screen.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an action stamped with the current wall clock.
    pub fn apply(&mut self, action: MatchAction) -> Transition {
        self.apply_at(action, now_ms())
    }

    /// Apply an action stamped with `now_ms` (milliseconds since the Unix epoch).
    pub fn apply_at(&mut self, action: MatchAction, now_ms: u64) -> Transition {
        match action {
            MatchAction::InitializeMatch { players, config } => self.initialize(players, config),
            MatchAction::RecordPoint { kind, player_id } => {
                if let Err(reason) = self.ensure_accepting_points() {
                    return Transition::Absorbed(reason);
                }
                let Some(actor) = self.player(&player_id) else {
                    return Transition::Absorbed(AbsorbReason::UnknownPlayer);
                };
                let won_by = kind.scoring_team(actor.team);
                self.record_point(Some(kind), Some(player_id), won_by, now_ms);
                Transition::Applied
            }
            MatchAction::RecordQuickPoint { team } => {
                if let Err(reason) = self.ensure_accepting_points() {
                    return Transition::Absorbed(reason);
                }
                self.record_point(None, None, team, now_ms);
                Transition::Applied
            }
            MatchAction::UndoPoint => {
                let Some(record) = self.history.pop() else {
                    return Transition::Absorbed(AbsorbReason::EmptyLedger);
                };
                self.score = record.score_before;
                self.match_over = false;
                self.winning_team = None;
                self.screen = Screen::Tracking;
                Transition::Applied
            }
            MatchAction::EndMatch => {
                if self.screen == Screen::Setup {
                    return Transition::Absorbed(AbsorbReason::NotTracking);
                }
                self.screen = Screen::Results;
                Transition::Applied
            }
            MatchAction::ResetMatch => {
                *self = Self::new();
                Transition::Applied
            }
            MatchAction::SetScore { score } => {
                if let Err(reason) = self.ensure_accepting_points() {
                    return Transition::Absorbed(reason);
                }
                let Some(snapshot) = score.into_snapshot(&self.config) else {
                    return Transition::Absorbed(AbsorbReason::IllegalScore);
                };
                self.score = snapshot;
                Transition::Applied
            }
            MatchAction::RecordMagia { kind, player_id } => {
                if self.screen == Screen::Setup {
                    return Transition::Absorbed(AbsorbReason::NotTracking);
                }
                if self.player(&player_id).is_none() {
                    return Transition::Absorbed(AbsorbReason::UnknownPlayer);
                }
                self.magia_seq += 1;
                self.magias.push(MagiaRecord {
                    id: format!("magia-{}", self.magia_seq),
                    timestamp_ms: now_ms,
                    kind,
                    player_id,
                });
                Transition::Applied
            }
            MatchAction::UndoMagia => match self.magias.pop() {
                Some(_) => Transition::Applied,
                None => Transition::Absorbed(AbsorbReason::EmptyLedger),
            },
        }
    }

    /// Look up a roster player by id.
    pub fn player(&self, id: &str) -> Option<&Player> {
        self.players.iter().find(|player| player.id == id)
    }

    /// Player occupying a team/position slot.
    pub fn player_at(&self, team: Team, position: Position) -> Option<&Player> {
        self.players
            .iter()
            .find(|player| player.team == team && player.position == position)
    }

    /// Players of one team.
    pub fn team_players(&self, team: Team) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(move |player| player.team == team)
    }

    /// Latest entry across the point and magia ledgers.
    ///
    /// When both carry the same timestamp the magia wins, as shots are tagged
    /// after the point they belong to.
    pub fn last_action(&self) -> Option<LastAction<'_>> {
        match (self.history.last(), self.magias.last()) {
            (Some(point), Some(magia)) if point.timestamp_ms > magia.timestamp_ms => {
                Some(LastAction::Point(point))
            }
            (_, Some(magia)) => Some(LastAction::Magia(magia)),
            (Some(point), None) => Some(LastAction::Point(point)),
            (None, None) => None,
        }
    }

    fn initialize(&mut self, players: Vec<Player>, config: MatchConfig) -> Transition {
        if !is_valid_roster(&players) || !config.is_playable() {
            return Transition::Absorbed(AbsorbReason::InvalidSetup);
        }

        *self = Self {
            screen: Screen::Tracking,
            config,
            players,
            ..Self::new()
        };
        Transition::Applied
    }

    fn ensure_accepting_points(&self) -> Result<(), AbsorbReason> {
        if self.match_over {
            return Err(AbsorbReason::MatchOver);
        }
        if self.screen == Screen::Setup {
            return Err(AbsorbReason::NotTracking);
        }
        Ok(())
    }

    fn record_point(
        &mut self,
        kind: Option<PointKind>,
        player_id: Option<String>,
        won_by: Team,
        now_ms: u64,
    ) {
        let Advance {
            snapshot,
            match_over,
            winner,
        } = advance(&self.score, &self.config, won_by);

        // The previous scoreboard moves into the ledger; completed sets stay shared.
        let score_before = std::mem::replace(&mut self.score, snapshot);

        self.point_seq += 1;
        self.history.push(PointRecord {
            id: format!("point-{}", self.point_seq),
            timestamp_ms: now_ms,
            kind,
            player_id,
            won_by,
            score_before,
        });

        self.match_over = match_over;
        self.winning_team = winner;
        self.screen = if match_over {
            Screen::Results
        } else {
            Screen::Tracking
        };
    }
}

/// Milliseconds since the Unix epoch, saturating to zero for clocks set before it.
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or_default()
}
