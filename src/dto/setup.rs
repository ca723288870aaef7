//! Match setup input, validated before a match is initialized.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    dto::validation::{validate_display_name, validate_number_of_sets, validate_roster},
    state::{
        MatchAction,
        game::{DeuceMode, MatchConfig, Player, Position, Team},
    },
};

/// Roster and rules chosen on the setup screen.
#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = "validate_roster"))]
pub struct MatchSetupInput {
    /// Exactly four players, one per team and court side.
    #[validate(length(equal = 4), nested)]
    pub players: Vec<PlayerInput>,
    /// Falls back to the configured default rules when omitted.
    #[serde(default)]
    #[validate(nested)]
    pub config: Option<MatchConfigInput>,
}

/// One player of the roster.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PlayerInput {
    /// Identifier referenced by recorded points.
    #[validate(length(min = 1))]
    pub id: String,
    /// Display name.
    #[validate(custom(function = "validate_display_name"))]
    pub name: String,
    /// Team the player belongs to.
    pub team: Team,
    /// Court side.
    pub position: Position,
}

/// Rules of the match.
#[derive(Debug, Clone, Copy, Deserialize, Validate)]
#[validate(schema(function = "validate_number_of_sets"))]
pub struct MatchConfigInput {
    /// Games needed to take a set.
    #[validate(range(min = 1, max = 9))]
    pub games_per_set: u32,
    /// Best-of-N sets; odd.
    pub number_of_sets: u32,
    /// Defaults to golden point.
    #[serde(default)]
    pub deuce_mode: DeuceMode,
    /// Defaults to on.
    #[serde(default = "default_tiebreak")]
    pub tiebreak_enabled: bool,
}

fn default_tiebreak() -> bool {
    true
}

impl From<MatchConfigInput> for MatchConfig {
    fn from(value: MatchConfigInput) -> Self {
        Self {
            games_per_set: value.games_per_set,
            number_of_sets: value.number_of_sets,
            deuce_mode: value.deuce_mode,
            tiebreak_enabled: value.tiebreak_enabled,
        }
    }
}

impl From<PlayerInput> for Player {
    fn from(value: PlayerInput) -> Self {
        Self {
            id: value.id,
            name: value.name.trim().to_owned(),
            team: value.team,
            position: value.position,
        }
    }
}

impl MatchSetupInput {
    /// Initialization action for this setup, using `default_config` when no rules were given.
    pub fn into_action(self, default_config: MatchConfig) -> MatchAction {
        MatchAction::InitializeMatch {
            players: self.players.into_iter().map(Into::into).collect(),
            config: self.config.map(Into::into).unwrap_or(default_config),
        }
    }
}
