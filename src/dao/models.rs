//! Storage records and the conversions that build and migrate them.

use serde::{Deserialize, Serialize};
use std::time::SystemTime;
use uuid::Uuid;

use crate::{
    dao::storage::{StorageError, StorageResult},
    state::{
        MatchSession,
        game::{Player, Team},
        scoring::CompletedSet,
    },
};

/// Schema version written by [`build_match_record`].
pub const MATCH_RECORD_SCHEMA_VERSION: u32 = 1;

/// Finished match as stored for a user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchRecordEntity {
    /// Primary key of the record.
    pub id: Uuid,
    /// Layout version of this record.
    pub schema_version: u32,
    /// Owner of the record.
    pub user_id: String,
    /// Names of team 1's players.
    pub team1_players: Vec<String>,
    /// Names of team 2's players.
    pub team2_players: Vec<String>,
    /// Winner, absent when the match was ended early.
    pub winning_team: Option<Team>,
    /// Team the owner played on.
    pub user_team: Team,
    /// Name the owner played under.
    pub user_player_name: String,
    /// Set scores, including an unfinished last set when the match was ended early.
    pub sets_score: Vec<CompletedSet>,
    /// Points in the ledger.
    pub total_points: u32,
    /// Complete session at the time of saving.
    pub match_data: MatchSession,
    /// When the record was saved.
    pub played_at: SystemTime,
}

/// Published share token and the fields needed to list it without decoding.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SharedResultEntity {
    /// Short public identifier.
    pub id: String,
    /// Share token as produced by the codec.
    pub encoded_data: String,
    /// Player names in slot order.
    pub player_names: Vec<String>,
    /// Set scores for display.
    pub score_line: String,
    /// Winner, absent when the match was ended early.
    pub winning_team: Option<Team>,
    /// When the token was published.
    pub created_at: SystemTime,
}

fn team_names(players: &[Player], team: Team) -> Vec<String> {
    players
        .iter()
        .filter(|player| player.team == team)
        .map(|player| player.name.clone())
        .collect()
}

/// Build the storage record for `session` on behalf of `user_id`, who played as
/// `selected_player_id`. Returns `None` when that player is not on the roster.
pub fn build_match_record(
    session: &MatchSession,
    user_id: &str,
    selected_player_id: &str,
) -> Option<MatchRecordEntity> {
    let selected = session.player(selected_player_id)?;

    let mut sets_score = session.score.completed_sets.to_vec();
    let games = session.score.games;
    if session.winning_team.is_none() && games.iter().any(|&won| won > 0) {
        sets_score.push(CompletedSet {
            games,
            tiebreak_played: false,
            tiebreak_score: None,
        });
    }

    Some(MatchRecordEntity {
        id: Uuid::new_v4(),
        schema_version: MATCH_RECORD_SCHEMA_VERSION,
        user_id: user_id.to_owned(),
        team1_players: team_names(&session.players, Team::One),
        team2_players: team_names(&session.players, Team::Two),
        winning_team: session.winning_team,
        user_team: selected.team,
        user_player_name: selected.name.clone(),
        sets_score,
        total_points: session.history.len() as u32,
        match_data: session.clone(),
        played_at: SystemTime::now(),
    })
}

/// Read a stored record of any known schema version.
///
/// Records written before versioning carry no `schema_version` and are
/// otherwise identical to version 1.
pub fn migrate_record(mut payload: serde_json::Value) -> StorageResult<MatchRecordEntity> {
    let version = payload
        .get("schema_version")
        .and_then(serde_json::Value::as_u64)
        .unwrap_or(0);

    match version {
        0 => {
            if let Some(fields) = payload.as_object_mut() {
                fields.insert(
                    "schema_version".into(),
                    MATCH_RECORD_SCHEMA_VERSION.into(),
                );
            }
        }
        1 => {}
        newer => {
            return Err(StorageError::UnsupportedSchema {
                version: u32::try_from(newer).unwrap_or(u32::MAX),
            });
        }
    }

    Ok(serde_json::from_value(payload)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{
        MatchAction,
        game::{MatchConfig, tests::roster},
    };

    fn session_with_games(team_one_games: u32) -> MatchSession {
        let mut session = MatchSession::new();
        session.apply_at(
            MatchAction::InitializeMatch {
                players: roster(),
                config: MatchConfig::default(),
            },
            0,
        );
        for at in 0..team_one_games * 4 {
            session.apply_at(MatchAction::RecordQuickPoint { team: Team::One }, u64::from(at));
        }
        session
    }

    #[test]
    fn record_carries_rosters_and_user_attribution() {
        let session = session_with_games(4);
        let record = build_match_record(&session, "user-1", "c").unwrap();

        assert_eq!(record.schema_version, MATCH_RECORD_SCHEMA_VERSION);
        assert_eq!(record.team1_players, ["Ana", "Bea"]);
        assert_eq!(record.team2_players, ["Carla", "Dani"]);
        assert_eq!(record.winning_team, Some(Team::One));
        assert_eq!(record.user_team, Team::Two);
        assert_eq!(record.user_player_name, "Carla");
        assert_eq!(record.total_points, 16);
        assert_eq!(record.sets_score.len(), 1);
        assert_eq!(record.sets_score[0].games, [4, 0]);
        assert_eq!(record.match_data, session);
    }

    #[test]
    fn early_end_keeps_the_unfinished_set() {
        let mut session = session_with_games(2);
        session.apply_at(MatchAction::EndMatch, 100);
        let record = build_match_record(&session, "user-1", "a").unwrap();

        assert_eq!(record.winning_team, None);
        assert_eq!(record.sets_score.len(), 1);
        assert_eq!(record.sets_score[0].games, [2, 0]);
        assert!(!record.sets_score[0].tiebreak_played);
    }

    #[test]
    fn early_end_without_games_has_no_sets() {
        let mut session = session_with_games(0);
        session.apply_at(MatchAction::EndMatch, 1);
        let record = build_match_record(&session, "user-1", "a").unwrap();
        assert!(record.sets_score.is_empty());
    }

    #[test]
    fn unknown_selected_player_yields_nothing() {
        let session = session_with_games(1);
        assert!(build_match_record(&session, "user-1", "zz").is_none());
    }

    #[test]
    fn unversioned_payloads_are_upgraded() {
        let record = build_match_record(&session_with_games(1), "user-1", "a").unwrap();
        let mut payload = serde_json::to_value(&record).unwrap();
        payload.as_object_mut().unwrap().remove("schema_version");

        let migrated = migrate_record(payload).unwrap();
        assert_eq!(migrated, record);
    }

    #[test]
    fn newer_payloads_are_refused() {
        let record = build_match_record(&session_with_games(1), "user-1", "a").unwrap();
        let mut payload = serde_json::to_value(&record).unwrap();
        payload["schema_version"] = 7.into();

        assert!(matches!(
            migrate_record(payload),
            Err(StorageError::UnsupportedSchema { version: 7 })
        ));
    }

    #[test]
    fn garbage_payloads_are_corrupt() {
        let payload = serde_json::json!({ "schema_version": 1, "id": "nope" });
        assert!(matches!(migrate_record(payload), Err(StorageError::Corrupt(_))));
    }
}
