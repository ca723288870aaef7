//! Result links, share messages, and publishing tokens under short ids.

use std::time::SystemTime;

use rand::{Rng, distr::Alphanumeric, rng};
use tracing::{info, warn};

use crate::{
    analytics::MatchSummary,
    dao::{models::SharedResultEntity, storage::StorageError},
    error::ServiceError,
    share::{self, score_line},
    state::{MatchSession, Screen, SharedState, game::Position},
};

/// Link to the results of the live match, carrying the token in the URL fragment.
pub async fn results_link(state: &SharedState) -> Result<String, ServiceError> {
    let session = state.session_snapshot().await;
    link_for(state, &session)
}

fn link_for(state: &SharedState, session: &MatchSession) -> Result<String, ServiceError> {
    if session.screen != Screen::Results {
        return Err(ServiceError::InvalidState(
            "results can only be shared once the match is over".into(),
        ));
    }
    Ok(share::results_link(state.config().share_base_url(), session))
}

/// Text announcing the live match result, ending with its results link.
///
/// Text and link are built from the same snapshot of the session.
pub async fn share_message(state: &SharedState) -> Result<String, ServiceError> {
    let session = state.session_snapshot().await;
    let link = link_for(state, &session)?;

    let mut lines = Vec::new();
    match session.winning_team {
        Some(team) => {
            let name_at = |position| {
                session
                    .player_at(team, position)
                    .map(|player| player.name.as_str())
                    .unwrap_or_default()
            };
            lines.push("Match won!".to_owned());
            lines.push(String::new());
            lines.push(format!(
                "Congratulations to the winners: {} on the reves side and {} on the drive.",
                name_at(Position::Reves),
                name_at(Position::Drive)
            ));
            lines.push(String::new());
            lines.push(score_line(&session.score.completed_sets));
        }
        None => lines.push("Match finished!".to_owned()),
    }
    lines.push(String::new());
    lines.push("Full statistics here:".to_owned());
    lines.push(link);

    Ok(lines.join("\n"))
}

fn short_id(length: usize) -> String {
    rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// Store a share token under a fresh short identifier and return that identifier.
///
/// The token is decoded first so invalid ones are never stored. An identifier
/// collision is retried once with a new identifier.
pub async fn publish(state: &SharedState, token: String) -> Result<String, ServiceError> {
    let token = token.trim().to_owned();
    if token.is_empty() {
        return Err(ServiceError::InvalidInput("share token is missing".into()));
    }
    let summary = share::decode(&token)?;
    let store = state.require_share_store().await?;
    let length = state.config().share_id_length();

    let entity = SharedResultEntity {
        id: short_id(length),
        encoded_data: token,
        player_names: summary.players.iter().map(|p| p.name.clone()).collect(),
        score_line: score_line(&summary.completed_sets),
        winning_team: summary.winning_team,
        created_at: SystemTime::now(),
    };

    let entity = match store.insert_shared(entity.clone()).await {
        Ok(()) => entity,
        Err(StorageError::Conflict { id }) => {
            warn!(%id, "share id collision; retrying with a new id");
            let retry = SharedResultEntity {
                id: short_id(length),
                ..entity
            };
            store.insert_shared(retry.clone()).await?;
            retry
        }
        Err(err) => return Err(err.into()),
    };

    info!(id = %entity.id, score = %entity.score_line, "results published");
    Ok(entity.id)
}

/// Summary behind a published identifier.
pub async fn resolve(state: &SharedState, id: &str) -> Result<MatchSummary, ServiceError> {
    let store = state.require_share_store().await?;
    let Some(entity) = store.find_shared(id.to_owned()).await? else {
        return Err(ServiceError::NotFound(format!("shared result `{id}` not found")));
    };
    Ok(share::decode(&entity.encoded_data)?)
}
