//! Saving finished matches and reading a user's history back.

use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    analytics::MatchSummary,
    dao::models::build_match_record,
    dto::history::{CareerStats, MatchListItem},
    error::ServiceError,
    state::{Screen, SharedState},
};

/// Persist the finished live match for `user_id`, who played as `selected_player_id`.
///
/// The store receives a copy of the session. On failure the live session is
/// left exactly as it was so the save can be retried.
pub async fn save_finished_match(
    state: &SharedState,
    user_id: &str,
    selected_player_id: &str,
) -> Result<MatchListItem, ServiceError> {
    let session = state.session_snapshot().await;
    if session.screen != Screen::Results {
        return Err(ServiceError::InvalidState(
            "only finished matches can be saved".into(),
        ));
    }

    let Some(record) = build_match_record(&session, user_id, selected_player_id) else {
        return Err(ServiceError::InvalidInput(format!(
            "player `{selected_player_id}` is not part of this match"
        )));
    };
    let item = MatchListItem::from(&record);
    let id = record.id;

    let store = state.require_match_store().await?;
    if let Err(err) = store.save_match(record).await {
        warn!(error = %err, %id, "failed to save match");
        return Err(err.into());
    }

    info!(%id, user_id, "match saved");
    Ok(item)
}

/// Stored matches of `user_id`, most recent first.
pub async fn list_matches(
    state: &SharedState,
    user_id: &str,
) -> Result<Vec<MatchListItem>, ServiceError> {
    let store = state.require_match_store().await?;
    let records = store.list_matches_for_user(user_id.to_owned()).await?;
    Ok(records.iter().map(MatchListItem::from).collect())
}

/// Statistics of a stored match, recomputed from its saved session.
pub async fn match_summary(state: &SharedState, id: Uuid) -> Result<MatchSummary, ServiceError> {
    let store = state.require_match_store().await?;
    let Some(record) = store.find_match(id).await? else {
        return Err(ServiceError::NotFound(format!("match `{id}` not found")));
    };
    Ok(MatchSummary::from_session(&record.match_data))
}

/// Remove a stored match.
pub async fn delete_match(state: &SharedState, id: Uuid) -> Result<(), ServiceError> {
    let store = state.require_match_store().await?;
    if !store.delete_match(id).await? {
        return Err(ServiceError::NotFound(format!("match `{id}` not found")));
    }
    info!(%id, "match deleted");
    Ok(())
}

/// Win/loss record of `user_id` over every stored match.
pub async fn career_summary(state: &SharedState, user_id: &str) -> Result<CareerStats, ServiceError> {
    let store = state.require_match_store().await?;
    let records = store.list_matches_for_user(user_id.to_owned()).await?;
    Ok(CareerStats::from_records(&records))
}
