//! Starting a match, applying operator actions and reading live statistics.

use tracing::{debug, info};
use validator::Validate;

use crate::{
    analytics::MatchSummary,
    dto::setup::MatchSetupInput,
    error::ServiceError,
    state::{MatchAction, MatchSession, Screen, SharedState, Transition},
};

/// Validate a setup and start tracking a new match with it.
pub async fn start_match(
    state: &SharedState,
    input: MatchSetupInput,
) -> Result<MatchSession, ServiceError> {
    input.validate()?;

    let action = input.into_action(state.config().default_match());
    let (transition, session) = state.dispatch(action).await;
    if let Transition::Absorbed(reason) = transition {
        return Err(ServiceError::InvalidInput(format!(
            "match setup rejected: {reason:?}"
        )));
    }

    info!(
        games_per_set = session.config.games_per_set,
        number_of_sets = session.config.number_of_sets,
        deuce_mode = ?session.config.deuce_mode,
        "match started"
    );
    Ok(session)
}

/// Apply one operator action to the live match.
///
/// Absorbed actions are not errors: the returned session is simply unchanged.
pub async fn apply_action(state: &SharedState, action: MatchAction) -> (Transition, MatchSession) {
    let (transition, session) = state.dispatch(action).await;
    if transition.is_applied() && session.match_over {
        info!(winner = ?session.winning_team, points = session.history.len(), "match finished");
    }
    (transition, session)
}

/// Apply a sequence of actions in order, returning the final session and how many were absorbed.
pub async fn replay(
    state: &SharedState,
    actions: impl IntoIterator<Item = MatchAction>,
) -> (MatchSession, usize) {
    let mut absorbed = 0;
    for action in actions {
        let (transition, _) = apply_action(state, action).await;
        if !transition.is_applied() {
            absorbed += 1;
        }
    }
    debug!(absorbed, "replay complete");
    (state.session_snapshot().await, absorbed)
}

/// Statistics of the live match.
pub async fn current_summary(state: &SharedState) -> Result<MatchSummary, ServiceError> {
    let session = state.session_snapshot().await;
    if session.screen == Screen::Setup {
        return Err(ServiceError::InvalidState("no match has been started".into()));
    }
    Ok(MatchSummary::from_session(&session))
}
