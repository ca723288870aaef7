//! Self-contained result links.
//!
//! A share token carries a [`MatchSummary`](crate::analytics::MatchSummary),
//! never the ledger, so it can be rendered without replaying the match.

pub mod codec;

use crate::state::{MatchSession, scoring::CompletedSet};

pub use self::codec::{ShareDecodeError, decode, encode};

/// Set scores joined for display, e.g. `6-3 / 4-6 / 7-6 (7-5)`.
pub fn score_line(sets: &[CompletedSet]) -> String {
    sets.iter()
        .map(|set| {
            let games = format!("{}-{}", set.games[0], set.games[1]);
            match set.tiebreak_score.filter(|_| set.tiebreak_played) {
                Some([one, two]) => format!("{games} ({one}-{two})"),
                None => games,
            }
        })
        .collect::<Vec<_>>()
        .join(" / ")
}

/// Link to the results page with the token in the fragment, so it never reaches a server.
pub fn results_link(base_url: &str, session: &MatchSession) -> String {
    format!("{}/r#{}", base_url.trim_end_matches('/'), encode(session))
}
