//! How points were won.

use serde::{Deserialize, Serialize};

use crate::{
    analytics::{KindTally, percentage},
    state::game::{PointRecord, Team},
};

/// How the points of a match were decided.
///
/// `total_points` counts every ledger entry, quick points included, while the
/// percentages only cover classified points. The two are not meant to add up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointDistribution {
    /// Ledger length.
    pub total_points: u32,
    /// Classified points ended by a winner.
    pub decided_by_winner: u32,
    /// Classified points ended by an unforced error.
    pub decided_by_unforced_error: u32,
    /// Classified points ended by a forced error.
    pub decided_by_forced_error: u32,
    /// Winners over classified points, 0-100.
    pub winner_pct: u32,
    /// Unforced errors over classified points, 0-100.
    pub unforced_pct: u32,
    /// Forced errors over classified points, 0-100.
    pub forced_pct: u32,
}

/// Distribution over the whole ledger.
pub fn point_distribution(history: &[PointRecord]) -> PointDistribution {
    let tally = KindTally::from_records(history.iter());
    let classified = tally.classified();

    PointDistribution {
        total_points: history.len() as u32,
        decided_by_winner: tally.winners,
        decided_by_unforced_error: tally.unforced_errors,
        decided_by_forced_error: tally.forced_errors,
        winner_pct: percentage(tally.winners, classified),
        unforced_pct: percentage(tally.unforced_errors, classified),
        forced_pct: percentage(tally.forced_errors, classified),
    }
}

/// How the points won by one team were decided.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamPointDistribution {
    /// Team described.
    pub team: Team,
    /// Points won by the team, quick points included.
    pub total_points_won: u32,
    /// Won points ended by a winner.
    pub by_winner: u32,
    /// Won points ended by an opponent's unforced error.
    pub by_unforced_error: u32,
    /// Won points ended by a forced error.
    pub by_forced_error: u32,
    /// Winners over classified won points, 0-100.
    pub winner_pct: u32,
    /// Unforced errors over classified won points, 0-100.
    pub unforced_pct: u32,
    /// Forced errors over classified won points, 0-100.
    pub forced_pct: u32,
}

impl TeamPointDistribution {
    /// Build a distribution from raw counts, deriving the percentages.
    pub fn from_counts(
        team: Team,
        total_points_won: u32,
        by_winner: u32,
        by_unforced_error: u32,
        by_forced_error: u32,
    ) -> Self {
        let classified = by_winner
            .saturating_add(by_unforced_error)
            .saturating_add(by_forced_error);
        Self {
            team,
            total_points_won,
            by_winner,
            by_unforced_error,
            by_forced_error,
            winner_pct: percentage(by_winner, classified),
            unforced_pct: percentage(by_unforced_error, classified),
            forced_pct: percentage(by_forced_error, classified),
        }
    }
}

/// Distribution of won points for both teams, team 1 first.
pub fn team_point_distribution(history: &[PointRecord]) -> [TeamPointDistribution; 2] {
    Team::BOTH.map(|team| {
        let won = history.iter().filter(|record| record.won_by == team);
        let total = won.clone().count() as u32;
        let tally = KindTally::from_records(won);
        TeamPointDistribution::from_counts(
            team,
            total,
            tally.winners,
            tally.unforced_errors,
            tally.forced_errors,
        )
    })
}
