//! Streaks, breaks of serve and momentum over the point ledger.

use serde::{Deserialize, Serialize};

use crate::state::{
    game::{PointRecord, Team},
    scoring::ScoreSnapshot,
};

/// Longest run of consecutive points for one team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakInfo {
    /// Team described.
    pub team: Team,
    /// Points in the longest run.
    pub longest_streak: u32,
}

/// Longest consecutive run of points won by each team, team 1 first.
pub fn streaks(history: &[PointRecord]) -> [StreakInfo; 2] {
    let mut longest = [0u32; 2];
    let mut current = [0u32; 2];

    for record in history {
        let winner = record.won_by.index();
        current[winner] += 1;
        current[1 - winner] = 0;
        longest[winner] = longest[winner].max(current[winner]);
    }

    Team::BOTH.map(|team| StreakInfo {
        team,
        longest_streak: longest[team.index()],
    })
}

/// Games won by one team, split by who was serving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakInfo {
    /// Team described.
    pub team: Team,
    /// Games won while the other team was serving.
    pub break_points_won: u32,
    /// All games won by the team.
    pub total_games_won: u32,
}

/// Breaks of serve for both teams, team 1 first.
///
/// A point ends a game when the cumulative game count after it (the next
/// record's pre-point snapshot, or `current` for the last record) exceeds the
/// count before it. The server is read from the pre-point snapshot of that point.
pub fn break_points(history: &[PointRecord], current: &ScoreSnapshot) -> [BreakInfo; 2] {
    let mut breaks = [0u32; 2];
    let mut games_won = [0u32; 2];

    let afters = history
        .iter()
        .skip(1)
        .map(|next| &next.score_before)
        .chain(std::iter::once(current));

    for (record, after) in history.iter().zip(afters) {
        let before = &record.score_before;
        if after.total_games() <= before.total_games() {
            continue;
        }

        let winner = record.won_by;
        games_won[winner.index()] += 1;
        if before.serving_team != winner {
            breaks[winner.index()] += 1;
        }
    }

    Team::BOTH.map(|team| BreakInfo {
        team,
        break_points_won: breaks[team.index()],
        total_games_won: games_won[team.index()],
    })
}

/// One sample of the momentum chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MomentumPoint {
    /// Points played so far.
    pub index: u32,
    /// Points won by team 1 minus points won by team 2.
    pub differential: i32,
}

/// Cumulative point differential, starting at `(0, 0)`, one sample per ledger entry after it.
pub fn momentum(history: &[PointRecord]) -> Vec<MomentumPoint> {
    let mut series = Vec::with_capacity(history.len() + 1);
    series.push(MomentumPoint {
        index: 0,
        differential: 0,
    });

    let mut differential = 0i32;
    for (played, record) in history.iter().enumerate() {
        differential += match record.won_by {
            Team::One => 1,
            Team::Two => -1,
        };
        series.push(MomentumPoint {
            index: played as u32 + 1,
            differential,
        });
    }
    series
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::tests::quick_point;
    use crate::state::{
        MatchAction, MatchSession,
        game::{MatchConfig, tests::roster},
    };

    fn played(winners: &[Team]) -> MatchSession {
        let mut session = MatchSession::new();
        session.apply_at(
            MatchAction::InitializeMatch {
                players: roster(),
                config: MatchConfig {
                    number_of_sets: 3,
                    ..MatchConfig::default()
                },
            },
            0,
        );
        for (at, team) in winners.iter().enumerate() {
            session.apply_at(MatchAction::RecordQuickPoint { team: *team }, at as u64);
        }
        session
    }

    #[test]
    fn streaks_reset_when_the_other_team_scores() {
        let history: Vec<_> = [Team::One, Team::One, Team::Two, Team::One, Team::One, Team::One]
            .into_iter()
            .map(quick_point)
            .collect();
        let [one, two] = streaks(&history);

        assert_eq!(one.longest_streak, 3);
        assert_eq!(two.longest_streak, 1);
    }

    #[test]
    fn streaks_of_empty_ledger_are_zero() {
        let [one, two] = streaks(&[]);
        assert_eq!(one.longest_streak, 0);
        assert_eq!(two.longest_streak, 0);
    }

    #[test]
    fn winning_on_the_opponents_serve_is_a_break() {
        // Team 1 holds the first game, then breaks team 2.
        let session = played(&[Team::One; 8]);
        assert_eq!(session.score.games, [2, 0]);

        let [one, two] = break_points(&session.history, &session.score);
        assert_eq!(one.total_games_won, 2);
        assert_eq!(one.break_points_won, 1);
        assert_eq!(two.total_games_won, 0);
        assert_eq!(two.break_points_won, 0);
    }

    #[test]
    fn break_is_credited_to_the_receiving_team() {
        // Team 1 holds, then team 2 holds its own serve.
        let mut winners = vec![Team::One; 4];
        winners.extend([Team::Two; 4]);
        let session = played(&winners);

        let [one, two] = break_points(&session.history, &session.score);
        assert_eq!(one.break_points_won, 0);
        assert_eq!(two.break_points_won, 0);
        assert_eq!(two.total_games_won, 1);
    }

    #[test]
    fn game_ending_points_across_a_set_change_are_detected() {
        let session = played(&[Team::Two; 20]);
        assert_eq!(session.score.sets, [0, 1]);
        assert_eq!(session.score.games, [0, 1]);

        let [one, two] = break_points(&session.history, &session.score);
        assert_eq!(one.total_games_won, 0);
        assert_eq!(two.total_games_won, 5);
        // Team 1 served games 1, 3 and 5.
        assert_eq!(two.break_points_won, 3);
    }

    #[test]
    fn momentum_has_one_sample_per_point_plus_origin() {
        let history: Vec<_> = [Team::One, Team::Two, Team::Two]
            .into_iter()
            .map(quick_point)
            .collect();
        let series = momentum(&history);

        assert_eq!(series.len(), 4);
        assert_eq!(series[0], MomentumPoint { index: 0, differential: 0 });
        assert_eq!(series[1].differential, 1);
        assert_eq!(series[3], MomentumPoint { index: 3, differential: -1 });
        assert_eq!(momentum(&[]).len(), 1);
    }
}
