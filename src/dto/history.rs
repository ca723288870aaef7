//! Projections of stored matches for a user's history and career record.

use serde::Serialize;
use uuid::Uuid;

use crate::{
    analytics::percentage,
    dao::models::MatchRecordEntity,
    dto::format_system_time,
    share::score_line,
    state::game::Team,
};

/// Stored match as listed on a user's profile.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MatchListItem {
    /// Stored record id.
    pub id: Uuid,
    /// RFC 3339 timestamp.
    pub played_at: String,
    /// Names of team 1.
    pub team1_players: Vec<String>,
    /// Names of team 2.
    pub team2_players: Vec<String>,
    /// Winner, absent for matches ended early.
    pub winning_team: Option<Team>,
    /// Team the user played on.
    pub user_team: Team,
    /// Absent when the match was ended without a winner.
    pub user_won: Option<bool>,
    /// Set scores, e.g. `6-3 / 4-6`.
    pub score_line: String,
    /// Points recorded in the match.
    pub total_points: u32,
}

impl From<&MatchRecordEntity> for MatchListItem {
    fn from(record: &MatchRecordEntity) -> Self {
        Self {
            id: record.id,
            played_at: format_system_time(record.played_at),
            team1_players: record.team1_players.clone(),
            team2_players: record.team2_players.clone(),
            winning_team: record.winning_team,
            user_team: record.user_team,
            user_won: record.winning_team.map(|team| team == record.user_team),
            score_line: score_line(&record.sets_score),
            total_points: record.total_points,
        }
    }
}

/// Win/loss record over a user's stored matches.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct CareerStats {
    /// Stored matches.
    pub played: u32,
    /// Matches the user's team won.
    pub won: u32,
    /// Matches ended without a winner count as neither won nor lost.
    pub lost: u32,
    /// Won over played, 0-100.
    pub win_rate: u32,
}

impl CareerStats {
    /// Tally a user's records.
    pub fn from_records(records: &[MatchRecordEntity]) -> Self {
        let played = records.len() as u32;
        let won = records
            .iter()
            .filter(|r| r.winning_team == Some(r.user_team))
            .count() as u32;
        let lost = records
            .iter()
            .filter(|r| r.winning_team.is_some_and(|team| team != r.user_team))
            .count() as u32;

        Self {
            played,
            won,
            lost,
            win_rate: percentage(won, played),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, SystemTime};

    use super::*;
    use crate::state::{MatchSession, scoring::CompletedSet};

    fn record(winning_team: Option<Team>, user_team: Team) -> MatchRecordEntity {
        MatchRecordEntity {
            id: Uuid::nil(),
            schema_version: 1,
            user_id: "u1".into(),
            team1_players: vec!["Ana".into(), "Bea".into()],
            team2_players: vec!["Carla".into(), "Dani".into()],
            winning_team,
            user_team,
            user_player_name: "Ana".into(),
            sets_score: vec![CompletedSet {
                games: [5, 4],
                tiebreak_played: true,
                tiebreak_score: Some([7, 5]),
            }],
            total_points: 40,
            match_data: MatchSession::new(),
            played_at: SystemTime::UNIX_EPOCH + Duration::from_secs(86_400),
        }
    }

    #[test]
    fn list_item_formats_time_and_score() {
        let item = MatchListItem::from(&record(Some(Team::Two), Team::One));
        assert_eq!(item.played_at, "1970-01-02T00:00:00Z");
        assert_eq!(item.score_line, "5-4 (7-5)");
        assert_eq!(item.user_won, Some(false));
    }

    #[test]
    fn career_ignores_unfinished_matches_for_won_and_lost() {
        let records = vec![
            record(Some(Team::One), Team::One),
            record(Some(Team::One), Team::Two),
            record(None, Team::One),
        ];
        let stats = CareerStats::from_records(&records);

        assert_eq!(stats.played, 3);
        assert_eq!(stats.won, 1);
        assert_eq!(stats.lost, 1);
        assert_eq!(stats.win_rate, 33);
    }

    #[test]
    fn career_of_nobody_is_zero() {
        assert_eq!(CareerStats::from_records(&[]), CareerStats::default());
    }
}
