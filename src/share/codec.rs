//! Compact base64url token carrying a finished match summary.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    analytics::{
        BreakLine, MagiaLine, MatchSummary, PlayerLine, SLOTS, SummaryPlayer,
        distribution::{PointDistribution, TeamPointDistribution},
        flow::{MomentumPoint, StreakInfo},
        magia::{self, MagiaCounts, TeamMagiaStats},
        performance::TeamStats,
    },
    state::{
        MatchSession,
        game::{MagiaKind, Team},
        scoring::CompletedSet,
    },
};

/// Legacy tokens only carried the first four kinds.
const LEGACY_MAGIA_KINDS: usize = 4;

/// Reasons a share token cannot be turned back into a summary.
#[derive(Debug, Error)]
pub enum ShareDecodeError {
    /// The token is not URL-safe base64.
    #[error("token is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    /// The payload is not the expected JSON document.
    #[error("token payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// The payload parsed but a field has the wrong shape.
    #[error("token field `{0}` is malformed")]
    Malformed(&'static str),
}

/// Wire payload of a share token. Keys are kept short to keep links short.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct SharedMatchData {
    /// Player names in slot order.
    p: Vec<String>,
    /// Games per completed set.
    s: Vec<Vec<u32>>,
    /// Tiebreak score per completed set.
    tb: Vec<Option<Vec<u32>>>,
    /// Winning team, 0 when none.
    w: u8,
    /// Per slot: winners, unforced, forced, effectiveness.
    ps: Vec<Vec<u32>>,
    /// Per team: points won, winners, unforced, forced.
    ts: Vec<Vec<u32>>,
    /// Longest streak per team.
    st: Vec<u32>,
    /// Breaks per team.
    bp: Vec<u32>,
    /// Total, winner %, unforced %, forced %, winners, unforced, forced.
    d: Vec<u32>,
    /// Per team: points won, by winner, by unforced, by forced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    dt: Option<Vec<Vec<u32>>>,
    /// Per slot shot counts in kind order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    mg: Option<Vec<Vec<u32>>>,
    /// Per team shot counts in kind order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    mt: Option<Vec<Vec<u32>>>,
    /// Momentum differential per sample.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    mo: Option<Vec<i32>>,
}

/// Encode the summary of `session` as a URL-safe token.
pub fn encode(session: &MatchSession) -> String {
    encode_summary(&MatchSummary::from_session(session))
}

/// Encode an already computed summary as a URL-safe token.
pub fn encode_summary(summary: &MatchSummary) -> String {
    let data = SharedMatchData::from(summary);
    // Plain vectors and strings always serialize.
    let json = serde_json::to_vec(&data).unwrap_or_default();
    URL_SAFE_NO_PAD.encode(json)
}

/// Decode a token produced by [`encode`].
///
/// Trailing padding is tolerated. Any other deviation is reported as an error;
/// this never panics on untrusted input.
pub fn decode(token: &str) -> Result<MatchSummary, ShareDecodeError> {
    let bytes = URL_SAFE_NO_PAD.decode(token.trim().trim_end_matches('='))?;
    let data: SharedMatchData = serde_json::from_slice(&bytes)?;
    data.into_summary()
}

fn counts_row(counts: &MagiaCounts) -> Vec<u32> {
    MagiaKind::ALL
        .iter()
        .map(|kind| counts.get(kind).copied().unwrap_or_default())
        .collect()
}

impl From<&MatchSummary> for SharedMatchData {
    fn from(summary: &MatchSummary) -> Self {
        Self {
            p: summary.players.iter().map(|p| p.name.clone()).collect(),
            s: summary
                .completed_sets
                .iter()
                .map(|set| set.games.to_vec())
                .collect(),
            tb: summary
                .completed_sets
                .iter()
                .map(|set| {
                    set.tiebreak_score
                        .filter(|_| set.tiebreak_played)
                        .map(|score| score.to_vec())
                })
                .collect(),
            w: summary.winning_team.map(Team::number).unwrap_or(0),
            ps: summary
                .player_stats
                .iter()
                .map(|line| {
                    vec![
                        line.winners,
                        line.unforced_errors,
                        line.forced_errors,
                        line.effectiveness,
                    ]
                })
                .collect(),
            ts: summary
                .team_stats
                .iter()
                .map(|team| {
                    vec![
                        team.total_points_won,
                        team.total_winners,
                        team.total_unforced_errors,
                        team.total_forced_errors,
                    ]
                })
                .collect(),
            st: summary.streaks.iter().map(|s| s.longest_streak).collect(),
            bp: summary.breaks.iter().map(|b| b.break_points_won).collect(),
            d: {
                let d = &summary.distribution;
                vec![
                    d.total_points,
                    d.winner_pct,
                    d.unforced_pct,
                    d.forced_pct,
                    d.decided_by_winner,
                    d.decided_by_unforced_error,
                    d.decided_by_forced_error,
                ]
            },
            dt: summary.team_distribution.as_ref().map(|teams| {
                teams
                    .iter()
                    .map(|t| {
                        vec![
                            t.total_points_won,
                            t.by_winner,
                            t.by_unforced_error,
                            t.by_forced_error,
                        ]
                    })
                    .collect()
            }),
            mg: summary
                .magia_players
                .as_ref()
                .map(|lines| lines.iter().map(|line| counts_row(&line.by_type)).collect()),
            mt: summary
                .magia_teams
                .as_ref()
                .map(|teams| teams.iter().map(|team| counts_row(&team.by_type)).collect()),
            mo: summary
                .momentum
                .as_ref()
                .map(|series| series.iter().map(|m| m.differential).collect()),
        }
    }
}

fn fixed<const N: usize>(row: &[u32], field: &'static str) -> Result<[u32; N], ShareDecodeError> {
    row.try_into().map_err(|_| ShareDecodeError::Malformed(field))
}

fn fixed_rows<const R: usize, const C: usize>(
    rows: &[Vec<u32>],
    field: &'static str,
) -> Result<[[u32; C]; R], ShareDecodeError> {
    let parsed = rows
        .iter()
        .map(|row| fixed::<C>(row, field))
        .collect::<Result<Vec<_>, _>>()?;
    parsed
        .try_into()
        .map_err(|_| ShareDecodeError::Malformed(field))
}

fn magia_counts(row: &[u32], field: &'static str) -> Result<MagiaCounts, ShareDecodeError> {
    if row.len() != MagiaKind::ALL.len() && row.len() != LEGACY_MAGIA_KINDS {
        return Err(ShareDecodeError::Malformed(field));
    }
    Ok(MagiaKind::ALL
        .iter()
        .enumerate()
        .map(|(at, kind)| (*kind, row.get(at).copied().unwrap_or_default()))
        .collect())
}

fn magia_rows<const R: usize>(
    rows: &[Vec<u32>],
    field: &'static str,
) -> Result<[MagiaCounts; R], ShareDecodeError> {
    let parsed = rows
        .iter()
        .map(|row| magia_counts(row, field))
        .collect::<Result<Vec<_>, _>>()?;
    parsed
        .try_into()
        .map_err(|_| ShareDecodeError::Malformed(field))
}

impl SharedMatchData {
    fn into_summary(self) -> Result<MatchSummary, ShareDecodeError> {
        let names: [String; 4] = self
            .p
            .try_into()
            .map_err(|_| ShareDecodeError::Malformed("p"))?;

        if self.s.len() != self.tb.len() {
            return Err(ShareDecodeError::Malformed("tb"));
        }
        let completed_sets = self
            .s
            .iter()
            .zip(&self.tb)
            .map(|(games, tiebreak)| {
                let tiebreak_score = tiebreak
                    .as_deref()
                    .map(|score| fixed::<2>(score, "tb"))
                    .transpose()?;
                Ok(CompletedSet {
                    games: fixed::<2>(games, "s")?,
                    tiebreak_played: tiebreak_score.is_some(),
                    tiebreak_score,
                })
            })
            .collect::<Result<Vec<_>, ShareDecodeError>>()?;

        let winning_team = match self.w {
            0 => None,
            number => Some(Team::try_from(number).map_err(|_| ShareDecodeError::Malformed("w"))?),
        };

        let ps = fixed_rows::<4, 4>(&self.ps, "ps")?;
        let ts = fixed_rows::<2, 4>(&self.ts, "ts")?;
        let st = fixed::<2>(&self.st, "st")?;
        let bp = fixed::<2>(&self.bp, "bp")?;
        let d = fixed::<7>(&self.d, "d")?;
        let dt = self
            .dt
            .as_deref()
            .map(|rows| fixed_rows::<2, 4>(rows, "dt"))
            .transpose()?;
        let mg = self
            .mg
            .as_deref()
            .map(|rows| magia_rows::<4>(rows, "mg"))
            .transpose()?;
        let mt = self
            .mt
            .as_deref()
            .map(|rows| magia_rows::<2>(rows, "mt"))
            .transpose()?;

        let players = std::array::from_fn(|slot| {
            let (team, position) = SLOTS[slot];
            SummaryPlayer {
                name: names[slot].clone(),
                team,
                position,
            }
        });
        let player_stats = std::array::from_fn(|slot| {
            let (team, position) = SLOTS[slot];
            let [winners, unforced_errors, forced_errors, effectiveness] = ps[slot];
            PlayerLine {
                player_name: names[slot].clone(),
                team,
                position,
                winners,
                unforced_errors,
                forced_errors,
                effectiveness,
            }
        });
        let team_stats = Team::BOTH.map(|team| {
            let [won, winners, unforced, forced] = ts[team.index()];
            TeamStats {
                team,
                total_points_won: won,
                total_winners: winners,
                total_unforced_errors: unforced,
                total_forced_errors: forced,
            }
        });
        let team_distribution = dt.map(|rows| {
            Team::BOTH.map(|team| {
                let [won, winner, unforced, forced] = rows[team.index()];
                TeamPointDistribution::from_counts(team, won, winner, unforced, forced)
            })
        });

        // Shot stats are only meaningful when both the player and team rows are present.
        let (magia_players, magia_teams) = match (mg, mt) {
            (Some(players), Some([team_one, team_two])) => {
                let magia_players = std::array::from_fn(|slot| MagiaLine {
                    player_name: names[slot].clone(),
                    team: SLOTS[slot].0,
                    total: magia::total_of(&players[slot]),
                    by_type: players[slot].clone(),
                });
                (
                    Some(magia_players),
                    Some([
                        TeamMagiaStats::from_counts(Team::One, team_one),
                        TeamMagiaStats::from_counts(Team::Two, team_two),
                    ]),
                )
            }
            _ => (None, None),
        };

        let momentum = self.mo.map(|series| {
            series
                .into_iter()
                .enumerate()
                .map(|(index, differential)| MomentumPoint {
                    index: index as u32,
                    differential,
                })
                .collect()
        });

        Ok(MatchSummary {
            players,
            completed_sets,
            winning_team,
            player_stats,
            team_stats,
            streaks: Team::BOTH.map(|team| StreakInfo {
                team,
                longest_streak: st[team.index()],
            }),
            breaks: Team::BOTH.map(|team| BreakLine {
                team,
                break_points_won: bp[team.index()],
            }),
            distribution: PointDistribution {
                total_points: d[0],
                winner_pct: d[1],
                unforced_pct: d[2],
                forced_pct: d[3],
                decided_by_winner: d[4],
                decided_by_unforced_error: d[5],
                decided_by_forced_error: d[6],
            },
            team_distribution,
            magia_players,
            magia_teams,
            momentum,
        })
    }
}
