//! Metrics collection for simulation results.
//!
//! Per-round trick counts are not kept in session state after the next
//! deal, so they are rebuilt from the event log.

use std::collections::BTreeMap;

use engine::{EventKind, PlayerId, RoundState};
use serde::Serialize;

use crate::simulator::GameResult;

/// Complete game metrics for output.
#[derive(Debug, Clone, Serialize)]
pub struct GameMetrics {
    pub game_id: u32,
    pub seed: u64,
    pub timestamp: String,
    pub config: GameConfig,
    pub result: GameResultMetrics,
    pub rounds: Vec<RoundMetrics>,
    pub player_metrics: Vec<PlayerMetrics>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GameConfig {
    pub players: usize,
    pub bot_difficulty: String,
    pub total_games: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct GameResultMetrics {
    pub final_scores: Vec<i32>,
    pub winner: usize,
    pub events: usize,
    pub duration_ms: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoundMetrics {
    pub round_no: u8,
    pub tricks: u8,
    pub dealer: usize,
    pub trump: String,
    pub bids: Vec<Option<u8>>,
    pub tricks_won: Vec<u8>,
    pub deltas: Vec<i32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerMetrics {
    pub seat: usize,
    pub player_id: String,
    pub is_bot: bool,
    pub total_score: i32,
    pub bids_made: u32,
    pub underbids: u32, // tricks > bid
    pub overbids: u32,  // tricks < bid
    pub exact_pct: f64,
    pub avg_tricks_per_round: f64,
}

pub fn build_game_metrics(
    game_id: u32,
    bot_difficulty: &str,
    total_games: u32,
    result: &GameResult,
    duration_ms: f64,
) -> GameMetrics {
    let timestamp = time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| String::from("unknown"));

    let seat_ids: Vec<PlayerId> = result.state.seat_ids();
    let rounds = build_round_metrics(result, &seat_ids);
    let final_scores = result.final_scores();

    // Ties go to the earlier seat.
    let mut winner = 0;
    for (seat, score) in final_scores.iter().enumerate() {
        if *score > final_scores[winner] {
            winner = seat;
        }
    }

    let player_metrics = seat_ids
        .iter()
        .enumerate()
        .map(|(seat, id)| build_player_metrics(result, seat, id, &rounds, final_scores[seat]))
        .collect();

    GameMetrics {
        game_id,
        seed: result.seed,
        timestamp,
        config: GameConfig {
            players: seat_ids.len(),
            bot_difficulty: bot_difficulty.to_string(),
            total_games,
        },
        result: GameResultMetrics {
            final_scores,
            winner,
            events: result.events.len(),
            duration_ms,
        },
        rounds,
        player_metrics,
    }
}

fn build_round_metrics(result: &GameResult, seat_ids: &[PlayerId]) -> Vec<RoundMetrics> {
    let seat_of = |id: &PlayerId| seat_ids.iter().position(|s| s == id);
    let mut rounds: Vec<RoundMetrics> = Vec::new();

    for event in &result.events {
        match &event.kind {
            EventKind::Deal {
                round_no,
                dealer_id,
                trump,
                ..
            } => {
                // A re-deal replaces the round's entry.
                rounds.retain(|r| r.round_no != *round_no);
                let tricks = result
                    .state
                    .rounds
                    .get(round_no)
                    .map(|r| r.tricks)
                    .unwrap_or(0);
                rounds.push(RoundMetrics {
                    round_no: *round_no,
                    tricks,
                    dealer: seat_of(dealer_id).unwrap_or(0),
                    trump: format!("{trump:?}"),
                    bids: vec![None; seat_ids.len()],
                    tricks_won: vec![0; seat_ids.len()],
                    deltas: vec![0; seat_ids.len()],
                });
            }
            EventKind::TrickCleared { winner_id } => {
                if let (Some(round), Some(seat)) = (rounds.last_mut(), seat_of(winner_id)) {
                    round.tricks_won[seat] += 1;
                }
            }
            _ => {}
        }
    }

    for round in &mut rounds {
        let Some(record) = result.state.rounds.get(&round.round_no) else {
            continue;
        };
        for (seat, id) in seat_ids.iter().enumerate() {
            round.bids[seat] = record.bids.get(id).copied();
            if record.state == RoundState::Scored {
                round.deltas[seat] = record.deltas.get(id).copied().unwrap_or(0);
            }
        }
    }
    rounds
}

fn build_player_metrics(
    result: &GameResult,
    seat: usize,
    id: &PlayerId,
    rounds: &[RoundMetrics],
    total_score: i32,
) -> PlayerMetrics {
    let mut bids_made = 0;
    let mut underbids = 0;
    let mut overbids = 0;
    for round in rounds {
        let Some(bid) = round.bids[seat] else {
            continue;
        };
        let won = round.tricks_won[seat];
        if won == bid {
            bids_made += 1;
        } else if won > bid {
            underbids += 1;
        } else {
            overbids += 1;
        }
    }

    let total_bids = bids_made + underbids + overbids;
    let exact_pct = if total_bids > 0 {
        f64::from(bids_made) / f64::from(total_bids) * 100.0
    } else {
        0.0
    };
    let total_tricks: u32 = rounds.iter().map(|r| u32::from(r.tricks_won[seat])).sum();
    let avg_tricks_per_round = if rounds.is_empty() {
        0.0
    } else {
        f64::from(total_tricks) / rounds.len() as f64
    };

    PlayerMetrics {
        seat,
        player_id: id.to_string(),
        is_bot: result.state.seat(id).is_some_and(|s| s.is_bot()),
        total_score,
        bids_made,
        underbids,
        overbids,
        exact_pct,
        avg_tricks_per_round,
    }
}

/// CSV summary row for quick analysis.
#[derive(Debug, Serialize)]
pub struct CsvSummaryRow {
    pub game_id: u32,
    pub seed: u64,
    pub players: usize,
    pub bot_difficulty: String,
    pub winner: usize,
    pub winner_score: i32,
    pub human_score: i32,
    pub human_rank: usize,
    pub events: usize,
}

impl From<&GameMetrics> for CsvSummaryRow {
    fn from(metrics: &GameMetrics) -> Self {
        let scores = &metrics.result.final_scores;
        let human_score = scores.first().copied().unwrap_or(0);
        let human_rank = 1 + scores.iter().filter(|s| **s > human_score).count();
        CsvSummaryRow {
            game_id: metrics.game_id,
            seed: metrics.seed,
            players: metrics.config.players,
            bot_difficulty: metrics.config.bot_difficulty.clone(),
            winner: metrics.result.winner,
            winner_score: scores.get(metrics.result.winner).copied().unwrap_or(0),
            human_score,
            human_rank,
            events: metrics.result.events,
        }
    }
}
