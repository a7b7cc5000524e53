use std::collections::BTreeMap;

use super::state::{PlayerId, RoundRecord, RoundState, SessionState};

/// Score change for one player's round.
pub fn round_delta(bid: u8, made: bool) -> i32 {
    let value = 5 + i32::from(bid);
    if made {
        value
    } else {
        -value
    }
}

/// Fill `made` and `deltas` for a finished round from the tricks each player won.
///
/// Players without a recorded bid are treated as having bid zero.
pub fn score_round(record: &mut RoundRecord, trick_counts: &BTreeMap<PlayerId, u8>) {
    let players: Vec<PlayerId> = record.present.keys().cloned().collect();
    for pid in players {
        let bid = record.bids.get(&pid).copied().unwrap_or(0);
        let won = trick_counts.get(&pid).copied().unwrap_or(0);
        let made = won == bid;
        record.made.insert(pid.clone(), made);
        record.deltas.insert(pid, round_delta(bid, made));
    }
}

/// Cumulative scores, summed over every scored round.
pub fn cumulative_scores(state: &SessionState) -> BTreeMap<PlayerId, i32> {
    let mut totals: BTreeMap<PlayerId, i32> =
        state.seats.iter().map(|s| (s.id.clone(), 0)).collect();
    for record in state.rounds.values() {
        if record.state != RoundState::Scored {
            continue;
        }
        for (pid, delta) in &record.deltas {
            *totals.entry(pid.clone()).or_insert(0) += delta;
        }
    }
    totals
}

/// Highest cumulative score; ties go to the earlier seat.
pub fn leader_by_score(state: &SessionState) -> Option<(PlayerId, i32)> {
    let totals = cumulative_scores(state);
    let mut best: Option<(PlayerId, i32)> = None;
    for seat in &state.seats {
        let score = totals.get(&seat.id).copied().unwrap_or(0);
        match &best {
            Some((_, s)) if *s >= score => {}
            _ => best = Some((seat.id.clone(), score)),
        }
    }
    best
}
