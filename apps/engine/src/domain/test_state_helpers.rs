//! Test-only session builders for domain unit tests.

use std::collections::BTreeMap;

use crate::config::Timing;
use crate::domain::advance::{compute_advance_batch, AdvanceOptions};
use crate::domain::events::EventKind;
use crate::domain::state::{Difficulty, Phase, PlayerId, RoundState, SeatInfo, SessionState};
use crate::domain::store::SessionStore;
use crate::domain::{Card, Suit};

/// One human ("you") followed by `n - 1` bots.
pub fn seats(n: usize) -> Vec<SeatInfo> {
    let mut seats = vec![SeatInfo::human("you", "You")];
    for i in 1..n {
        seats.push(SeatInfo::bot(
            format!("bot-{i}"),
            format!("Bot {i}"),
            Difficulty::Normal,
        ));
    }
    seats
}

/// Bots in every seat.
pub fn all_bot_seats(n: usize) -> Vec<SeatInfo> {
    (0..n)
        .map(|i| SeatInfo::bot(format!("bot-{i}"), format!("Bot {i}"), Difficulty::Hard))
        .collect()
}

pub fn reset_event(seed: u64, seats: Vec<SeatInfo>) -> EventKind {
    EventKind::SessionReset {
        session_seed: seed,
        seats,
        starting_dealer: 0,
    }
}

/// A store holding a freshly reset session.
pub fn new_store(seed: u64, seats: Vec<SeatInfo>) -> SessionStore {
    let store = SessionStore::new();
    store
        .append_batch(vec![reset_event(seed, seats)], 0)
        .expect("reset applies");
    store
}

/// Apply planner batches with `Continue` until it has nothing more to do
/// or `max_steps` is reached. Returns the number of batches applied.
pub fn drive(store: &SessionStore, max_steps: usize) -> usize {
    let timing = Timing::default();
    for step in 0..max_steps {
        let state = store.snapshot();
        let batch = compute_advance_batch(&state, 0, AdvanceOptions::user_continue(timing))
            .expect("planner succeeds");
        if batch.is_empty() {
            return step;
        }
        store.append_batch(batch, 0).expect("planned batch applies");
    }
    max_steps
}

/// Hand-built mid-round state in `playing` with every bid in.
///
/// `hands` are given in seat order; seat order is also the round order and
/// the first seat leads.
pub fn playing_state(hands: Vec<(&str, Vec<Card>)>, trump: Suit) -> SessionState {
    let seat_list: Vec<SeatInfo> = hands
        .iter()
        .enumerate()
        .map(|(i, (id, _))| {
            if i == 0 {
                SeatInfo::human(*id, *id)
            } else {
                SeatInfo::bot(*id, *id, Difficulty::Normal)
            }
        })
        .collect();
    let mut state = SessionState::new(1, seat_list, 0);
    let order: Vec<PlayerId> = hands.iter().map(|(id, _)| PlayerId::from(*id)).collect();
    let tricks = hands.first().map_or(0, |(_, h)| h.len() as u8);

    state.phase = Phase::Playing;
    state.round_no = 11 - tricks.clamp(1, 10);
    state.dealer_id = order.last().cloned();
    state.leader_id = order.first().cloned();
    state.trump = Some(trump);
    state.hands = hands
        .into_iter()
        .map(|(id, h)| (PlayerId::from(id), h))
        .collect::<BTreeMap<_, _>>();
    state.trick_counts = order.iter().map(|p| (p.clone(), 0)).collect();
    state.order = order.clone();
    if let Some(record) = state.rounds.get_mut(&state.round_no) {
        record.state = RoundState::Playing;
        record.tricks = tricks;
        for p in &order {
            record.bids.insert(p.clone(), 0);
        }
    }
    state
}
