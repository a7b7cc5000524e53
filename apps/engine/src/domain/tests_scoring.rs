use std::collections::BTreeMap;

use crate::domain::scoring::{cumulative_scores, leader_by_score, round_delta, score_round};
use crate::domain::state::{PlayerId, RoundRecord, RoundState, SessionState};
use crate::domain::test_state_helpers::seats;

#[test]
fn round_delta_rule() {
    assert_eq!(round_delta(3, true), 8);
    assert_eq!(round_delta(3, false), -8);
    assert_eq!(round_delta(0, true), 5);
    assert_eq!(round_delta(0, false), -5);
    assert_eq!(round_delta(10, true), 15);
}

#[test]
fn score_round_marks_made_and_missed() {
    let ids = vec![PlayerId::from("a"), PlayerId::from("b")];
    let mut record = RoundRecord::new(3, &ids);
    record.bids.insert(ids[0].clone(), 2);
    record.bids.insert(ids[1].clone(), 0);
    let counts: BTreeMap<PlayerId, u8> = [(ids[0].clone(), 2), (ids[1].clone(), 1)].into();

    score_round(&mut record, &counts);
    assert!(record.made[&ids[0]]);
    assert!(!record.made[&ids[1]]);
    assert_eq!(record.deltas[&ids[0]], 7);
    assert_eq!(record.deltas[&ids[1]], -5);
}

#[test]
fn cumulative_scores_only_count_scored_rounds() {
    let mut state = SessionState::new(1, seats(2), 0);
    let you = PlayerId::from("you");
    let bot = PlayerId::from("bot-1");
    for (r, state_after, d_you, d_bot) in [
        (1u8, RoundState::Scored, 8, -6),
        (2, RoundState::Scored, -5, 5),
        (3, RoundState::Complete, 100, 100),
    ] {
        let record = state.rounds.get_mut(&r).unwrap();
        record.state = state_after;
        record.deltas.insert(you.clone(), d_you);
        record.deltas.insert(bot.clone(), d_bot);
    }
    let totals = cumulative_scores(&state);
    assert_eq!(totals[&you], 3);
    assert_eq!(totals[&bot], -1);
    assert_eq!(leader_by_score(&state), Some((you, 3)));
}

#[test]
fn leader_ties_go_to_earlier_seat() {
    let state = SessionState::new(1, seats(3), 0);
    assert_eq!(leader_by_score(&state), Some((PlayerId::from("you"), 0)));
}
