use crate::config::Timing;
use crate::domain::advance::{
    compute_advance_batch, needs_redeal, pending, AdvanceIntent, AdvanceOptions, Pending,
};
use crate::domain::events::EventKind;
use crate::domain::state::{Phase, PlayerId, RoundState};
use crate::domain::test_state_helpers::{all_bot_seats, drive, new_store, seats};
use crate::domain::SessionState;

fn auto() -> AdvanceOptions {
    AdvanceOptions::auto(Timing::default())
}

fn cont() -> AdvanceOptions {
    AdvanceOptions::user_continue(Timing::default())
}

fn type_names(batch: &[EventKind]) -> Vec<&'static str> {
    batch.iter().map(EventKind::type_name).collect()
}

#[test]
fn setup_plans_first_deal() {
    let store = new_store(9, seats(4));
    let batch = compute_advance_batch(&store.snapshot(), 0, auto()).unwrap();
    assert_eq!(
        type_names(&batch),
        vec!["sp/deal", "round/state-set", "sp/phase-set"]
    );
}

#[test]
fn planner_is_idempotent() {
    let store = new_store(31, all_bot_seats(5));
    for _ in 0..60 {
        let state = store.snapshot();
        let a = compute_advance_batch(&state, 0, cont()).unwrap();
        let b = compute_advance_batch(&state, 0, cont()).unwrap();
        assert_eq!(a, b);
        if a.is_empty() {
            break;
        }
        store.append_batch(a, 0).unwrap();
    }
}

#[test]
fn human_turn_plans_nothing() {
    let store = new_store(12, seats(3));
    drive(&store, 20);
    let state = store.snapshot();
    assert_eq!(pending(&state, &Timing::default()), Pending::Human(PlayerId::from("you")));
    assert!(compute_advance_batch(&state, 0, cont()).unwrap().is_empty());
}

/// Bot-only session advanced until a trick is waiting to be cleared.
fn state_with_reveal() -> SessionState {
    let store = new_store(4, all_bot_seats(3));
    for _ in 0..50 {
        let state = store.snapshot();
        if state.reveal.is_some() {
            return (*state).clone();
        }
        let batch = compute_advance_batch(&state, 1_000, cont()).unwrap();
        store.append_batch(batch, 1_000).unwrap();
    }
    panic!("no trick completed");
}

#[test]
fn auto_advance_honours_reveal_hold() {
    let state = state_with_reveal();
    let hold = Timing::default().reveal_hold_ms;
    let at = state.reveal.as_ref().unwrap().at;

    assert!(compute_advance_batch(&state, at + hold - 1, auto())
        .unwrap()
        .is_empty());
    let batch = compute_advance_batch(&state, at + hold, auto()).unwrap();
    assert_eq!(batch[0].type_name(), "sp/trick-cleared");

    // An explicit continue does not wait.
    let batch = compute_advance_batch(&state, at, cont()).unwrap();
    assert_eq!(batch[0].type_name(), "sp/trick-cleared");
}

#[test]
fn summary_waits_for_timeout_or_continue() {
    let store = new_store(8, all_bot_seats(2));
    for _ in 0..200 {
        let state = store.snapshot();
        if state.phase == Phase::Summary {
            break;
        }
        let batch = compute_advance_batch(&state, 500, cont()).unwrap();
        store.append_batch(batch, 500).unwrap();
    }
    let state = store.snapshot();
    assert_eq!(state.phase, Phase::Summary);
    assert_eq!(state.summary_entered_at, Some(500));
    assert_eq!(state.rounds[&1].state, RoundState::Scored);

    let timeout = Timing::default().summary_auto_advance_ms;
    assert!(compute_advance_batch(&state, 500 + timeout - 1, auto())
        .unwrap()
        .is_empty());
    let next = compute_advance_batch(&state, 500 + timeout, auto()).unwrap();
    assert_eq!(type_names(&next)[0], "sp/deal");
    assert_eq!(compute_advance_batch(&state, 501, cont()).unwrap(), next);
}

#[test]
fn last_trick_scores_round_and_enters_summary() {
    let store = new_store(8, all_bot_seats(2));
    let mut last_batch = Vec::new();
    for _ in 0..200 {
        let state = store.snapshot();
        if state.phase == Phase::Summary {
            break;
        }
        last_batch = compute_advance_batch(&state, 0, cont()).unwrap();
        store.append_batch(last_batch.clone(), 0).unwrap();
    }
    assert_eq!(
        type_names(&last_batch),
        vec![
            "sp/trick-cleared",
            "round/state-set",
            "round/finalize",
            "sp/phase-set"
        ]
    );
}

#[test]
fn game_summary_only_ends_on_continue() {
    let store = new_store(2, all_bot_seats(2));
    for _ in 0..2_000 {
        let state = store.snapshot();
        if state.phase == Phase::GameSummary {
            break;
        }
        let batch = compute_advance_batch(&state, 0, cont()).unwrap();
        store.append_batch(batch, 0).unwrap();
    }
    let state = store.snapshot();
    assert_eq!(state.phase, Phase::GameSummary);
    assert!(compute_advance_batch(&state, u64::MAX, auto())
        .unwrap()
        .is_empty());
    assert_eq!(
        compute_advance_batch(&state, 0, cont()).unwrap(),
        vec![EventKind::phase_set(Phase::Done)]
    );
}

#[test]
fn empty_hands_mid_round_trigger_redeal() {
    let store = new_store(55, seats(3));
    drive(&store, 20);
    let dealt = store.snapshot();
    assert!(!needs_redeal(&dealt));

    let mut lost = (*dealt).clone();
    for hand in lost.hands.values_mut() {
        hand.clear();
    }
    assert!(needs_redeal(&lost));
    let batch = compute_advance_batch(&lost, 0, AdvanceOptions {
        intent: AdvanceIntent::Auto,
        timing: Timing::default(),
    })
    .unwrap();
    match batch.as_slice() {
        [EventKind::Deal { round_no, hands, .. }] => {
            assert_eq!(*round_no, dealt.round_no);
            assert_eq!(*hands, dealt.hands);
        }
        other => panic!("expected a single re-deal, got {other:?}"),
    }
}

#[test]
fn last_trick_reveal_is_not_a_desync() {
    let store = new_store(17, all_bot_seats(3));
    for _ in 0..200 {
        let state = store.snapshot();
        let last = state
            .current_round()
            .is_some_and(|r| state.tricks_won_total() + 1 == r.tricks);
        if state.reveal.is_some() && last {
            assert!(state.hands.values().all(Vec::is_empty));
            assert!(!needs_redeal(&state));
            return;
        }
        let batch = compute_advance_batch(&state, 0, cont()).unwrap();
        store.append_batch(batch, 0).unwrap();
    }
    panic!("round 1 never reached its last trick");
}

#[test]
fn hands_lost_after_a_trick_are_redealt() {
    let mut state = state_with_reveal();
    let batch = compute_advance_batch(&state, 0, cont()).unwrap();
    let store = crate::domain::SessionStore::from_snapshot(state.clone());
    store.append_batch(batch, 0).unwrap();
    state = (*store.snapshot()).clone();
    assert_eq!(state.tricks_won_total(), 1);

    for hand in state.hands.values_mut() {
        hand.clear();
    }
    assert!(needs_redeal(&state));
    match compute_advance_batch(&state, 0, auto()).unwrap().as_slice() {
        [EventKind::Deal { round_no, .. }] => assert_eq!(*round_no, state.round_no),
        other => panic!("expected a single re-deal, got {other:?}"),
    }
}
