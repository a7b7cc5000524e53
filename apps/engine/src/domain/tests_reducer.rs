use crate::domain::events::{Event, EventKind};
use crate::domain::reducer::{apply, replay};
use crate::domain::state::{expected_bidder, Phase, PlayerId, RoundState, SeatInfo};
use crate::domain::store::SessionStore;
use crate::domain::test_state_helpers::{all_bot_seats, drive, new_store, playing_state, seats};
use crate::domain::{parse_cards, Card, Suit};
use crate::errors::domain::{ConflictKind, DomainError, ValidationKind};

fn ev(kind: EventKind) -> Event {
    Event::stamped(kind, 0, 0)
}

fn kind_of(err: &DomainError) -> Option<&ValidationKind> {
    err.validation_kind()
}

/// Three seats with the human first to bid in round 1.
fn human_first_store() -> SessionStore {
    let store = SessionStore::new();
    store
        .append_batch(
            vec![EventKind::SessionReset {
                session_seed: 77,
                seats: seats(3),
                starting_dealer: 2,
            }],
            0,
        )
        .unwrap();
    drive(&store, 10);
    store
}

#[test]
fn reset_rejects_bad_tables() {
    let state = crate::domain::SessionState::empty();
    let err = apply(
        &state,
        &ev(EventKind::SessionReset {
            session_seed: 1,
            seats: seats(1),
            starting_dealer: 0,
        }),
    )
    .unwrap_err();
    assert_eq!(kind_of(&err), Some(&ValidationKind::InvalidPlayerCount));

    let dupes = vec![SeatInfo::human("x", "X"), SeatInfo::human("x", "Y")];
    assert!(apply(
        &state,
        &ev(EventKind::SessionReset {
            session_seed: 1,
            seats: dupes,
            starting_dealer: 0,
        }),
    )
    .is_err());
}

#[test]
fn human_first_store_waits_on_human_bid() {
    let store = human_first_store();
    let state = store.snapshot();
    assert_eq!(state.phase, Phase::Bidding);
    assert_eq!(state.order[0], PlayerId::from("you"));
    assert_eq!(expected_bidder(&state), Some(PlayerId::from("you")));
}

#[test]
fn bid_batch_with_illegal_second_event_applies_nothing() {
    let store = human_first_store();
    let before = store.snapshot();
    let version = store.version();

    let err = store
        .append_batch(
            vec![
                EventKind::bid_set(1, "you", 3),
                EventKind::bid_set(1, "you", 99),
            ],
            5,
        )
        .unwrap_err();
    assert_eq!(kind_of(&err), Some(&ValidationKind::InvalidBid));
    assert_eq!(store.version(), version);
    assert_eq!(*store.snapshot(), *before);
    assert!(store.snapshot().rounds[&1].bids.is_empty());
}

#[test]
fn duplicate_bid_is_a_conflict() {
    let store = human_first_store();
    let err = store
        .append_batch(
            vec![EventKind::bid_set(1, "you", 3), EventKind::bid_set(1, "you", 2)],
            5,
        )
        .unwrap_err();
    assert!(matches!(err, DomainError::Conflict(ConflictKind::AlreadyBid, _)));
}

#[test]
fn bids_follow_seat_order() {
    let store = human_first_store();
    let err = store
        .append_batch(vec![EventKind::bid_set(1, "bot-1", 1)], 5)
        .unwrap_err();
    assert_eq!(kind_of(&err), Some(&ValidationKind::OutOfTurn));

    let err = store
        .append_batch(vec![EventKind::bid_set(2, "you", 1)], 5)
        .unwrap_err();
    assert_eq!(kind_of(&err), Some(&ValidationKind::RoundMismatch));
}

#[test]
fn round_state_cannot_skip_without_correction() {
    let store = human_first_store();
    let err = store
        .append_batch(vec![EventKind::round_state_set(1, RoundState::Complete)], 5)
        .unwrap_err();
    assert_eq!(kind_of(&err), Some(&ValidationKind::InvalidRoundState));

    // Bidding -> Playing needs every bid.
    let err = store
        .append_batch(vec![EventKind::round_state_set(1, RoundState::Playing)], 5)
        .unwrap_err();
    assert_eq!(kind_of(&err), Some(&ValidationKind::InvalidRoundState));

    store
        .append_batch(
            vec![EventKind::RoundStateSet {
                round: 1,
                state: RoundState::Locked,
                correction: true,
            }],
            5,
        )
        .unwrap();
    assert_eq!(store.snapshot().rounds[&1].state, RoundState::Locked);
}

#[test]
fn phase_cannot_jump() {
    let store = human_first_store();
    let err = store
        .append_batch(vec![EventKind::phase_set(Phase::Summary)], 5)
        .unwrap_err();
    assert_eq!(kind_of(&err), Some(&ValidationKind::PhaseMismatch));
}

#[test]
fn dealing_twice_from_setup_is_rejected() {
    let store = new_store(3, seats(2));
    let deal = crate::domain::advance::deal_event(&store.snapshot(), 2).unwrap();
    let err = store.append_batch(vec![deal], 0).unwrap_err();
    assert_eq!(kind_of(&err), Some(&ValidationKind::PhaseMismatch));
}

fn cards(tokens: &[&str]) -> Vec<Card> {
    parse_cards(tokens).unwrap()
}

#[test]
fn completing_a_trick_sets_reveal_and_breaks_trump() {
    let state = playing_state(
        vec![("a", cards(&["2C", "3D"])), ("b", cards(&["4S", "5D"]))],
        Suit::Spades,
    );
    let state = apply(
        &state,
        &Event::stamped(EventKind::trick_played("a", "2C".parse().unwrap()), 100, 0),
    )
    .unwrap();
    assert!(!state.trump_broken);
    let state = apply(
        &state,
        &Event::stamped(EventKind::trick_played("b", "4S".parse().unwrap()), 250, 1),
    )
    .unwrap();
    assert!(state.trump_broken);
    let reveal = state.reveal.clone().unwrap();
    assert_eq!(reveal.winner_id, PlayerId::from("b"));
    assert_eq!(reveal.at, 250);

    // Nothing more may be played until the trick is cleared.
    let err = apply(&state, &ev(EventKind::trick_played("b", "5D".parse().unwrap()))).unwrap_err();
    assert_eq!(kind_of(&err), Some(&ValidationKind::TrickFull));

    let err = apply(
        &state,
        &ev(EventKind::TrickCleared {
            winner_id: PlayerId::from("a"),
        }),
    )
    .unwrap_err();
    assert_eq!(kind_of(&err), Some(&ValidationKind::WinnerMismatch));

    let cleared = apply(
        &state,
        &ev(EventKind::TrickCleared {
            winner_id: PlayerId::from("b"),
        }),
    )
    .unwrap();
    assert!(cleared.trick_plays.is_empty());
    assert_eq!(cleared.trick_counts[&PlayerId::from("b")], 1);
    assert_eq!(cleared.leader_id, Some(PlayerId::from("b")));
    assert_eq!(cleared.last_trick_snapshot.unwrap().plays.len(), 2);
}

#[test]
fn clearing_an_incomplete_trick_is_rejected() {
    let state = playing_state(
        vec![("a", cards(&["2C", "3D"])), ("b", cards(&["4S", "5D"]))],
        Suit::Spades,
    );
    let err = apply(
        &state,
        &ev(EventKind::TrickCleared {
            winner_id: PlayerId::from("a"),
        }),
    )
    .unwrap_err();
    assert_eq!(kind_of(&err), Some(&ValidationKind::TrickIncomplete));
}

#[test]
fn finalize_requires_complete_round() {
    let store = human_first_store();
    let err = store
        .append_batch(vec![EventKind::RoundFinalize { round: 1 }], 5)
        .unwrap_err();
    assert_eq!(kind_of(&err), Some(&ValidationKind::InvalidRoundState));
}

#[test]
fn full_bot_game_replays_to_same_state() {
    let store = new_store(2024, all_bot_seats(4));
    drive(&store, 1_000);
    let state = store.snapshot();
    assert_eq!(state.phase, Phase::Done);
    assert!(state.rounds.values().all(|r| r.state == RoundState::Scored));

    let rebuilt = replay(&store.events()).unwrap();
    assert_eq!(rebuilt, *state);
}

#[test]
fn events_survive_json_round_trip() {
    let store = new_store(5, all_bot_seats(3));
    drive(&store, 40);
    let json = serde_json::to_string(&store.events()).unwrap();
    let back: Vec<Event> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, store.events());
    assert_eq!(replay(&back).unwrap(), *store.snapshot());
}
