#![allow(dead_code)]

// tests/common/mod.rs
use std::sync::Arc;

use engine::{
    AdvanceIntent, Clock, Difficulty, EngineConfig, GameFlow, ManualClock, Pending, Phase,
    PlayerId, SeatInfo, Timing,
};

// Logging is auto-installed for every test binary that includes this module
#[ctor::ctor]
fn init_logging() {
    engine_test_support::test_logging::init();
}

pub fn you() -> PlayerId {
    PlayerId::new("you")
}

/// The human first, then `n - 1` bots of the given difficulty.
pub fn table(n: usize, difficulty: Difficulty) -> Vec<SeatInfo> {
    let mut seats = vec![SeatInfo::human("you", "You")];
    seats.extend((1..n).map(|i| SeatInfo::bot(format!("bot-{i}"), format!("Bot {i}"), difficulty)));
    seats
}

pub fn instant_config(starting_dealer: usize) -> EngineConfig {
    EngineConfig {
        timing: Timing::instant(),
        starting_dealer,
    }
}

/// A session on a manual clock starting at 1000ms.
pub fn manual_session(
    seed: u64,
    seats: Vec<SeatInfo>,
    config: EngineConfig,
) -> (GameFlow, ManualClock) {
    let clock = ManualClock::new(1_000);
    let shared: Arc<dyn Clock> = Arc::new(clock.clone());
    let flow = GameFlow::new_session(seed, seats, config, shared).expect("session starts");
    (flow, clock)
}

/// Play the human seat with the lowest legal bid and the first legal card
/// until the game is over. Returns the number of human actions taken.
pub fn play_out(flow: &GameFlow, human: &PlayerId) -> usize {
    let mut actions = 0;
    for _ in 0..2_000 {
        flow.advance_until_idle(AdvanceIntent::Continue, 500)
            .expect("advance succeeds");
        match flow.pending() {
            Pending::Human(p) => {
                assert_eq!(&p, human);
                let state = flow.snapshot();
                match state.phase {
                    Phase::Bidding => {
                        let info = flow.round_info(human).expect("round info");
                        let bid = *info.legal_bids().first().expect("some bid is legal");
                        flow.submit_bid(human, bid).expect("bid accepted");
                    }
                    Phase::Playing => {
                        let card = *flow.legal_cards(human).first().expect("some card is legal");
                        flow.submit_play(human, card).expect("play accepted");
                    }
                    other => panic!("human pending in phase {other:?}"),
                }
                actions += 1;
            }
            Pending::Finished => return actions,
            other => panic!("unexpected idle state {other:?}"),
        }
    }
    panic!("game did not finish");
}
