//! Headless game runner.
//!
//! Plays complete sessions through the engine's public `GameFlow` with no
//! timing. The human seat is filled by a heuristic stand-in that submits its
//! moves through the same validated path a person would use.

use std::sync::Arc;

use engine::ai::{create_ai_with_config, AiConfig};
use engine::domain::derive_seed;
use engine::{
    AdvanceIntent, Clock, Difficulty, EngineConfig, EngineError, Event, GameFlow, ManualClock,
    Pending, Phase, PlayerId, SeatInfo, SessionState, Timing,
};
use tracing::debug;

/// Upper bound on planner steps between human decisions.
const MAX_IDLE_STEPS: usize = 1_000;
/// One bid per round plus every card the human can hold, with headroom.
const MAX_HUMAN_ACTIONS: usize = 200;

pub struct GameResult {
    pub seed: u64,
    pub state: Arc<SessionState>,
    pub events: Vec<Event>,
    pub human_actions: usize,
}

impl GameResult {
    /// Final score per seat, in seat order.
    pub fn final_scores(&self) -> Vec<i32> {
        let totals = engine::domain::cumulative_scores(&self.state);
        self.state
            .seats
            .iter()
            .map(|s| totals.get(&s.id).copied().unwrap_or(0))
            .collect()
    }
}

pub struct Simulator {
    players: usize,
    bot_difficulty: Difficulty,
    ai_config: AiConfig,
}

impl Simulator {
    pub fn new(players: usize, bot_difficulty: Difficulty, ai_config: AiConfig) -> Self {
        Self {
            players,
            bot_difficulty,
            ai_config,
        }
    }

    pub fn seats(&self) -> Vec<SeatInfo> {
        let mut seats = vec![SeatInfo::human("human", "Stand-in")];
        seats.extend((1..self.players).map(|i| {
            SeatInfo::bot(format!("bot-{i}"), format!("Bot {i}"), self.bot_difficulty)
        }));
        seats
    }

    pub fn simulate_game(&self, seed: u64) -> Result<GameResult, EngineError> {
        let clock: Arc<dyn Clock> = Arc::new(ManualClock::new(0));
        let config = EngineConfig {
            timing: Timing::instant(),
            starting_dealer: (seed % self.players as u64) as usize,
        };
        let flow = GameFlow::new_session(seed, self.seats(), config, clock)?;
        let human = PlayerId::new("human");

        let mut human_actions = 0;
        loop {
            flow.advance_until_idle(AdvanceIntent::Continue, MAX_IDLE_STEPS)?;
            match flow.pending() {
                Pending::Finished => break,
                Pending::Human(p) if p == human => {
                    self.act_for_human(&flow, &human, human_actions)?;
                    human_actions += 1;
                    if human_actions > MAX_HUMAN_ACTIONS {
                        return Err(EngineError::internal("stand-in exceeded action limit"));
                    }
                }
                other => {
                    return Err(EngineError::internal(format!(
                        "session stalled waiting on {other:?}"
                    )))
                }
            }
        }

        debug!(seed, human_actions, "Simulated game");
        Ok(GameResult {
            seed,
            state: flow.snapshot(),
            events: flow.events(),
            human_actions,
        })
    }

    fn act_for_human(
        &self,
        flow: &GameFlow,
        human: &PlayerId,
        action_no: usize,
    ) -> Result<(), EngineError> {
        let info = flow.round_info(human)?;
        let state = flow.snapshot();
        let purpose = format!("sim-human:{action_no}");
        let ai = create_ai_with_config(
            &self.ai_config,
            self.bot_difficulty,
            derive_seed(state.session_seed, state.round_no, &purpose),
        );

        match state.phase {
            Phase::Bidding => {
                let bid = ai.choose_bid(&info)?;
                flow.submit_bid(human, bid)?;
            }
            Phase::Playing => {
                let card = ai.choose_play(&info)?;
                flow.submit_play(human, card)?;
            }
            phase => {
                return Err(EngineError::internal(format!(
                    "human asked to act during {phase:?}"
                )))
            }
        }
        Ok(())
    }
}
