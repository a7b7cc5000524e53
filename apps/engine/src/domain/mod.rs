//! Domain layer: pure game logic, events and the session store.

pub mod advance;
pub mod cards_logic;
pub mod cards_parsing;
pub mod cards_types;
pub mod dealing;
pub mod events;
pub mod player_view;
pub mod reducer;
pub mod rng;
pub mod rules;
pub mod scoring;
pub mod seed_derivation;
pub mod state;
pub mod store;
pub mod tricks;

#[cfg(test)]
mod test_gens;
#[cfg(test)]
mod test_prelude;
#[cfg(test)]
pub(crate) mod test_state_helpers;
#[cfg(test)]
mod tests_advance;
#[cfg(test)]
mod tests_props_dealing;
#[cfg(test)]
mod tests_props_legality;
#[cfg(test)]
mod tests_props_trick_winner;
#[cfg(test)]
mod tests_reducer;
#[cfg(test)]
mod tests_scoring;

// Re-exports for ergonomics
pub use advance::{compute_advance_batch, needs_redeal, AdvanceIntent, AdvanceOptions, Pending};
pub use cards_logic::{card_beats, hand_has_suit};
pub use cards_parsing::parse_cards;
pub use cards_types::{Card, Rank, Suit};
pub use dealing::{start_round, Deal, StartRoundParams};
pub use events::{Event, EventKind};
pub use player_view::CurrentRoundInfo;
pub use reducer::{apply, reduce, replay};
pub use rng::{mulberry32, Mulberry32};
pub use rules::{tricks_for_round, valid_bid_range, MAX_PLAYERS, MIN_PLAYERS, ROUNDS};
pub use scoring::{cumulative_scores, round_delta};
pub use seed_derivation::{derive_dealing_seed, derive_seed};
pub use state::{
    Difficulty, LastTrick, Phase, PlayerId, Reveal, RoundRecord, RoundState, SeatInfo, SeatKind,
    SessionState, TrickPlay,
};
pub use store::{BatchGuard, SessionStore};
pub use tricks::{can_play_card, legal_cards, winner_of_trick};
