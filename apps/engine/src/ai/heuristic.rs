//! Heuristic bot, tuned by difficulty.
//!
//! Bidding:
//! - Estimate tricks from trump length, top cards and short suits, scaled
//!   for the number of players at the table.
//! - Take the closest legal bid, rounding down on ties.
//!
//! Play:
//! - Behind on bid: win as cheaply as possible.
//! - Bid reached: try to lose, shedding high cards when playing last.
//! - On lead: low from the longest suit.
//!
//! Difficulty adds noise: `Easy` mis-bids often and sometimes plays a random
//! legal card, `Normal` mis-bids occasionally, `Hard` plays straight and
//! also dumps its highest losing card when it wants to lose.
//!
//! All randomness comes from the seed passed in, so a given decision point
//! always yields the same move.

use std::collections::BTreeMap;

use parking_lot::Mutex;
use rand::seq::IndexedRandom;
use rand::Rng;

use crate::ai::{AiError, AiPlayer};
use crate::domain::player_view::CurrentRoundInfo;
use crate::domain::rng::Mulberry32;
use crate::domain::{card_beats, Card, Difficulty, Rank, Suit, TrickPlay};

pub struct Heuristic {
    difficulty: Difficulty,
    rng: Mutex<Mulberry32>,
}

impl Heuristic {
    pub const NAME: &'static str = "Heuristic";

    pub fn new(difficulty: Difficulty, seed: u32) -> Self {
        Self {
            difficulty,
            rng: Mutex::new(Mulberry32::new(seed)),
        }
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    // ---------- Utilities ----------

    fn lowest(cards: &[Card]) -> Option<Card> {
        cards.iter().copied().min_by_key(|c| c.rank)
    }

    fn lowest_in_suit(cards: &[Card], suit: Suit) -> Option<Card> {
        cards
            .iter()
            .copied()
            .filter(|c| c.suit == suit)
            .min_by_key(|c| c.rank)
    }

    fn current_winner(plays: &[TrickPlay], trump: Suit) -> Option<Card> {
        let lead = plays.first()?.card.suit;
        let mut best = plays[0].card;
        for p in &plays[1..] {
            if card_beats(p.card, best, lead, trump) {
                best = p.card;
            }
        }
        Some(best)
    }

    /// Coarse hand strength estimate in tricks.
    fn estimate_tricks(state: &CurrentRoundInfo) -> f32 {
        let Some(trump) = state.trump else {
            return 0.0;
        };
        let mut by_suit: BTreeMap<Suit, Vec<Card>> = BTreeMap::new();
        for c in &state.hand {
            by_suit.entry(c.suit).or_default().push(*c);
        }
        let trump_len = by_suit.get(&trump).map_or(0, Vec::len);

        let mut estimate = 0.0f32;
        for (suit, cards) in &by_suit {
            for c in cards {
                estimate += if *suit == trump {
                    match c.rank {
                        Rank::Ace => 0.95,
                        Rank::King => 0.8,
                        Rank::Queen => 0.6,
                        _ if trump_len >= 3 => 0.4,
                        _ => 0.25,
                    }
                } else {
                    match c.rank {
                        Rank::Ace => 0.85,
                        Rank::King if cards.len() >= 2 => 0.5,
                        Rank::Queen if cards.len() >= 3 => 0.2,
                        _ => 0.0,
                    }
                };
            }
        }

        // Ruffing potential from short side suits.
        if trump_len > 0 {
            let short = Suit::ALL
                .iter()
                .filter(|s| **s != trump)
                .filter(|s| by_suit.get(s).map_or(0, Vec::len) <= 1)
                .count();
            estimate += 0.3 * short.min(trump_len) as f32;
        }

        // More opponents means fewer tricks for the same cards.
        let players = state.order.len().max(2) as f32;
        let scaled = estimate * (4.0 / players).sqrt();
        scaled.clamp(0.0, f32::from(state.tricks))
    }

    /// Pick the legal bid closest to the estimate (bias downward on ties).
    fn choose_bid_from_estimate(legal: &[u8], estimate: f32) -> Option<u8> {
        let mut best = *legal.first()?;
        let mut best_delta = (f32::from(best) - estimate).abs();
        for &b in &legal[1..] {
            let d = (f32::from(b) - estimate).abs();
            if d < best_delta || (d == best_delta && b < best) {
                best = b;
                best_delta = d;
            }
        }
        Some(best)
    }

    /// Nudge a bid by the difficulty's noise, staying within `legal`.
    fn jitter_bid(&self, bid: u8, legal: &[u8]) -> u8 {
        let (chance, spread) = match self.difficulty {
            Difficulty::Easy => (0.6, 2),
            Difficulty::Normal => (0.25, 1),
            Difficulty::Hard => return bid,
        };
        let mut rng = self.rng.lock();
        if !rng.random_bool(chance) {
            return bid;
        }
        let shift: i16 = rng.random_range(-spread..=spread);
        let max = legal.last().copied().unwrap_or(0);
        (i16::from(bid) + shift).clamp(0, i16::from(max)) as u8
    }

    /// Cheapest card that beats the current winner, or the lowest legal card.
    fn pick_smallest_winning_or_low(legal: &[Card], plays: &[TrickPlay], trump: Suit) -> Card {
        debug_assert!(!legal.is_empty(), "No legal plays provided to heuristic");
        if let (Some(lead), Some(w)) = (plays.first().map(|p| p.card.suit), Self::current_winner(plays, trump)) {
            let mut winners: Vec<Card> = legal
                .iter()
                .copied()
                .filter(|&c| card_beats(c, w, lead, trump))
                .collect();
            // Prefer non-trump winners, then lowest rank.
            winners.sort_by_key(|c| (c.suit == trump, c.rank));
            if let Some(first) = winners.first() {
                return *first;
            }
            if let Some(low) = Self::lowest_in_suit(legal, lead) {
                return low;
            }
        }
        Self::lowest(legal).unwrap_or(legal[0])
    }

    /// A card that does not take the trick; `shed_high` prefers the highest such card.
    fn pick_losing(legal: &[Card], plays: &[TrickPlay], trump: Suit, shed_high: bool) -> Card {
        let lead = plays.first().map(|p| p.card.suit);
        let winner = Self::current_winner(plays, trump);
        let mut losers: Vec<Card> = match (lead, winner) {
            (Some(l), Some(w)) => legal
                .iter()
                .copied()
                .filter(|&c| !card_beats(c, w, l, trump))
                .collect(),
            _ => Vec::new(),
        };
        losers.sort_by_key(|c| c.rank);
        let pick = if shed_high { losers.last() } else { losers.first() };
        pick.copied()
            .or_else(|| Self::lowest(legal))
            .unwrap_or(legal[0])
    }

    /// Whether a seat that wants to lose should dump its highest loser.
    /// Last to play, nothing can overtake it.
    fn sheds_high(&self, state: &CurrentRoundInfo) -> bool {
        self.difficulty == Difficulty::Hard || state.players_after_me() == 0
    }

    fn pick_lead(state: &CurrentRoundInfo, legal: &[Card], trump: Suit, need_more: bool) -> Card {
        // Cash a side-suit ace when tricks are still needed.
        if need_more {
            if let Some(ace) = legal
                .iter()
                .copied()
                .find(|c| c.rank == Rank::Ace && c.suit != trump)
            {
                return ace;
            }
        }
        let mut counts: BTreeMap<Suit, usize> = BTreeMap::new();
        for c in &state.hand {
            *counts.entry(c.suit).or_insert(0) += 1;
        }
        let longest = counts
            .iter()
            .filter(|(suit, _)| legal.iter().any(|c| c.suit == **suit))
            .max_by_key(|(suit, n)| (**n, **suit != trump))
            .map(|(suit, _)| *suit);
        longest
            .and_then(|suit| Self::lowest_in_suit(legal, suit))
            .or_else(|| Self::lowest(legal))
            .unwrap_or(legal[0])
    }
}

impl AiPlayer for Heuristic {
    fn choose_bid(&self, state: &CurrentRoundInfo) -> Result<u8, AiError> {
        let legal = state.legal_bids();
        let est = Self::estimate_tricks(state);
        let Some(bid) = Self::choose_bid_from_estimate(&legal, est) else {
            return Err(AiError::InvalidMove("No legal bids".into()));
        };
        Ok(self.jitter_bid(bid, &legal))
    }

    fn choose_play(&self, state: &CurrentRoundInfo) -> Result<Card, AiError> {
        let legal = state.legal_plays();
        if legal.is_empty() {
            return Err(AiError::InvalidMove("No legal plays".into()));
        }
        let trump = state
            .trump
            .ok_or_else(|| AiError::Internal("round has no trump".into()))?;

        let random_chance = match self.difficulty {
            Difficulty::Easy => 0.35,
            Difficulty::Normal => 0.08,
            Difficulty::Hard => 0.0,
        };
        if random_chance > 0.0 {
            let mut rng = self.rng.lock();
            if rng.random_bool(random_chance) {
                return legal
                    .choose(&mut *rng)
                    .copied()
                    .ok_or_else(|| AiError::Internal("empty legal set".into()));
            }
        }

        let need_more = state.my_tricks() < state.my_bid().unwrap_or(0);
        let plays = &state.current_trick_plays;
        let choice = if plays.is_empty() {
            Self::pick_lead(state, &legal, trump, need_more)
        } else if need_more {
            Self::pick_smallest_winning_or_low(&legal, plays, trump)
        } else {
            Self::pick_losing(&legal, plays, trump, self.sheds_high(state))
        };
        Ok(choice)
    }
}
