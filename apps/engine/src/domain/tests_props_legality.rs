// Property-based tests for play legality.

use proptest::prelude::*;

use crate::domain::test_state_helpers::playing_state;
use crate::domain::tricks::{can_play_card, legal_cards};
use crate::domain::{test_gens, test_prelude, Card, PlayerId, Rank, TrickPlay};

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    /// Every legal card is held, and every held card is legal exactly when
    /// `can_play_card` accepts it.
    #[test]
    fn prop_legal_cards_agree_with_can_play(
        cards in test_gens::unique_cards(12),
        trump in test_gens::suit(),
        split in 1usize..=5,
        leading in any::<bool>(),
        broken in any::<bool>(),
    ) {
        let (follower_hand, rest) = cards.split_at(split);
        let leader_hand: Vec<Card> = rest.iter().take(follower_hand.len()).copied().collect();
        let mut state = playing_state(
            vec![("a", leader_hand.clone()), ("b", follower_hand.to_vec())],
            trump,
        );
        state.trump_broken = broken;
        if !leading {
            // "a" leads with its first card, "b" is to act.
            let lead = leader_hand[0];
            if let Some(h) = state.hands.get_mut(&PlayerId::from("a")) {
                h.retain(|c| *c != lead);
            }
            state.trick_plays.push(TrickPlay { player_id: PlayerId::from("a"), card: lead });
        }
        let actor = if leading { PlayerId::from("a") } else { PlayerId::from("b") };
        let hand = state.hand(&actor).to_vec();
        let legal = legal_cards(&state, &actor);

        prop_assert!(!legal.is_empty() || hand.is_empty());
        for card in &legal {
            prop_assert!(hand.contains(card), "legal card {} not in hand", card);
        }
        for card in &hand {
            prop_assert_eq!(
                legal.contains(card),
                can_play_card(&state, &actor, *card).is_ok(),
                "disagreement on {}", card
            );
        }
    }

    /// When the actor holds the led suit, every legal card is of that suit.
    #[test]
    fn prop_follow_suit((lead, others) in test_gens::suit().prop_flat_map(|s| (Just(s), test_gens::hand_without_suit(s))),
                        trump in test_gens::suit()) {
        let lead_card = Card::new(lead, Rank::Ace);
        let follow_card = Card::new(lead, Rank::Two);
        let mut b_hand = others.clone();
        b_hand.truncate(4);
        b_hand.push(follow_card);
        let a_hand: Vec<Card> = std::iter::repeat(lead_card).take(b_hand.len()).collect();

        let mut state = playing_state(vec![("a", a_hand), ("b", b_hand)], trump);
        state.trick_plays.push(TrickPlay { player_id: PlayerId::from("a"), card: lead_card });
        let legal = legal_cards(&state, &PlayerId::from("b"));
        prop_assert_eq!(legal, vec![follow_card]);
    }
}
