// Property-based tests for trick resolution.

use proptest::prelude::*;

use crate::domain::tricks::winner_of_trick;
use crate::domain::{card_beats, test_gens, test_prelude, PlayerId, TrickPlay};

fn plays_from(cards: &[crate::domain::Card]) -> Vec<TrickPlay> {
    cards
        .iter()
        .enumerate()
        .map(|(i, c)| TrickPlay {
            player_id: PlayerId::new(format!("p{i}")),
            card: *c,
        })
        .collect()
}

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    /// The winner's card is beaten by no other card in the trick.
    #[test]
    fn prop_winner_is_unbeaten(cards in (2usize..=10).prop_flat_map(test_gens::unique_cards),
                               trump in test_gens::suit()) {
        let plays = plays_from(&cards);
        let lead = cards[0].suit;
        let winner = winner_of_trick(&plays, trump).unwrap();
        let win_card = plays.iter().find(|p| p.player_id == winner).unwrap().card;
        for p in &plays {
            prop_assert!(!card_beats(p.card, win_card, lead, trump),
                "{} beats winning card {}", p.card, win_card);
        }
    }

    /// If any trump was played, the winner played trump; otherwise the
    /// winner followed the lead.
    #[test]
    fn prop_winner_suit(cards in (2usize..=10).prop_flat_map(test_gens::unique_cards),
                        trump in test_gens::suit()) {
        let plays = plays_from(&cards);
        let winner = winner_of_trick(&plays, trump).unwrap();
        let win_card = plays.iter().find(|p| p.player_id == winner).unwrap().card;
        if cards.iter().any(|c| c.suit == trump) {
            prop_assert_eq!(win_card.suit, trump);
        } else {
            prop_assert_eq!(win_card.suit, cards[0].suit);
        }
    }
}
