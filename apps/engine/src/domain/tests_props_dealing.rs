// Property-based tests for dealing: conservation and determinism.

use proptest::prelude::*;

use crate::domain::dealing::{full_decks, start_round, StartRoundParams};
use crate::domain::rules::{tricks_for_round, use_two_decks};
use crate::domain::{test_gens, test_prelude, Card, PlayerId};

fn players(n: usize) -> Vec<PlayerId> {
    (0..n).map(|i| PlayerId::new(format!("p{i}"))).collect()
}

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    /// Hands, stock and indicator together are exactly the deck(s).
    #[test]
    fn prop_deal_conserves_cards((seed, n, dealer) in test_gens::session_params(),
                                 round in test_gens::round_no()) {
        let ps = players(n);
        let two = use_two_decks(n);
        let params = StartRoundParams {
            round,
            players: &ps,
            dealer: &ps[dealer],
            tricks: tricks_for_round(round).unwrap(),
            use_two_decks: two,
        };
        let deal = start_round(&params, seed as u32).unwrap();

        let mut seen: Vec<Card> = deal.hands.values().flatten().copied().collect();
        seen.extend(deal.undealt.iter().copied());
        seen.extend(deal.trump_card);
        seen.sort();
        let mut expected = full_decks(two);
        expected.sort();
        prop_assert_eq!(seen, expected);

        for hand in deal.hands.values() {
            prop_assert_eq!(hand.len(), usize::from(params.tricks));
        }
    }

    /// Same params and seed give the same deal.
    #[test]
    fn prop_deal_is_deterministic((seed, n, dealer) in test_gens::session_params(),
                                  round in test_gens::round_no()) {
        let ps = players(n);
        let params = StartRoundParams {
            round,
            players: &ps,
            dealer: &ps[dealer],
            tricks: tricks_for_round(round).unwrap(),
            use_two_decks: use_two_decks(n),
        };
        let a = start_round(&params, seed as u32).unwrap();
        let b = start_round(&params, seed as u32).unwrap();
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(&a.first_to_act, &a.order[0]);
        let dealer_pos = a.order.iter().position(|p| *p == ps[dealer]).unwrap();
        prop_assert_eq!(dealer_pos, n - 1, "dealer acts last");
    }
}
