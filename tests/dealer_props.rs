use std::collections::HashSet;

use guandan_core::domain::dealer::deal_hands;
use proptest::prelude::*;

proptest! {
    #[test]
    fn every_seed_deals_108_distinct_cards_27_per_seat(seed: u64) {
        let hands = deal_hands(seed);
        let mut seen = HashSet::new();
        for hand in &hands {
            prop_assert_eq!(hand.len(), 27);
            for card in hand {
                prop_assert!(seen.insert(*card), "card {:?} dealt to more than one seat", card);
            }
        }
        prop_assert_eq!(seen.len(), 108);
    }

    #[test]
    fn the_same_seed_always_deals_the_same_hands(seed: u64) {
        let a = deal_hands(seed);
        let b = deal_hands(seed);
        prop_assert_eq!(a, b);
    }

    #[test]
    fn hands_are_dealt_in_descending_rank_order(seed: u64) {
        let hands = deal_hands(seed);
        for hand in &hands {
            for window in hand.windows(2) {
                prop_assert!(window[0].rank_value() >= window[1].rank_value());
            }
        }
    }
}
