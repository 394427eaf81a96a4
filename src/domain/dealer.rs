use super::cards::{full_deck, Card};
use super::rules::{HAND_SIZE, SEATS};

/// A small, dependency-free splitmix64-style generator. Not cryptographic;
/// chosen so a given seed always produces the same shuffle, which the match
/// history and property tests both rely on.
pub struct SimpleLcg {
    state: u64,
}

impl SimpleLcg {
    pub fn new(seed: u64) -> Self {
        SimpleLcg { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E3779B97F4A7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
        z ^ (z >> 31)
    }

    /// Uniform value in `0..bound` via rejection sampling (avoids modulo bias).
    fn next_range(&mut self, bound: u64) -> u64 {
        if bound == 0 {
            return 0;
        }
        let zone = u64::MAX - (u64::MAX % bound);
        loop {
            let v = self.next_u64();
            if v < zone {
                return v % bound;
            }
        }
    }
}

/// Fisher-Yates shuffle, deterministic given `seed`.
pub fn shuffle_with_seed(cards: &mut [Card], seed: u64) {
    let mut rng = SimpleLcg::new(seed);
    for i in (1..cards.len()).rev() {
        let j = rng.next_range(i as u64 + 1) as usize;
        cards.swap(i, j);
    }
}

/// Natural descending order: higher rank-value first, jokers highest.
pub fn sort_hand(hand: &mut [Card]) {
    hand.sort_by(|a, b| b.rank_value().cmp(&a.rank_value()));
}

/// Build the canonical deck, shuffle it deterministically given `seed`, and
/// slice 27 sorted cards to each of the four seats.
pub fn deal_hands(seed: u64) -> [Vec<Card>; 4] {
    let mut deck = full_deck();
    shuffle_with_seed(&mut deck, seed);

    let mut hands: [Vec<Card>; 4] = Default::default();
    for (seat, chunk) in deck.chunks(HAND_SIZE).take(SEATS).enumerate() {
        hands[seat] = chunk.to_vec();
    }
    for hand in &mut hands {
        sort_hand(hand);
    }
    hands
}
