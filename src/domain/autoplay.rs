use std::collections::BTreeMap;

use super::cards::{Card, Rank};
use super::combo::{self, Combination, ComboKind};
use super::tribute::select_return_card;
use super::trick::Trick;

/// What an automated seat (trusteeship, or a seat that missed its deadline)
/// does instead of waiting for a human decision.
#[derive(Debug, Clone)]
pub enum PlayDecision {
    Play(Vec<Card>),
    Pass,
}

/// A pluggable decision-maker for seats under automatic control. The engine
/// calls this whenever a seat is in trusteeship or a deadline lapses; it
/// never sees anything the seat itself couldn't see.
pub trait AutoPlayStrategy: Send + Sync {
    fn choose_play(&self, hand: &[Card], trick: &Trick, level: Rank) -> PlayDecision;
    fn choose_tribute_selection(&self, pool: [Card; 2]) -> Card;
    fn choose_tribute_return(&self, hand: &[Card], level: Rank) -> Card;
}

/// The conservative default: never leads or uses a bomb voluntarily, and
/// follows with the cheapest legal reply.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultAutoPlay;

const OPENING_PREFERENCE: [ComboKindShape; 7] = [
    ComboKindShape::Plate,
    ComboKindShape::Tube,
    ComboKindShape::Straight,
    ComboKindShape::FullHouse,
    ComboKindShape::Triple,
    ComboKindShape::Pair,
    ComboKindShape::Single,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ComboKindShape {
    Single,
    Pair,
    Triple,
    FullHouse,
    Straight,
    Tube,
    Plate,
}

fn rank_groups(hand: &[Card]) -> BTreeMap<Rank, Vec<Card>> {
    let mut map: BTreeMap<Rank, Vec<Card>> = BTreeMap::new();
    for &c in hand {
        if !c.is_joker() {
            map.entry(c.rank).or_default().push(c);
        }
    }
    map
}

fn uniform_candidates(groups: &BTreeMap<Rank, Vec<Card>>, size: usize) -> Vec<Vec<Card>> {
    groups
        .values()
        .filter(|cards| cards.len() >= size)
        .map(|cards| cards[..size].to_vec())
        .collect()
}

fn full_house_candidates(groups: &BTreeMap<Rank, Vec<Card>>) -> Vec<Vec<Card>> {
    let mut out = Vec::new();
    for (triple_rank, triple_cards) in groups.iter().filter(|(_, c)| c.len() >= 3) {
        for (pair_rank, pair_cards) in groups.iter().filter(|(_, c)| c.len() >= 2) {
            if pair_rank == triple_rank {
                continue;
            }
            let mut cards = triple_cards[..3].to_vec();
            cards.extend_from_slice(&pair_cards[..2]);
            out.push(cards);
        }
    }
    out
}

/// Natural (non-wildcard) runs of `group_size`-card groups across
/// `num_groups` consecutive ranks, e.g. tube = (3, 2), plate = (2, 3).
fn consecutive_candidates(
    groups: &BTreeMap<Rank, Vec<Card>>,
    group_size: usize,
    num_groups: usize,
) -> Vec<Vec<Card>> {
    let mut out = Vec::new();
    let ordered = Rank::ORDERED;
    for start in 0..=(ordered.len().saturating_sub(num_groups)) {
        let window = &ordered[start..start + num_groups];
        if window.iter().all(|r| groups.get(r).map_or(false, |c| c.len() >= group_size)) {
            let mut cards = Vec::new();
            for r in window {
                cards.extend_from_slice(&groups[r][..group_size]);
            }
            out.push(cards);
        }
    }
    out
}

/// Straight candidates, including the "ace low" window (A-2-3-4-5).
fn straight_candidates(groups: &BTreeMap<Rank, Vec<Card>>) -> Vec<Vec<Card>> {
    let mut out = consecutive_candidates(groups, 1, 5);
    let ace_low = [Rank::Ace, Rank::Two, Rank::Three, Rank::Four, Rank::Five];
    if ace_low.iter().all(|r| groups.contains_key(r)) {
        let mut cards = Vec::new();
        for r in &ace_low {
            cards.push(groups[r][0]);
        }
        out.push(cards);
    }
    out
}

fn candidates_for(shape: ComboKindShape, groups: &BTreeMap<Rank, Vec<Card>>) -> Vec<Vec<Card>> {
    match shape {
        ComboKindShape::Single => uniform_candidates(groups, 1),
        ComboKindShape::Pair => uniform_candidates(groups, 2),
        ComboKindShape::Triple => uniform_candidates(groups, 3),
        ComboKindShape::FullHouse => full_house_candidates(groups),
        ComboKindShape::Straight => straight_candidates(groups),
        ComboKindShape::Tube => consecutive_candidates(groups, 3, 2),
        ComboKindShape::Plate => consecutive_candidates(groups, 2, 3),
    }
}

fn weakest_non_bomb(candidates: Vec<Vec<Card>>, level: Rank) -> Option<Combination> {
    candidates
        .into_iter()
        .filter_map(|cards| combo::recognize(&cards, level))
        .filter(|c| !c.kind.is_bomb())
        .min_by_key(|c| c.strength)
}

/// The weakest legal combination of `lead`'s own shape that beats it,
/// skipping bombs entirely (auto-play never spends one).
fn weakest_beating_reply(groups: &BTreeMap<Rank, Vec<Card>>, lead: &Combination, level: Rank) -> Option<Combination> {
    let shape = match lead.kind {
        ComboKind::Single => ComboKindShape::Single,
        ComboKind::Pair => ComboKindShape::Pair,
        ComboKind::Triple => ComboKindShape::Triple,
        ComboKind::FullHouse => ComboKindShape::FullHouse,
        ComboKind::Straight => ComboKindShape::Straight,
        ComboKind::Tube => ComboKindShape::Tube,
        ComboKind::Plate => ComboKindShape::Plate,
        // Auto-play never voluntarily challenges a bomb with another bomb.
        _ => return None,
    };
    candidates_for(shape, groups)
        .into_iter()
        .filter_map(|cards| combo::recognize(&cards, level))
        .filter(|c| !c.kind.is_bomb() && combo::beats(lead, c))
        .min_by_key(|c| c.strength)
}

impl AutoPlayStrategy for DefaultAutoPlay {
    fn choose_play(&self, hand: &[Card], trick: &Trick, level: Rank) -> PlayDecision {
        let groups = rank_groups(hand);
        match &trick.lead_combination {
            None => {
                for shape in OPENING_PREFERENCE {
                    if let Some(combo) = weakest_non_bomb(candidates_for(shape, &groups), level) {
                        return PlayDecision::Play(combo.cards);
                    }
                }
                // No natural non-bomb shape exists (can only happen with a
                // hand of bomb material); pass rather than break one open.
                PlayDecision::Pass
            }
            Some(lead) => match weakest_beating_reply(&groups, lead, level) {
                Some(combo) => PlayDecision::Play(combo.cards),
                None => PlayDecision::Pass,
            },
        }
    }

    fn choose_tribute_selection(&self, pool: [Card; 2]) -> Card {
        if pool[0].rank_value() >= pool[1].rank_value() {
            pool[0]
        } else {
            pool[1]
        }
    }

    fn choose_tribute_return(&self, hand: &[Card], level: Rank) -> Card {
        select_return_card(hand, level)
    }
}

#[cfg(test)]
mod tests_autoplay {
    use super::*;
    use crate::domain::cards::Suit;

    fn c(rank: Rank, suit: Suit) -> Card {
        Card::new(rank, Some(suit), 0).unwrap()
    }

    #[test]
    fn opening_play_prefers_plate_over_single() {
        let hand = vec![
            c(Rank::Three, Suit::Spade),
            c(Rank::Three, Suit::Heart),
            c(Rank::Four, Suit::Spade),
            c(Rank::Four, Suit::Heart),
            c(Rank::Five, Suit::Spade),
            c(Rank::Five, Suit::Heart),
            c(Rank::King, Suit::Club),
        ];
        let trick = Trick::new(1, 0);
        let decision = DefaultAutoPlay.choose_play(&hand, &trick, Rank::Two);
        match decision {
            PlayDecision::Play(cards) => assert_eq!(cards.len(), 6),
            PlayDecision::Pass => panic!("expected a plate lead"),
        }
    }

    #[test]
    fn opening_lead_peels_a_single_from_pure_bomb_material() {
        // Four of a kind is still valid Single material one card at a time;
        // the preference order falls all the way through to Single rather
        // than ever opening with the bomb itself.
        let hand = vec![
            c(Rank::Seven, Suit::Spade),
            c(Rank::Seven, Suit::Heart),
            c(Rank::Seven, Suit::Diamond),
            c(Rank::Seven, Suit::Club),
        ];
        let trick = Trick::new(1, 0);
        let decision = DefaultAutoPlay.choose_play(&hand, &trick, Rank::Two);
        match decision {
            PlayDecision::Play(cards) => assert_eq!(cards, vec![c(Rank::Seven, Suit::Spade)]),
            PlayDecision::Pass => panic!("a lone seven is still a legal opening single"),
        }
    }

    #[test]
    fn follows_with_cheapest_beating_single() {
        let hand = vec![c(Rank::Eight, Suit::Spade), c(Rank::King, Suit::Heart)];
        let mut trick = Trick::new(1, 0);
        let lead = combo::recognize(&[c(Rank::Six, Suit::Club)], Rank::Two).unwrap();
        trick.apply_play(0, lead, &[true, true, true, true]);
        let decision = DefaultAutoPlay.choose_play(&hand, &trick, Rank::Two);
        match decision {
            PlayDecision::Play(cards) => assert_eq!(cards, vec![c(Rank::Eight, Suit::Spade)]),
            PlayDecision::Pass => panic!("eight should beat six"),
        }
    }

    #[test]
    fn follows_single_by_peeling_one_card_rather_than_the_whole_bomb() {
        let hand = vec![
            c(Rank::Seven, Suit::Spade),
            c(Rank::Seven, Suit::Heart),
            c(Rank::Seven, Suit::Diamond),
            c(Rank::Seven, Suit::Club),
        ];
        let mut trick = Trick::new(1, 0);
        let lead = combo::recognize(&[c(Rank::Three, Suit::Club)], Rank::Two).unwrap();
        trick.apply_play(0, lead, &[true, true, true, true]);
        let decision = DefaultAutoPlay.choose_play(&hand, &trick, Rank::Two);
        match decision {
            PlayDecision::Play(cards) => assert_eq!(cards.len(), 1),
            PlayDecision::Pass => panic!("a lone seven beats a lone three"),
        }
    }

    #[test]
    fn tribute_selection_takes_the_higher_rank() {
        let pool = [c(Rank::Jack, Suit::Spade), c(Rank::King, Suit::Heart)];
        let chosen = DefaultAutoPlay.choose_tribute_selection(pool);
        assert_eq!(chosen, c(Rank::King, Suit::Heart));
    }
}
