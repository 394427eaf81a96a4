use super::cards::{Card, Rank, Suit};

/// One of the eleven legal shapes a play can take. `NaiveBomb` carries its
/// card count since bombs of different sizes compare against each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ComboKind {
    Single,
    Pair,
    Triple,
    FullHouse,
    Straight,
    Tube,
    Plate,
    NaiveBomb(u8),
    StraightFlush,
    JokerBomb,
}

impl ComboKind {
    pub fn is_bomb(self) -> bool {
        matches!(
            self,
            ComboKind::NaiveBomb(_) | ComboKind::StraightFlush | ComboKind::JokerBomb
        )
    }

    /// Ordering key among bombs: `NaiveBomb(4) < NaiveBomb(5) < StraightFlush
    /// < NaiveBomb(6) < NaiveBomb(7) < ... < JokerBomb`.
    fn bomb_tier(self) -> u32 {
        match self {
            ComboKind::NaiveBomb(n) if n <= 5 => n as u32,
            ComboKind::StraightFlush => 6,
            ComboKind::NaiveBomb(n) => n as u32 + 1,
            ComboKind::JokerBomb => u32::MAX,
            _ => 0,
        }
    }
}

/// A recognized, immutable play: its kind, the cards that form it (in no
/// particular order), and a same-kind comparison strength.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Combination {
    pub kind: ComboKind,
    pub cards: Vec<Card>,
    pub strength: u16,
}

impl Combination {
    pub fn size(&self) -> usize {
        self.cards.len()
    }
}

/// One slot-group a candidate shape needs filled: `size` cards of `rank`,
/// optionally constrained to `suit` (straight flushes), with wildcard
/// substitution forbidden entirely when `forbid_wild_fill` and no natural
/// card anchors the group (the "lowest slot" rule).
struct GroupSpec {
    rank: Rank,
    size: usize,
    suit: Option<Suit>,
    forbid_wild_fill: bool,
}

/// Attempt to partition `cards` exactly into the given groups, allowing
/// wildcards (heart-level cards) to fill any shortfall except where a
/// group's `forbid_wild_fill` and it has no natural anchor at all. Returns
/// the consumed cards (equal to the full input) on success.
fn try_groups(cards: &[Card], level: Rank, groups: &[GroupSpec]) -> Option<Vec<Card>> {
    let mut native_per_group: Vec<Vec<Card>> = groups.iter().map(|_| Vec::new()).collect();
    let mut free_wild: Vec<Card> = Vec::new();

    for &c in cards {
        let matched = groups
            .iter()
            .position(|g| g.rank == c.rank && (g.suit.is_none() || g.suit == c.suit));
        match matched {
            Some(i) => native_per_group[i].push(c),
            None => {
                if c.is_wildcard(level) {
                    free_wild.push(c);
                } else {
                    return None;
                }
            }
        }
    }

    for (i, g) in groups.iter().enumerate() {
        while native_per_group[i].len() > g.size {
            let pos = native_per_group[i].iter().position(|c| c.is_wildcard(level))?;
            let card = native_per_group[i].remove(pos);
            free_wild.push(card);
        }
    }

    let mut result = Vec::with_capacity(cards.len());
    for (i, g) in groups.iter().enumerate() {
        let have = native_per_group[i].len();
        let need = g.size - have;
        if need > 0 && g.forbid_wild_fill && have == 0 {
            return None;
        }
        if need > free_wild.len() {
            return None;
        }
        result.extend(native_per_group[i].drain(..));
        for _ in 0..need {
            result.push(free_wild.pop().unwrap());
        }
    }
    if !free_wild.is_empty() {
        return None;
    }
    Some(result)
}

fn unique_ranks(cards: &[Card]) -> Vec<Rank> {
    let mut seen: Vec<Rank> = Vec::new();
    for c in cards {
        if !seen.contains(&c.rank) {
            seen.push(c.rank);
        }
    }
    seen
}

fn find_uniform(cards: &[Card], level: Rank, size: usize) -> Option<(Rank, Vec<Card>)> {
    for r in unique_ranks(cards) {
        let groups = [GroupSpec {
            rank: r,
            size,
            suit: None,
            forbid_wild_fill: false,
        }];
        if let Some(used) = try_groups(cards, level, &groups) {
            return Some((r, used));
        }
    }
    None
}

fn find_full_house(cards: &[Card], level: Rank) -> Option<Combination> {
    let ranks = unique_ranks(cards);
    for &r1 in &ranks {
        for &r2 in &ranks {
            if r1 == r2 {
                continue;
            }
            let groups = [
                GroupSpec {
                    rank: r1,
                    size: 3,
                    suit: None,
                    forbid_wild_fill: false,
                },
                GroupSpec {
                    rank: r2,
                    size: 2,
                    suit: None,
                    forbid_wild_fill: false,
                },
            ];
            if let Some(used) = try_groups(cards, level, &groups) {
                let rep = used.iter().find(|c| c.rank == r1).unwrap();
                return Some(Combination {
                    kind: ComboKind::FullHouse,
                    strength: rep.combo_value(level) as u16,
                    cards: used,
                });
            }
        }
    }
    None
}

/// `v` is the lowest slot's rank-value, with `v == 1` meaning the "A as 1"
/// straight. Window ranks for `v >= 2` are plain consecutive rank values.
fn window_rank(v: u8, offset: u8) -> Option<Rank> {
    if v == 1 {
        return match offset {
            0 => Some(Rank::Ace),
            o => Rank::ORDERED.iter().copied().find(|r| r.value() == 1 + o),
        };
    }
    Rank::ORDERED.iter().copied().find(|r| r.value() == v + offset)
}

fn find_straight_or_flush(cards: &[Card], level: Rank, require_flush: bool) -> Option<Combination> {
    for v in 1..=10u8 {
        let ranks: Vec<Rank> = (0..5).filter_map(|o| window_rank(v, o)).collect();
        if ranks.len() != 5 {
            continue;
        }
        let suits: &[Option<Suit>] = if require_flush {
            &[
                Some(Suit::Spade),
                Some(Suit::Heart),
                Some(Suit::Diamond),
                Some(Suit::Club),
            ]
        } else {
            &[None]
        };
        for &suit in suits {
            let groups: Vec<GroupSpec> = ranks
                .iter()
                .enumerate()
                .map(|(i, &r)| GroupSpec {
                    rank: r,
                    size: 1,
                    suit,
                    forbid_wild_fill: i == 0,
                })
                .collect();
            if let Some(used) = try_groups(cards, level, &groups) {
                return Some(Combination {
                    kind: if require_flush {
                        ComboKind::StraightFlush
                    } else {
                        ComboKind::Straight
                    },
                    strength: v as u16,
                    cards: used,
                });
            }
        }
    }
    None
}

fn find_consecutive_groups(cards: &[Card], level: Rank, group_size: usize, num_groups: usize) -> Option<Combination> {
    let max_v = 15u8.saturating_sub(num_groups as u8);
    for v in 2..=max_v {
        let ranks: Vec<Rank> = (0..num_groups as u8)
            .filter_map(|o| Rank::ORDERED.iter().copied().find(|r| r.value() == v + o))
            .collect();
        if ranks.len() != num_groups {
            continue;
        }
        let groups: Vec<GroupSpec> = ranks
            .iter()
            .enumerate()
            .map(|(i, &r)| GroupSpec {
                rank: r,
                size: group_size,
                suit: None,
                forbid_wild_fill: i == 0,
            })
            .collect();
        if let Some(used) = try_groups(cards, level, &groups) {
            let kind = if group_size == 3 {
                ComboKind::Tube
            } else {
                ComboKind::Plate
            };
            return Some(Combination {
                kind,
                strength: v as u16,
                cards: used,
            });
        }
    }
    None
}

fn find_joker_bomb(cards: &[Card]) -> Option<Combination> {
    if cards.len() != 4 {
        return None;
    }
    let red = cards.iter().filter(|c| c.rank == Rank::RedJoker).count();
    let black = cards.iter().filter(|c| c.rank == Rank::BlackJoker).count();
    if red == 2 && black == 2 {
        Some(Combination {
            kind: ComboKind::JokerBomb,
            strength: u16::MAX,
            cards: cards.to_vec(),
        })
    } else {
        None
    }
}

/// Identify the unique legal combination formed by `cards` at the given
/// level, or `None` if the cards don't form any legal shape. Invariant under
/// permutation of the input.
pub fn recognize(cards: &[Card], level: Rank) -> Option<Combination> {
    if cards.is_empty() {
        return None;
    }
    if let Some(c) = find_joker_bomb(cards) {
        return Some(c);
    }
    let size = cards.len();
    let uniform_kind = |n: usize| -> Option<ComboKind> {
        match n {
            1 => Some(ComboKind::Single),
            2 => Some(ComboKind::Pair),
            3 => Some(ComboKind::Triple),
            4..=8 => Some(ComboKind::NaiveBomb(n as u8)),
            _ => None,
        }
    };
    match size {
        1 | 2 | 3 => {
            let (_, used) = find_uniform(cards, level, size)?;
            let strength = used[0].combo_value(level) as u16;
            Some(Combination {
                kind: uniform_kind(size)?,
                strength,
                cards: used,
            })
        }
        4 => {
            let (_, used) = find_uniform(cards, level, 4)?;
            let strength = used[0].combo_value(level) as u16;
            Some(Combination {
                kind: ComboKind::NaiveBomb(4),
                strength,
                cards: used,
            })
        }
        5 => find_uniform(cards, level, 5)
            .map(|(_, used)| {
                let strength = used[0].combo_value(level) as u16;
                Combination {
                    kind: ComboKind::NaiveBomb(5),
                    strength,
                    cards: used,
                }
            })
            .or_else(|| find_straight_or_flush(cards, level, true))
            .or_else(|| find_full_house(cards, level))
            .or_else(|| find_straight_or_flush(cards, level, false)),
        6 => find_uniform(cards, level, 6)
            .map(|(_, used)| {
                let strength = used[0].combo_value(level) as u16;
                Combination {
                    kind: ComboKind::NaiveBomb(6),
                    strength,
                    cards: used,
                }
            })
            .or_else(|| find_consecutive_groups(cards, level, 3, 2))
            .or_else(|| find_consecutive_groups(cards, level, 2, 3)),
        7 | 8 => {
            let (_, used) = find_uniform(cards, level, size)?;
            let strength = used[0].combo_value(level) as u16;
            Some(Combination {
                kind: ComboKind::NaiveBomb(size as u8),
                strength,
                cards: used,
            })
        }
        _ => None,
    }
}

/// Does `candidate` beat `lead`? Implements the bomb-beat rule: any bomb
/// beats any non-bomb; among bombs, compare tier then strength; among
/// equal non-bomb kinds, higher strength wins. Equal-strength bombs of the
/// same tier cannot beat one another (deck composition makes a true tie
/// impossible outside NaiveBomb/StraightFlush, where a same-strength play is
/// simply illegal).
pub fn beats(lead: &Combination, candidate: &Combination) -> bool {
    let lead_bomb = lead.kind.is_bomb();
    let cand_bomb = candidate.kind.is_bomb();

    if cand_bomb && !lead_bomb {
        return true;
    }
    if !cand_bomb && lead_bomb {
        return false;
    }
    if cand_bomb && lead_bomb {
        let lead_tier = lead.kind.bomb_tier();
        let cand_tier = candidate.kind.bomb_tier();
        return match cand_tier.cmp(&lead_tier) {
            std::cmp::Ordering::Greater => true,
            std::cmp::Ordering::Less => false,
            std::cmp::Ordering::Equal => candidate.strength > lead.strength,
        };
    }
    if lead.kind != candidate.kind {
        return false;
    }
    candidate.strength > lead.strength
}

#[cfg(test)]
mod tests_combo {
    use super::*;
    use crate::domain::cards::Suit;

    fn c(rank: Rank, suit: Suit, copy: u8) -> Card {
        Card::new(rank, Some(suit), copy).unwrap()
    }

    fn joker(rank: Rank, copy: u8) -> Card {
        Card::new(rank, None, copy).unwrap()
    }

    #[test]
    fn recognizes_single() {
        let combo = recognize(&[c(Rank::King, Suit::Heart, 0)], Rank::Two).unwrap();
        assert_eq!(combo.kind, ComboKind::Single);
    }

    #[test]
    fn recognize_is_permutation_invariant() {
        let cards = vec![
            c(Rank::Three, Suit::Spade, 0),
            c(Rank::Four, Suit::Diamond, 0),
            c(Rank::Five, Suit::Heart, 0),
            c(Rank::Six, Suit::Club, 0),
            c(Rank::Seven, Suit::Spade, 0),
        ];
        let mut permuted = cards.clone();
        permuted.reverse();
        let a = recognize(&cards, Rank::Two).unwrap();
        let b = recognize(&permuted, Rank::Two).unwrap();
        assert_eq!(a.kind, b.kind);
        assert_eq!(a.strength, b.strength);
    }

    #[test]
    fn wildcard_fills_straight_gap() {
        // level 2; hand 3,4,2H,6,7 recognized as straight 3-4-5-6-7 with 2H as wildcard.
        let cards = vec![
            c(Rank::Three, Suit::Spade, 0),
            c(Rank::Four, Suit::Diamond, 0),
            c(Rank::Two, Suit::Heart, 0),
            c(Rank::Six, Suit::Club, 0),
            c(Rank::Seven, Suit::Spade, 0),
        ];
        let combo = recognize(&cards, Rank::Two).unwrap();
        assert_eq!(combo.kind, ComboKind::Straight);
        assert_eq!(combo.strength, 3);
    }

    #[test]
    fn level_card_in_lowest_slot_is_natural_not_wildcard() {
        // level 2; hand 2H,3,4,5,6 -- 2H sits naturally as the lowest card.
        let cards = vec![
            c(Rank::Two, Suit::Heart, 0),
            c(Rank::Three, Suit::Spade, 0),
            c(Rank::Four, Suit::Diamond, 0),
            c(Rank::Five, Suit::Club, 0),
            c(Rank::Six, Suit::Spade, 0),
        ];
        let combo = recognize(&cards, Rank::Two).unwrap();
        assert_eq!(combo.kind, ComboKind::Straight);
        assert_eq!(combo.strength, 2);
    }

    #[test]
    fn ace_as_one_straight_is_legal() {
        let cards = vec![
            c(Rank::Ace, Suit::Spade, 0),
            c(Rank::Two, Suit::Diamond, 0),
            c(Rank::Three, Suit::Heart, 1),
            c(Rank::Four, Suit::Club, 0),
            c(Rank::Five, Suit::Spade, 0),
        ];
        let combo = recognize(&cards, Rank::King).unwrap();
        assert_eq!(combo.kind, ComboKind::Straight);
        assert_eq!(combo.strength, 1);
    }

    #[test]
    fn joker_bomb_beats_everything() {
        let jb = Combination {
            kind: ComboKind::JokerBomb,
            cards: vec![joker(Rank::RedJoker, 0), joker(Rank::RedJoker, 1), joker(Rank::BlackJoker, 0), joker(Rank::BlackJoker, 1)],
            strength: u16::MAX,
        };
        let triple = recognize(
            &[c(Rank::Nine, Suit::Spade, 0), c(Rank::Nine, Suit::Heart, 0), c(Rank::Nine, Suit::Diamond, 0)],
            Rank::Two,
        )
        .unwrap();
        assert!(beats(&triple, &jb));
        assert!(!beats(&jb, &triple));
    }

    #[test]
    fn naive_bomb_beats_triple() {
        let lead = recognize(
            &[c(Rank::Nine, Suit::Spade, 0), c(Rank::Nine, Suit::Heart, 0), c(Rank::Nine, Suit::Diamond, 0)],
            Rank::Two,
        )
        .unwrap();
        let bomb5 = recognize(
            &[
                c(Rank::Five, Suit::Spade, 0),
                c(Rank::Five, Suit::Heart, 0),
                c(Rank::Five, Suit::Diamond, 0),
                c(Rank::Five, Suit::Club, 0),
            ],
            Rank::Two,
        )
        .unwrap();
        assert!(beats(&lead, &bomb5));
    }

    #[test]
    fn straight_flush_outranks_naivebomb5_but_not_naivebomb6() {
        let sf = Combination {
            kind: ComboKind::StraightFlush,
            cards: vec![],
            strength: 3,
        };
        let nb5 = Combination {
            kind: ComboKind::NaiveBomb(5),
            cards: vec![],
            strength: 9,
        };
        let nb6 = Combination {
            kind: ComboKind::NaiveBomb(6),
            cards: vec![],
            strength: 2,
        };
        assert!(beats(&nb5, &sf));
        assert!(beats(&sf, &nb6));
    }

    #[test]
    fn single_does_not_beat_itself() {
        let combo = recognize(&[c(Rank::Ten, Suit::Heart, 0)], Rank::Two).unwrap();
        assert!(!beats(&combo, &combo));
    }

    #[test]
    fn naive_bomb_tie_strength_cannot_beat() {
        let a = Combination {
            kind: ComboKind::NaiveBomb(4),
            cards: vec![],
            strength: 5,
        };
        let b = a.clone();
        assert!(!beats(&a, &b));
    }

    #[test]
    fn illegal_cards_return_none() {
        let cards = vec![
            c(Rank::Three, Suit::Spade, 0),
            c(Rank::Eight, Suit::Diamond, 0),
        ];
        assert!(recognize(&cards, Rank::Two).is_none());
    }

    #[test]
    fn full_house_recognized_with_wildcard() {
        // level 5; 3,3,3,K,5H(wild filling the pair's second slot)
        let cards = vec![
            c(Rank::Three, Suit::Spade, 0),
            c(Rank::Three, Suit::Diamond, 0),
            c(Rank::Three, Suit::Club, 0),
            c(Rank::King, Suit::Spade, 0),
            c(Rank::Five, Suit::Heart, 0),
        ];
        let combo = recognize(&cards, Rank::Five).unwrap();
        assert_eq!(combo.kind, ComboKind::FullHouse);
    }
}
