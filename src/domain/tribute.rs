use super::cards::{Card, Rank};
use super::rules::{teammate_of, Seat};
use crate::errors::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum VictoryType {
    DoubleDown,
    SingleLast,
    PartnerLast,
}

/// Classify last deal's victory from the winner's teammate's finishing rank.
pub fn classify_victory(rankings: [Seat; 4]) -> VictoryType {
    let partner = teammate_of(rankings[0]);
    if partner == rankings[1] {
        VictoryType::DoubleDown
    } else if partner == rankings[2] {
        VictoryType::SingleLast
    } else {
        VictoryType::PartnerLast
    }
}

fn count_red_joker(hand: &[Card]) -> usize {
    hand.iter().filter(|c| c.rank == Rank::RedJoker).count()
}

fn check_immunity(victory: VictoryType, rankings: [Seat; 4], hands: &[Vec<Card>; 4]) -> bool {
    match victory {
        VictoryType::DoubleDown => {
            count_red_joker(&hands[rankings[2] as usize]) + count_red_joker(&hands[rankings[3] as usize]) >= 2
        }
        VictoryType::SingleLast => count_red_joker(&hands[rankings[3] as usize]) == 2,
        VictoryType::PartnerLast => count_red_joker(&hands[rankings[2] as usize]) == 2,
    }
}

/// The unilateral tribute payment: highest-rank card excluding the
/// wildcard, ties broken by suit order (Spade > Heart > Diamond > Club).
fn select_tribute_card(hand: &[Card], level: Rank) -> Card {
    *hand
        .iter()
        .filter(|c| !c.is_wildcard(level))
        .max_by_key(|c| (c.rank_value(), c.suit.map(|s| s.tie_break_rank()).unwrap_or(0)))
        .expect("hand has at least one non-wildcard card during tribute")
}

fn is_legal_return_card(card: Card, level: Rank) -> bool {
    !card.is_joker() && !card.is_wildcard(level) && card.rank_value() <= 10
}

/// The lowest legal return card (rank <= 10, not a wildcard, not a joker);
/// falls back to the globally lowest card if no legal one exists.
pub fn select_return_card(hand: &[Card], level: Rank) -> Card {
    hand.iter()
        .filter(|c| is_legal_return_card(**c, level))
        .min_by_key(|c| c.rank_value())
        .copied()
        .unwrap_or_else(|| {
            *hand
                .iter()
                .min_by_key(|c| c.rank_value())
                .expect("hand is non-empty during tribute return")
        })
}

#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct TributeTransfer {
    pub from: Seat,
    pub to: Seat,
    pub card: Card,
}

#[derive(Debug, Clone)]
struct PendingSelection {
    seat: Seat,
    pool: [(Seat, Card); 2],
}

/// Drives one deal's tribute sub-protocol from classification through the
/// final card swaps. Pure data: the engine's turn driver supplies the
/// decisions (selection / return) and calls back in here to apply them.
#[derive(Debug, Clone)]
pub struct TributePhase {
    pub victory_type: VictoryType,
    pub immune: bool,
    pub transfers: Vec<TributeTransfer>,
    pending_selection: Option<PendingSelection>,
    pending_returns: Vec<(Seat, Seat)>,
}

impl TributePhase {
    pub fn start(rankings: [Seat; 4], hands: &[Vec<Card>; 4], level: Rank) -> TributePhase {
        let victory_type = classify_victory(rankings);
        let immune = check_immunity(victory_type, rankings, hands);

        let mut transfers = Vec::new();
        let mut pending_selection = None;
        let mut pending_returns = Vec::new();

        if !immune {
            match victory_type {
                VictoryType::DoubleDown => {
                    let loser1 = rankings[2];
                    let loser2 = rankings[3];
                    let card1 = select_tribute_card(&hands[loser1 as usize], level);
                    let card2 = select_tribute_card(&hands[loser2 as usize], level);
                    pending_selection = Some(PendingSelection {
                        seat: rankings[0],
                        pool: [(loser1, card1), (loser2, card2)],
                    });
                }
                VictoryType::SingleLast => {
                    let loser = rankings[3];
                    let card = select_tribute_card(&hands[loser as usize], level);
                    transfers.push(TributeTransfer {
                        from: loser,
                        to: rankings[0],
                        card,
                    });
                    pending_returns.push((rankings[0], loser));
                }
                VictoryType::PartnerLast => {
                    let loser = rankings[2];
                    let card = select_tribute_card(&hands[loser as usize], level);
                    transfers.push(TributeTransfer {
                        from: loser,
                        to: rankings[0],
                        card,
                    });
                    pending_returns.push((rankings[0], loser));
                }
            }
        }

        TributePhase {
            victory_type,
            immune,
            transfers,
            pending_selection,
            pending_returns,
        }
    }

    /// `Some((seat, pool))` while a DoubleDown pool selection is outstanding.
    pub fn awaiting_selection(&self) -> Option<(Seat, [Card; 2])> {
        self.pending_selection
            .as_ref()
            .map(|p| (p.seat, [p.pool[0].1, p.pool[1].1]))
    }

    /// Timeout fallback for the pool selection: the higher-rank card.
    pub fn auto_select(&self) -> Option<Card> {
        self.pending_selection.as_ref().map(|p| {
            let (_, a) = p.pool[0];
            let (_, b) = p.pool[1];
            if a.rank_value() >= b.rank_value() {
                a
            } else {
                b
            }
        })
    }

    pub fn apply_selection(&mut self, seat: Seat, chosen: Card) -> Result<(), DomainError> {
        let pending = self.pending_selection.as_ref().ok_or(DomainError::NoPendingDecision)?;
        if pending.seat != seat {
            return Err(DomainError::NotYourTurn);
        }
        let (payer_a, card_a) = pending.pool[0];
        let (payer_b, card_b) = pending.pool[1];
        let (winner_a, winner_b, payer_for_a, payer_for_b) = if chosen == card_a {
            (seat, teammate_of(seat), payer_a, payer_b)
        } else if chosen == card_b {
            (seat, teammate_of(seat), payer_b, payer_a)
        } else {
            return Err(DomainError::IllegalTributeCard);
        };
        self.transfers.push(TributeTransfer {
            from: payer_for_a,
            to: winner_a,
            card: chosen,
        });
        let remainder = if chosen == card_a { card_b } else { card_a };
        self.transfers.push(TributeTransfer {
            from: payer_for_b,
            to: winner_b,
            card: remainder,
        });
        self.pending_returns.push((winner_a, payer_for_a));
        self.pending_returns.push((winner_b, payer_for_b));
        self.pending_selection = None;
        Ok(())
    }

    pub fn pending_returns(&self) -> &[(Seat, Seat)] {
        &self.pending_returns
    }

    pub fn apply_return(&mut self, winner_seat: Seat, card: Card, level: Rank) -> Result<(), DomainError> {
        let pos = self
            .pending_returns
            .iter()
            .position(|&(w, _)| w == winner_seat)
            .ok_or(DomainError::NoPendingDecision)?;
        if !is_legal_return_card(card, level) {
            return Err(DomainError::IllegalTributeCard);
        }
        let (_, loser) = self.pending_returns.remove(pos);
        self.transfers.push(TributeTransfer {
            from: winner_seat,
            to: loser,
            card,
        });
        Ok(())
    }

    pub fn is_complete(&self) -> bool {
        self.pending_selection.is_none() && self.pending_returns.is_empty()
    }

    /// Swap every recorded transfer's card between hands. Call only once,
    /// after `is_complete()`.
    pub fn apply_transfers_to_hands(&self, hands: &mut [Vec<Card>; 4]) {
        for t in &self.transfers {
            let from_hand = &mut hands[t.from as usize];
            if let Some(pos) = from_hand.iter().position(|c| *c == t.card) {
                from_hand.remove(pos);
            }
            hands[t.to as usize].push(t.card);
        }
    }
}

#[cfg(test)]
mod tests_tribute {
    use super::*;
    use crate::domain::cards::Suit;

    fn c(rank: Rank, suit: Suit) -> Card {
        Card::new(rank, Some(suit), 0).unwrap()
    }

    fn joker(rank: Rank, copy: u8) -> Card {
        Card::new(rank, None, copy).unwrap()
    }

    #[test]
    fn classify_double_down() {
        // seat0 rank1, teammate(0)=2 finishes rank2 => DoubleDown.
        assert_eq!(classify_victory([0, 2, 1, 3]), VictoryType::DoubleDown);
    }

    #[test]
    fn classify_single_last() {
        assert_eq!(classify_victory([0, 1, 2, 3]), VictoryType::SingleLast);
    }

    #[test]
    fn classify_partner_last() {
        assert_eq!(classify_victory([0, 1, 3, 2]), VictoryType::PartnerLast);
    }

    #[test]
    fn immunity_skips_tribute_for_single_last() {
        let mut hands: [Vec<Card>; 4] = Default::default();
        hands[3] = vec![joker(Rank::RedJoker, 0), joker(Rank::RedJoker, 1)];
        let phase = TributePhase::start([0, 1, 2, 3], &hands, Rank::Two);
        assert!(phase.immune);
        assert!(phase.is_complete());
    }

    #[test]
    fn double_down_full_flow() {
        let mut hands: [Vec<Card>; 4] = Default::default();
        hands[2] = vec![c(Rank::King, Suit::Spade)];
        hands[3] = vec![c(Rank::Queen, Suit::Heart)];
        let mut phase = TributePhase::start([0, 2, 1, 3], &hands, Rank::Five);
        assert!(!phase.immune);
        let (seat, pool) = phase.awaiting_selection().unwrap();
        assert_eq!(seat, 0);
        phase.apply_selection(0, pool[0]).unwrap();
        assert!(phase.awaiting_selection().is_none());
        assert_eq!(phase.pending_returns().len(), 2);
        for (winner, _) in phase.pending_returns().to_vec() {
            phase.apply_return(winner, c(Rank::Four, Suit::Club), Rank::Five).unwrap();
        }
        assert!(phase.is_complete());
        assert_eq!(phase.transfers.len(), 4);
    }

    #[test]
    fn return_card_must_satisfy_rank_cap() {
        let mut hands: [Vec<Card>; 4] = Default::default();
        hands[3] = vec![c(Rank::Queen, Suit::Heart)];
        let mut phase = TributePhase::start([0, 1, 2, 3], &hands, Rank::Five);
        let err = phase.apply_return(0, c(Rank::Jack, Suit::Spade), Rank::Five).unwrap_err();
        assert_eq!(err, DomainError::IllegalTributeCard);
    }
}
