use super::cards::{Card, Rank};
use super::combo::{self, Combination};
use super::rules::Seat;
use super::trick::Trick;
use crate::errors::DomainError;

/// Validate a play attempt: ownership, legality, and (if not leading) that it
/// beats the trick's current lead. Returns the recognized combination on
/// success so the caller doesn't have to recognize the cards twice.
pub fn validate_play(
    seat: Seat,
    cards: &[Card],
    hand: &[Card],
    trick: &Trick,
    level: Rank,
) -> Result<Combination, DomainError> {
    if seat != trick.current_seat {
        return Err(DomainError::NotYourTurn);
    }
    for card in cards {
        if !hand.contains(card) {
            return Err(DomainError::NotInHand(*card));
        }
    }
    let combo = combo::recognize(cards, level).ok_or(DomainError::InvalidCombination)?;
    if let Some(lead) = &trick.lead_combination {
        if !combo::beats(lead, &combo) {
            return Err(DomainError::DoesNotBeatLead);
        }
    }
    Ok(combo)
}

/// Validate a pass attempt: must be this seat's turn, and the leader cannot
/// pass before playing.
pub fn validate_pass(seat: Seat, trick: &Trick) -> Result<(), DomainError> {
    if seat != trick.current_seat {
        return Err(DomainError::NotYourTurn);
    }
    if trick.lead_combination.is_none() {
        return Err(DomainError::IllegalPass);
    }
    Ok(())
}
