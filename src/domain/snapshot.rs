//! Seat-scoped snapshot API: what a given seat is allowed to see of a deal.

use serde::{Deserialize, Serialize};

use super::cards::{Card, Rank};
use super::deal::{Deal, DealStatus};
use super::rules::Seat;
use super::trick::{PlayRecord, TrickStatus};

/// Public facts any seat (and a spectator, if one ever existed) can see.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DealHeader {
    pub id: u64,
    pub level: Rank,
    pub status: DealStatus,
    pub hand_sizes: [usize; 4],
}

/// Adjacently tagged union mirroring `DealStatus`, carrying only the data
/// relevant to that phase.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "phase", content = "data")]
pub enum PhaseView {
    Dealing,
    Tribute(TributeView),
    Playing(TrickView),
    Finished,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TributeView {
    pub victory_type: super::tribute::VictoryType,
    /// Present only for the seat currently choosing between two pool cards.
    pub awaiting_selection: Option<[Card; 2]>,
    /// Seats (winner, payer) this seat still owes or is owed a return from.
    pub pending_returns: Vec<(Seat, Seat)>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrickView {
    pub trick_id: u64,
    pub leader_seat: Seat,
    pub current_seat: Seat,
    pub status: TrickStatus,
    pub plays: Vec<PlayRecord>,
    pub passes: Vec<Seat>,
}

/// The full per-seat projection: this seat's own hand plus everything else
/// it's entitled to see. Never includes another seat's hand contents.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeatView {
    pub seat: Seat,
    pub header: DealHeader,
    pub own_hand: Vec<Card>,
    pub phase: PhaseView,
}

pub fn seat_view(deal: &Deal, seat: Seat) -> SeatView {
    let header = DealHeader {
        id: deal.id,
        level: deal.level,
        status: deal.status,
        hand_sizes: [
            deal.hands[0].len(),
            deal.hands[1].len(),
            deal.hands[2].len(),
            deal.hands[3].len(),
        ],
    };

    let phase = match deal.status {
        DealStatus::Dealing => PhaseView::Dealing,
        DealStatus::Tribute => PhaseView::Tribute(tribute_view(deal, seat)),
        DealStatus::Playing => PhaseView::Playing(trick_view(deal)),
        DealStatus::Finished => PhaseView::Finished,
    };

    SeatView {
        seat,
        header,
        own_hand: deal.hands[seat as usize].clone(),
        phase,
    }
}

fn tribute_view(deal: &Deal, seat: Seat) -> TributeView {
    let phase = deal.tribute.as_ref().expect("tribute status implies a phase");
    let awaiting_selection = phase
        .awaiting_selection()
        .filter(|(s, _)| *s == seat)
        .map(|(_, pool)| pool);
    let pending_returns = phase
        .pending_returns()
        .iter()
        .filter(|(winner, payer)| *winner == seat || *payer == seat)
        .copied()
        .collect();
    TributeView {
        victory_type: phase.victory_type,
        awaiting_selection,
        pending_returns,
    }
}

fn trick_view(deal: &Deal) -> TrickView {
    let trick = deal.current_trick.as_ref().expect("playing status implies a trick");
    TrickView {
        trick_id: trick.id,
        leader_seat: trick.leader_seat,
        current_seat: trick.current_seat,
        status: trick.status,
        plays: trick.plays.clone(),
        passes: trick.passes.clone(),
    }
}
