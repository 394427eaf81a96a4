use super::combo::Combination;
use super::rules::{next_seat, Seat};

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum TrickStatus {
    Waiting,
    Playing,
    Finished,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct PlayRecord {
    pub seat: Seat,
    pub combo: Combination,
}

/// A single trick: turn order, the plays and passes recorded so far, and
/// the seat currently holding the best (unbeaten) combination.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Trick {
    pub id: u64,
    pub leader_seat: Seat,
    pub current_seat: Seat,
    pub lead_combination: Option<Combination>,
    pub beat_holder: Seat,
    pub plays: Vec<PlayRecord>,
    pub passes: Vec<Seat>,
    pub status: TrickStatus,
    pub winner_seat: Option<Seat>,
}

impl Trick {
    pub fn new(id: u64, leader_seat: Seat) -> Self {
        Trick {
            id,
            leader_seat,
            current_seat: leader_seat,
            lead_combination: None,
            beat_holder: leader_seat,
            plays: Vec::new(),
            passes: Vec::new(),
            status: TrickStatus::Waiting,
            winner_seat: None,
        }
    }

    fn next_active_seat(&self, from: Seat, active: &[bool; 4]) -> Seat {
        let mut s = next_seat(from);
        // The beat holder is always a valid stopping point even if their
        // hand emptied on the winning play itself; otherwise we'd skip past
        // them and never detect "everyone else passed".
        while s != self.beat_holder && !active[s as usize] {
            s = next_seat(s);
        }
        s
    }

    /// Record `seat`'s play. `active` must reflect hand-emptiness *after*
    /// this play (the caller removes cards from the hand first).
    pub fn apply_play(&mut self, seat: Seat, combo: Combination, active: &[bool; 4]) {
        self.status = TrickStatus::Playing;
        self.lead_combination = Some(combo.clone());
        self.beat_holder = seat;
        self.plays.push(PlayRecord { seat, combo });
        self.current_seat = self.next_active_seat(seat, active);
    }

    /// Record `seat`'s pass. Ends the trick once play returns to the beat
    /// holder (every other active seat has passed).
    pub fn apply_pass(&mut self, seat: Seat, active: &[bool; 4]) {
        self.passes.push(seat);
        let next = self.next_active_seat(seat, active);
        if next == self.beat_holder {
            self.status = TrickStatus::Finished;
            self.winner_seat = Some(self.beat_holder);
        } else {
            self.current_seat = next;
        }
    }

    pub fn is_finished(&self) -> bool {
        self.status == TrickStatus::Finished
    }
}
