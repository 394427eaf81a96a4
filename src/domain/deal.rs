use super::cards::{Card, Rank};
use super::dealer::{self, sort_hand};
use super::rules::{team_of, teammate_of, next_seat, Seat, Team};
use super::trick::{Trick, TrickStatus};
use super::tribute::{classify_victory, TributePhase, VictoryType};
use super::validate;
use crate::errors::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum DealStatus {
    Dealing,
    Tribute,
    Playing,
    Finished,
}

fn upgrades_for(victory: VictoryType) -> u8 {
    match victory {
        VictoryType::DoubleDown => 3,
        VictoryType::SingleLast => 2,
        VictoryType::PartnerLast => 1,
    }
}

/// Outcome of a finished deal: who finished in what order, and how much the
/// winning team's level should advance.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct DealResult {
    pub rankings: [Seat; 4],
    pub winning_team: Team,
    pub victory_type: VictoryType,
    pub upgrades: u8,
    pub trick_count: usize,
}

/// One hand of Guandan: deals cards, runs tribute (if any), then drives
/// tricks to completion. Holds no timing state; the engine's turn driver
/// owns deadlines and calls in here with validated decisions.
#[derive(Debug, Clone)]
pub struct Deal {
    pub id: u64,
    pub level: Rank,
    pub status: DealStatus,
    pub tribute: Option<TributePhase>,
    pub hands: [Vec<Card>; 4],
    pub current_trick: Option<Trick>,
    pub trick_history: Vec<Trick>,
    pub finish_order: Vec<Seat>,
    first_leader: Seat,
    next_trick_id: u64,
}

impl Deal {
    /// `previous_rankings` is `None` for a match's opening deal (no tribute,
    /// seat 0 leads); otherwise the prior deal's finish order, which both
    /// seeds tribute and determines this deal's default leader.
    pub fn new(id: u64, level: Rank, seed: u64, previous_rankings: Option<[Seat; 4]>) -> Deal {
        let hands = dealer::deal_hands(seed);
        let first_leader = previous_rankings.map(|r| r[0]).unwrap_or(0);

        let mut deal = Deal {
            id,
            level,
            status: DealStatus::Dealing,
            tribute: None,
            hands,
            current_trick: None,
            trick_history: Vec::new(),
            finish_order: Vec::new(),
            first_leader,
            next_trick_id: 1,
        };

        match previous_rankings {
            None => deal.begin_playing(),
            Some(rankings) => {
                let phase = TributePhase::start(rankings, &deal.hands, level);
                let complete = phase.is_complete();
                deal.tribute = Some(phase);
                if complete {
                    deal.finish_tribute();
                } else {
                    deal.status = DealStatus::Tribute;
                }
            }
        }
        deal
    }

    fn begin_playing(&mut self) {
        self.status = DealStatus::Playing;
        self.current_trick = Some(Trick::new(self.next_trick_id, self.first_leader));
        self.next_trick_id += 1;
    }

    /// Apply the tribute phase's recorded transfers to the hands and move on
    /// to play. Safe to call repeatedly; only acts once `tribute.is_complete()`.
    pub fn finish_tribute(&mut self) {
        let complete = matches!(&self.tribute, Some(p) if p.is_complete());
        if !complete {
            return;
        }
        if let Some(phase) = self.tribute.take() {
            phase.apply_transfers_to_hands(&mut self.hands);
        }
        for hand in &mut self.hands {
            sort_hand(hand);
        }
        self.begin_playing();
    }

    pub fn apply_tribute_selection(&mut self, seat: Seat, chosen: Card) -> Result<(), DomainError> {
        let phase = self.tribute.as_mut().ok_or(DomainError::NoPendingDecision)?;
        phase.apply_selection(seat, chosen)?;
        self.finish_tribute();
        Ok(())
    }

    pub fn apply_tribute_return(&mut self, seat: Seat, card: Card) -> Result<(), DomainError> {
        let phase = self.tribute.as_mut().ok_or(DomainError::NoPendingDecision)?;
        phase.apply_return(seat, card, self.level)?;
        self.finish_tribute();
        Ok(())
    }

    fn active_mask(&self) -> [bool; 4] {
        let mut active = [true; 4];
        for &s in &self.finish_order {
            active[s as usize] = false;
        }
        active
    }

    fn record_if_emptied(&mut self, seat: Seat) {
        if self.hands[seat as usize].is_empty() && !self.finish_order.contains(&seat) {
            self.finish_order.push(seat);
        }
    }

    pub fn apply_play(&mut self, seat: Seat, cards: &[Card]) -> Result<(), DomainError> {
        if self.status != DealStatus::Playing {
            return Err(DomainError::IllegalTransition("deal is not in the playing phase".into()));
        }
        let trick = self.current_trick.as_ref().ok_or_else(|| {
            DomainError::IllegalTransition("no trick in progress".into())
        })?;
        let combo = validate::validate_play(seat, cards, &self.hands[seat as usize], trick, self.level)?;

        let hand = &mut self.hands[seat as usize];
        for card in cards {
            if let Some(pos) = hand.iter().position(|c| c == card) {
                hand.remove(pos);
            }
        }
        self.record_if_emptied(seat);

        let active = self.active_mask();
        let trick = self.current_trick.as_mut().expect("checked above");
        trick.apply_play(seat, combo, &active);

        if self.finish_order.len() >= 3 {
            self.force_end_current_trick();
        } else {
            self.check_trick_end();
        }
        Ok(())
    }

    pub fn apply_pass(&mut self, seat: Seat) -> Result<(), DomainError> {
        if self.status != DealStatus::Playing {
            return Err(DomainError::IllegalTransition("deal is not in the playing phase".into()));
        }
        let trick = self.current_trick.as_ref().ok_or_else(|| {
            DomainError::IllegalTransition("no trick in progress".into())
        })?;
        validate::validate_pass(seat, trick)?;

        let active = self.active_mask();
        let trick = self.current_trick.as_mut().expect("checked above");
        trick.apply_pass(seat, &active);
        self.check_trick_end();
        Ok(())
    }

    /// A trick can reach "everyone finished but the beat holder" mid-trick,
    /// before the usual pass-around even starts (the last active seat has
    /// no one left to wait on). Close it out directly rather than stalling.
    fn force_end_current_trick(&mut self) {
        if let Some(trick) = self.current_trick.as_mut() {
            if !trick.is_finished() {
                trick.status = TrickStatus::Finished;
                trick.winner_seat = Some(trick.beat_holder);
            }
        }
        self.check_trick_end();
    }

    fn check_trick_end(&mut self) {
        let finished = match &self.current_trick {
            Some(trick) => trick.is_finished(),
            None => false,
        };
        if !finished {
            return;
        }
        let trick = self.current_trick.take().expect("checked above");
        let winner = trick.winner_seat.expect("finished trick has a winner");
        self.trick_history.push(trick);

        if self.finish_order.len() >= 3 {
            self.status = DealStatus::Finished;
            return;
        }

        let next_leader = self.next_leader_after(winner);
        self.current_trick = Some(Trick::new(self.next_trick_id, next_leader));
        self.next_trick_id += 1;
    }

    /// The trick winner leads the next trick, unless they just emptied their
    /// hand on the winning play, in which case the lead passes to their
    /// teammate if still active, else to the next active seat clockwise.
    fn next_leader_after(&self, winner: Seat) -> Seat {
        if !self.hands[winner as usize].is_empty() {
            return winner;
        }
        let mate = teammate_of(winner);
        if !self.hands[mate as usize].is_empty() {
            return mate;
        }
        let mut s = next_seat(winner);
        while self.hands[s as usize].is_empty() {
            s = next_seat(s);
        }
        s
    }

    pub fn is_finished(&self) -> bool {
        self.status == DealStatus::Finished
    }

    #[cfg(test)]
    fn test_from_hands(hands: [Vec<Card>; 4], level: Rank, first_leader: Seat) -> Deal {
        Deal {
            id: 1,
            level,
            status: DealStatus::Playing,
            tribute: None,
            hands,
            current_trick: Some(Trick::new(1, first_leader)),
            trick_history: Vec::new(),
            finish_order: Vec::new(),
            first_leader,
            next_trick_id: 2,
        }
    }

    pub fn result(&self) -> Option<DealResult> {
        if self.status != DealStatus::Finished {
            return None;
        }
        let mut rankings = [0u8; 4];
        for (i, &s) in self.finish_order.iter().enumerate() {
            rankings[i] = s;
        }
        let fourth = (0..4u8).find(|s| !self.finish_order.contains(s)).unwrap_or(0);
        rankings[3] = fourth;

        let victory_type = classify_victory(rankings);
        Some(DealResult {
            rankings,
            winning_team: team_of(rankings[0]),
            victory_type,
            upgrades: upgrades_for(victory_type),
            trick_count: self.trick_history.len(),
        })
    }
}
