use std::time::Duration;

use tokio::sync::mpsc;

use super::events::{ActionRejected, EventPayload, PublicEvent};
use super::fanout::FanOut;
use super::supervisor::{ConnectionState, Supervisor};
use crate::domain::autoplay::{AutoPlayStrategy, PlayDecision};
use crate::domain::cards::{Card, Rank};
use crate::domain::deal::Deal;
use crate::domain::rules::Seat;
use crate::errors::DomainError;

/// One inbound decision from a seat's transport session. Heartbeats reset
/// liveness but never resolve a pending decision.
#[derive(Debug, Clone)]
pub enum SeatCommand {
    PlayCards(Vec<Card>),
    Pass,
    TributeSelect(Card),
    TributeReturn(Card),
    Heartbeat,
}

/// Wait for `seat`'s play-or-pass decision, falling back to auto-play once
/// the deadline lapses. A seat with no live connection (disconnected or
/// already in trusteeship) skips the wait entirely and auto-plays at once.
/// A single missed deadline while connected auto-plays that one decision
/// only; it does not itself place the seat into trusteeship.
pub async fn drive_play_decision(
    deal: &mut Deal,
    seat: Seat,
    rx: &mut mpsc::Receiver<SeatCommand>,
    supervisor: &mut Supervisor,
    autoplay: &dyn AutoPlayStrategy,
    fanout: &FanOut,
    timeout: Duration,
    level: Rank,
) -> Result<(), DomainError> {
    loop {
        if supervisor.state_of(seat) != ConnectionState::Connected {
            if let Ok(cmd) = rx.try_recv() {
                if let Some(result) = apply_play_command(fanout, deal, seat, cmd) {
                    return result;
                }
                continue;
            }
            return apply_autoplay(fanout, deal, seat, autoplay, level);
        }

        match tokio::time::timeout(timeout, rx.recv()).await {
            Ok(Some(cmd)) => {
                if let Some(result) = apply_play_command(fanout, deal, seat, cmd) {
                    return result;
                }
            }
            Ok(None) => return Err(DomainError::SessionUnhealthy),
            Err(_elapsed) => return apply_autoplay(fanout, deal, seat, autoplay, level),
        }
    }
}

/// Applies a play/pass command and reports whether the decision window is
/// over. A local rejection (illegal combination, wrong turn, ...) is
/// reported to the seat and leaves the decision outstanding so it can
/// resubmit before its deadline.
fn apply_play_command(fanout: &FanOut, deal: &mut Deal, seat: Seat, cmd: SeatCommand) -> Option<Result<(), DomainError>> {
    let result = match cmd {
        SeatCommand::PlayCards(cards) => deal.apply_play(seat, &cards),
        SeatCommand::Pass => deal.apply_pass(seat),
        // A tribute decision or heartbeat arriving while we're waiting on a
        // play is stale or out of order; ignore and keep waiting.
        _ => return None,
    };
    match result {
        Err(ref err) if err.is_local() => {
            fanout.send_private(seat, EventPayload::Rejected(ActionRejected { seat, code: err.code() }));
            None
        }
        other => Some(other),
    }
}

fn apply_autoplay(fanout: &FanOut, deal: &mut Deal, seat: Seat, autoplay: &dyn AutoPlayStrategy, level: Rank) -> Result<(), DomainError> {
    let trick = deal
        .current_trick
        .as_ref()
        .ok_or_else(|| DomainError::IllegalTransition("no trick in progress".into()))?;
    let result = match autoplay.choose_play(&deal.hands[seat as usize], trick, level) {
        PlayDecision::Play(cards) => deal.apply_play(seat, &cards),
        PlayDecision::Pass => deal.apply_pass(seat),
    };
    fanout.broadcast(EventPayload::Public(PublicEvent::AutoPlayApplied { seat }));
    result
}

/// Wait for `seat`'s DoubleDown pool selection, auto-selecting the
/// higher-rank card once the seat has no live connection or misses its
/// deadline. A local rejection (an illegal pool card) is reported back and
/// leaves the decision open.
pub async fn drive_tribute_selection(
    deal: &mut Deal,
    seat: Seat,
    rx: &mut mpsc::Receiver<SeatCommand>,
    supervisor: &mut Supervisor,
    fanout: &FanOut,
    timeout: Duration,
) -> Result<(), DomainError> {
    loop {
        if supervisor.state_of(seat) != ConnectionState::Connected {
            return auto_select(fanout, deal, seat);
        }
        match tokio::time::timeout(timeout, rx.recv()).await {
            Ok(Some(SeatCommand::TributeSelect(card))) => match deal.apply_tribute_selection(seat, card) {
                Err(ref err) if err.is_local() => {
                    fanout.send_private(seat, EventPayload::Rejected(ActionRejected { seat, code: err.code() }));
                    continue;
                }
                other => return other,
            },
            Ok(Some(_)) => continue,
            Ok(None) => return Err(DomainError::SessionUnhealthy),
            Err(_elapsed) => return auto_select(fanout, deal, seat),
        }
    }
}

fn auto_select(fanout: &FanOut, deal: &mut Deal, seat: Seat) -> Result<(), DomainError> {
    let chosen = deal
        .tribute
        .as_ref()
        .and_then(|t| t.auto_select())
        .ok_or(DomainError::NoPendingDecision)?;
    let result = deal.apply_tribute_selection(seat, chosen);
    fanout.broadcast(EventPayload::Public(PublicEvent::AutoPlayApplied { seat }));
    result
}

/// Wait for `seat`'s return-card decision, auto-returning the lowest legal
/// card once the seat has no live connection or misses its deadline.
pub async fn drive_tribute_return(
    deal: &mut Deal,
    seat: Seat,
    rx: &mut mpsc::Receiver<SeatCommand>,
    supervisor: &mut Supervisor,
    fanout: &FanOut,
    timeout: Duration,
    level: Rank,
) -> Result<(), DomainError> {
    loop {
        if supervisor.state_of(seat) != ConnectionState::Connected {
            return auto_return(fanout, deal, seat, level);
        }
        match tokio::time::timeout(timeout, rx.recv()).await {
            Ok(Some(SeatCommand::TributeReturn(card))) => match deal.apply_tribute_return(seat, card) {
                Err(ref err) if err.is_local() => {
                    fanout.send_private(seat, EventPayload::Rejected(ActionRejected { seat, code: err.code() }));
                    continue;
                }
                other => return other,
            },
            Ok(Some(_)) => continue,
            Ok(None) => return Err(DomainError::SessionUnhealthy),
            Err(_elapsed) => return auto_return(fanout, deal, seat, level),
        }
    }
}

fn auto_return(fanout: &FanOut, deal: &mut Deal, seat: Seat, level: Rank) -> Result<(), DomainError> {
    let card = crate::domain::tribute::select_return_card(&deal.hands[seat as usize], level);
    let result = deal.apply_tribute_return(seat, card);
    fanout.broadcast(EventPayload::Public(PublicEvent::AutoPlayApplied { seat }));
    result
}

#[cfg(test)]
mod tests_turn_driver {
    use super::*;
    use crate::domain::autoplay::DefaultAutoPlay;

    #[tokio::test]
    async fn a_disconnected_seat_autoplays_at_once_without_entering_trusteeship() {
        let mut deal = Deal::new(1, Rank::Two, 3, None);
        let (_tx, mut rx) = mpsc::channel::<SeatCommand>(4);
        let mut supervisor = Supervisor::new(Duration::from_secs(60), Duration::from_secs(300));
        let fanout = FanOut::new(8);
        let leader = deal.current_trick.as_ref().unwrap().leader_seat;

        // Fresh supervisor: every seat starts Disconnected, never attached.
        let result = drive_play_decision(
            &mut deal,
            leader,
            &mut rx,
            &mut supervisor,
            &DefaultAutoPlay,
            &fanout,
            Duration::from_secs(5),
            Rank::Two,
        )
        .await;

        assert!(result.is_ok());
        assert_eq!(supervisor.state_of(leader), ConnectionState::Disconnected);
    }

    #[tokio::test]
    async fn a_connected_seat_that_misses_its_deadline_autoplays_without_entering_trusteeship() {
        let mut deal = Deal::new(2, Rank::Two, 3, None);
        let (_tx, mut rx) = mpsc::channel::<SeatCommand>(4);
        let mut supervisor = Supervisor::new(Duration::from_secs(60), Duration::from_secs(300));
        let fanout = FanOut::new(8);
        let leader = deal.current_trick.as_ref().unwrap().leader_seat;
        supervisor.on_attach(leader, std::time::Instant::now());

        let result = drive_play_decision(
            &mut deal,
            leader,
            &mut rx,
            &mut supervisor,
            &DefaultAutoPlay,
            &fanout,
            Duration::from_millis(5),
            Rank::Two,
        )
        .await;

        assert!(result.is_ok());
        assert_eq!(supervisor.state_of(leader), ConnectionState::Connected);
    }

    #[tokio::test]
    async fn a_timely_play_is_applied_directly() {
        let mut deal = Deal::new(3, Rank::Two, 3, None);
        let (tx, mut rx) = mpsc::channel::<SeatCommand>(4);
        let mut supervisor = Supervisor::new(Duration::from_secs(60), Duration::from_secs(300));
        let fanout = FanOut::new(8);
        let leader = deal.current_trick.as_ref().unwrap().leader_seat;
        let card = deal.hands[leader as usize][0];

        tx.send(SeatCommand::PlayCards(vec![card])).await.unwrap();
        let result = drive_play_decision(
            &mut deal,
            leader,
            &mut rx,
            &mut supervisor,
            &DefaultAutoPlay,
            &fanout,
            Duration::from_secs(5),
            Rank::Two,
        )
        .await;

        assert!(result.is_ok());
        assert_eq!(supervisor.state_of(leader), ConnectionState::Disconnected);
    }
}
