//! Public entry point into a running match. A transport session only ever
//! sees a [`MatchHandle`]; it never touches [`Match`](crate::domain::Match)
//! or the supervisor directly.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::domain::autoplay::{AutoPlayStrategy, DefaultAutoPlay};
use crate::domain::game_match::MatchResult;
use crate::domain::rules::Seat;
use crate::error::AppError;

use super::config::EngineConfig;
use super::events::EventEnvelope;
use super::match_task::{self, ControlCommand};
use super::turn_driver::SeatCommand;

#[derive(Clone)]
pub struct MatchHandle {
    pub match_id: u64,
    seat_senders: [mpsc::Sender<SeatCommand>; 4],
    control_tx: mpsc::Sender<ControlCommand>,
}

impl MatchHandle {
    /// Attach a fresh event stream for `seat`, replacing any previous one.
    pub async fn attach(&self, seat: Seat) -> Result<mpsc::Receiver<EventEnvelope>, AppError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.control_tx
            .send(ControlCommand::Attach { seat, reply: reply_tx })
            .await
            .map_err(|_| AppError::internal("match task is no longer running"))?;
        reply_rx.await.map_err(|_| AppError::internal("match task dropped the attach reply"))
    }

    pub async fn detach(&self, seat: Seat) {
        let _ = self.control_tx.send(ControlCommand::Detach { seat }).await;
    }

    pub async fn heartbeat(&self, seat: Seat) {
        let _ = self.control_tx.send(ControlCommand::Heartbeat { seat }).await;
    }

    pub async fn abort(&self) {
        let _ = self.control_tx.send(ControlCommand::Abort).await;
    }

    /// Submit a play/pass/tribute decision for `seat`. Rejections the match
    /// task itself raises (wrong turn, illegal combination, ...) surface as
    /// an `EventPayload::Rejected` on the seat's own event stream, not as an
    /// error here; this only errs if the match task itself is gone.
    pub async fn submit(&self, seat: Seat, cmd: SeatCommand) -> Result<(), AppError> {
        self.seat_senders[seat as usize]
            .send(cmd)
            .await
            .map_err(|_| AppError::internal("match task is no longer accepting decisions for this seat"))
    }
}

/// Spawn a fresh match task with the default auto-play strategy.
pub fn spawn_match(match_id: u64, config: EngineConfig) -> (MatchHandle, JoinHandle<Option<MatchResult>>) {
    spawn_match_with_autoplay(match_id, config, Arc::new(DefaultAutoPlay))
}

pub fn spawn_match_with_autoplay(
    match_id: u64,
    config: EngineConfig,
    autoplay: Arc<dyn AutoPlayStrategy>,
) -> (MatchHandle, JoinHandle<Option<MatchResult>>) {
    let capacity = config.event_queue_capacity;

    let mut tx_slots: [Option<mpsc::Sender<SeatCommand>>; 4] = Default::default();
    let mut rx_slots: [Option<mpsc::Receiver<SeatCommand>>; 4] = Default::default();
    for slot in 0..4 {
        let (tx, rx) = mpsc::channel(capacity);
        tx_slots[slot] = Some(tx);
        rx_slots[slot] = Some(rx);
    }
    let seat_senders = tx_slots.map(|o| o.expect("all four slots filled above"));
    let seat_rx = rx_slots.map(|o| o.expect("all four slots filled above"));

    let (control_tx, control_rx) = mpsc::channel(32);

    let join = tokio::spawn(match_task::run_match(match_id, config, seat_rx, control_rx, autoplay));

    (
        MatchHandle {
            match_id,
            seat_senders,
            control_tx,
        },
        join,
    )
}

#[cfg(test)]
mod tests_handle {
    use super::*;
    use crate::domain::cards::Rank;
    use std::time::Duration;

    #[tokio::test]
    async fn spawned_match_deals_and_reaches_the_first_decision() {
        let config = EngineConfig {
            shuffle_seed: Some(7),
            play_decision_timeout: Duration::from_millis(20),
            tribute_decision_timeout: Duration::from_millis(20),
            ..EngineConfig::default()
        };
        let (handle, join) = spawn_match(1, config);
        let mut rx = handle.attach(0).await.expect("attach succeeds");
        let first = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .expect("an event arrives")
            .expect("channel stays open");
        match first.payload {
            super::super::events::EventPayload::Public(super::super::events::PublicEvent::DealStarted { level, .. }) => {
                assert_eq!(level, Rank::Two);
            }
            other => panic!("expected DealStarted first, got {other:?}"),
        }
        handle.abort().await;
        let _ = join.await;
    }
}
