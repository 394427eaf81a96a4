use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use tokio::sync::mpsc;
use tracing::warn;

use super::events::{envelope, EventEnvelope, EventPayload};
use crate::domain::rules::Seat;

/// One seat's outbound queue. Bounded: a session that can't keep up gets
/// disconnected rather than letting the match task block on a slow writer.
pub struct SeatChannel {
    pub seat: Seat,
    sender: mpsc::Sender<EventEnvelope>,
}

/// Fans events out to the four seats of one match. Each seat has its own
/// sequence counter and bounded queue; a private event only ever reaches
/// its own seat.
pub struct FanOut {
    seats: [Option<SeatChannel>; 4],
    sequences: [AtomicU64; 4],
    capacity: usize,
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

impl FanOut {
    pub fn new(capacity: usize) -> Self {
        FanOut {
            seats: Default::default(),
            sequences: Default::default(),
            capacity,
        }
    }

    /// Attach a fresh receiver for `seat`, replacing any previous one (the
    /// old session, if still connected, is left holding a dead sender).
    pub fn attach(&mut self, seat: Seat) -> mpsc::Receiver<EventEnvelope> {
        let (tx, rx) = mpsc::channel(self.capacity);
        self.seats[seat as usize] = Some(SeatChannel { seat, sender: tx });
        rx
    }

    pub fn detach(&mut self, seat: Seat) {
        self.seats[seat as usize] = None;
    }

    fn send_to(&self, seat: Seat, payload: EventPayload) {
        let Some(channel) = &self.seats[seat as usize] else {
            return;
        };
        let sequence = self.sequences[seat as usize].fetch_add(1, Ordering::Relaxed);
        let env = envelope(sequence, now_ms(), payload);
        if channel.sender.try_send(env).is_err() {
            warn!(seat, "seat's event queue is full or closed; dropping delivery");
        }
    }

    /// Deliver to all four seats, public events going out in the same
    /// relative order to everyone (though each seat's sequence numbers are
    /// independent).
    pub fn broadcast(&self, payload: EventPayload) {
        for seat in 0..4u8 {
            self.send_to(seat, payload.clone());
        }
    }

    pub fn send_private(&self, seat: Seat, payload: EventPayload) {
        self.send_to(seat, payload);
    }
}

#[cfg(test)]
mod tests_fanout {
    use super::*;
    use crate::engine::events::PublicEvent;

    #[tokio::test]
    async fn broadcast_reaches_every_attached_seat() {
        let mut fanout = FanOut::new(8);
        let mut receivers = Vec::new();
        for seat in 0..4u8 {
            receivers.push(fanout.attach(seat));
        }
        fanout.broadcast(EventPayload::Public(PublicEvent::SeatPassed { seat: 1 }));
        for rx in &mut receivers {
            let env = rx.recv().await.unwrap();
            assert_eq!(env.sequence, 0);
        }
    }

    #[tokio::test]
    async fn detached_seat_receives_nothing() {
        let mut fanout = FanOut::new(8);
        let mut rx0 = fanout.attach(0);
        fanout.detach(0);
        fanout.broadcast(EventPayload::Public(PublicEvent::SeatPassed { seat: 2 }));
        assert!(rx0.try_recv().is_err());
    }
}
