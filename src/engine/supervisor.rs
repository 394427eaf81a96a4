use std::time::{Duration, Instant};

use crate::domain::rules::Seat;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connected,
    /// No live connection (never attached, or cleanly detached). Decisions
    /// auto-play with no wait, the same as `Trusteeship`.
    Disconnected,
    /// The seat's heartbeat lapsed while connected; the supervisor sets this
    /// directly at the moment of expiry. Decisions auto-play with no wait
    /// until the seat reattaches.
    Trusteeship,
}

struct SeatLiveness {
    state: ConnectionState,
    last_seen: Instant,
    disconnected_since: Option<Instant>,
}

/// Tracks per-seat connection liveness for one match: who's attached, who's
/// missed their heartbeat, and how long the table has been fully empty.
pub struct Supervisor {
    seats: [SeatLiveness; 4],
    heartbeat_timeout: Duration,
    match_idle_timeout: Duration,
}

impl Supervisor {
    pub fn new(heartbeat_timeout: Duration, match_idle_timeout: Duration) -> Self {
        let now = Instant::now();
        Supervisor {
            seats: std::array::from_fn(|_| SeatLiveness {
                state: ConnectionState::Disconnected,
                last_seen: now,
                disconnected_since: Some(now),
            }),
            heartbeat_timeout,
            match_idle_timeout,
        }
    }

    pub fn on_attach(&mut self, seat: Seat, now: Instant) {
        let s = &mut self.seats[seat as usize];
        s.state = ConnectionState::Connected;
        s.last_seen = now;
        s.disconnected_since = None;
    }

    pub fn on_heartbeat(&mut self, seat: Seat, now: Instant) {
        let s = &mut self.seats[seat as usize];
        s.last_seen = now;
        if s.state != ConnectionState::Connected {
            s.state = ConnectionState::Connected;
            s.disconnected_since = None;
        }
    }

    pub fn on_detach(&mut self, seat: Seat, now: Instant) {
        let s = &mut self.seats[seat as usize];
        s.state = ConnectionState::Disconnected;
        s.disconnected_since = Some(now);
    }

    /// Force a seat into trusteeship directly (e.g. an operator decision),
    /// independent of the heartbeat sweep.
    pub fn enter_trusteeship(&mut self, seat: Seat) {
        self.seats[seat as usize].state = ConnectionState::Trusteeship;
    }

    pub fn state_of(&self, seat: Seat) -> ConnectionState {
        self.seats[seat as usize].state
    }

    pub fn is_connected(&self, seat: Seat) -> bool {
        self.seats[seat as usize].state == ConnectionState::Connected
    }

    /// Seats whose heartbeat is overdue enter trusteeship directly, at the
    /// moment of expiry, rather than merely being marked disconnected.
    pub fn sweep_expired_heartbeats(&mut self, now: Instant) -> Vec<Seat> {
        let mut expired = Vec::new();
        for (i, s) in self.seats.iter_mut().enumerate() {
            if s.state == ConnectionState::Connected && now.duration_since(s.last_seen) > self.heartbeat_timeout {
                s.state = ConnectionState::Trusteeship;
                s.disconnected_since = Some(now);
                expired.push(i as Seat);
            }
        }
        expired
    }

    /// True once every seat has been disconnected continuously for at
    /// least `match_idle_timeout`; the match task should abort.
    pub fn all_disconnected_past_idle_timeout(&self, now: Instant) -> bool {
        self.seats.iter().all(|s| {
            s.state != ConnectionState::Connected
                && s.disconnected_since
                    .map(|since| now.duration_since(since) >= self.match_idle_timeout)
                    .unwrap_or(false)
        })
    }
}
