use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::cards::Card;
use crate::domain::deal::DealResult;
use crate::domain::game_match::MatchResult;
use crate::domain::rules::Seat;
use crate::domain::snapshot::SeatView;
use crate::domain::trick::PlayRecord;
use crate::errors::ErrorCode;
/// What a seat currently owes a decision for. Carries a deadline so the
/// client can render a countdown; the engine times the same deadline out
/// independently with `tokio::time::timeout`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActionRequest {
    PlayOrPass { deadline_ms: u64 },
    TributeSelect { pool: [Card; 2], deadline_ms: u64 },
    TributeReturn { deadline_ms: u64 },
}

impl ActionRequest {
    pub fn with_deadline(self, remaining: Duration) -> Self {
        let ms = remaining.as_millis() as u64;
        match self {
            ActionRequest::PlayOrPass { .. } => ActionRequest::PlayOrPass { deadline_ms: ms },
            ActionRequest::TributeSelect { pool, .. } => ActionRequest::TributeSelect { pool, deadline_ms: ms },
            ActionRequest::TributeReturn { .. } => ActionRequest::TributeReturn { deadline_ms: ms },
        }
    }
}

/// A private hand delta, sent only to the owning seat's session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandDelta {
    pub seat: Seat,
    pub added: Option<Vec<Card>>,
    pub removed: Option<Vec<Card>>,
    pub full_hand: Option<Vec<Card>>,
}

/// A rejected submission, sent only to the seat that submitted it. The
/// decision stays open; this just tells the seat to try again.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionRejected {
    pub seat: Seat,
    pub code: ErrorCode,
}

/// Broadcast facts every seat at the table receives, in order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PublicEvent {
    DealStarted { deal_id: u64, level: crate::domain::cards::Rank },
    TributeTransfer { from: Seat, to: Seat },
    PlayMade { seat: Seat, play: PlayRecord },
    SeatPassed { seat: Seat },
    TrickFinished { winner: Seat },
    DealFinished { result: DealResult },
    MatchFinished { result: MatchResult },
    SeatDisconnected { seat: Seat },
    SeatReconnected { seat: Seat },
    SeatEnteredTrusteeship { seat: Seat },
    AutoPlayApplied { seat: Seat },
    MatchAborted { reason: String },
}

/// One envelope on the wire: a monotonically increasing sequence number
/// (per seat, across both public and private events) plus the payload.
/// Delivery is at-least-once and strictly in order; a reconnecting client
/// resyncs by comparing `sequence` against its own watermark.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub sequence: u64,
    pub timestamp_ms: u64,
    pub payload: EventPayload,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventPayload {
    Public(PublicEvent),
    Private(HandDelta),
    Rejected(ActionRejected),
    Action(ActionRequest),
    Snapshot(SeatView),
}

/// Convenience constructor; the fan-out layer is the only place that
/// actually assigns `sequence`/`timestamp_ms`.
pub fn envelope(sequence: u64, timestamp_ms: u64, payload: EventPayload) -> EventEnvelope {
    EventEnvelope {
        sequence,
        timestamp_ms,
        payload,
    }
}
