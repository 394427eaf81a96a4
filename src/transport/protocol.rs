//! The wire protocol spoken over one seat's websocket connection: a thin
//! envelope around [`crate::engine::SeatCommand`] inbound and
//! [`crate::engine::EventEnvelope`] outbound.

use serde::{Deserialize, Serialize};

use crate::domain::cards::Card;
use crate::engine::EventEnvelope;
use crate::errors::ErrorCode;

pub const PROTOCOL_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMsg {
    Hello { protocol: u32 },
    PlayCards { cards: Vec<Card> },
    Pass,
    TributeSelect { card: Card },
    TributeReturn { card: Card },
    Heartbeat,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMsg {
    HelloAck { protocol: u32, seat: u8 },
    Event(EventEnvelope),
    Error { code: ErrorCode, message: String },
}
