//! Timing, concurrency, and session lifecycle around the pure [`domain`]
//! rules engine: one cooperative task per running match, talked to only
//! through a [`MatchHandle`].

pub mod config;
pub mod events;
pub mod fanout;
pub mod handle;
pub mod match_task;
pub mod supervisor;
pub mod turn_driver;

pub use config::EngineConfig;
pub use events::{ActionRejected, ActionRequest, EventEnvelope, EventPayload, HandDelta, PublicEvent};
pub use handle::{spawn_match, spawn_match_with_autoplay, MatchHandle};
pub use supervisor::{ConnectionState, Supervisor};
pub use turn_driver::SeatCommand;
