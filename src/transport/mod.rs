//! Websocket transport: the wire protocol, the per-seat session actor, the
//! match registry, and route wiring. Everything here is a thin translation
//! layer over [`crate::engine`]; no game rules live here.

pub mod protocol;
pub mod registry;
pub mod routes;
pub mod session;

pub use protocol::{ClientMsg, ServerMsg};
pub use registry::MatchRegistry;
