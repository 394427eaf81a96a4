//! Guandan rules engine: card identity, combination recognition, dealing,
//! tricks, tribute, deals, and matches. Pure and synchronous; the `engine`
//! module supplies timing, concurrency, and transport around it.

pub mod autoplay;
pub mod cards;
pub mod combo;
pub mod deal;
pub mod dealer;
pub mod game_match;
pub mod rules;
pub mod snapshot;
pub mod trick;
pub mod tribute;
pub mod validate;

pub use cards::{Card, CardId, Rank, Suit};
pub use combo::{beats, recognize, Combination, ComboKind};
pub use deal::{Deal, DealResult, DealStatus};
pub use game_match::{Match, MatchResult, MatchStatus};
pub use rules::{team_of, teammate_of, Seat, Team};
pub use snapshot::{seat_view, SeatView};
pub use trick::Trick;
pub use tribute::{TributePhase, TributeTransfer, VictoryType};
