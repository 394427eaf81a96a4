use super::cards::Rank;

/// Number of seats at the table. Fixed by the game's rules.
pub const SEATS: usize = 4;

/// Cards dealt to each seat at the start of a deal.
pub const HAND_SIZE: usize = 27;

/// A seat index, always in `0..SEATS`.
pub type Seat = u8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Team {
    A,
    B,
}

/// Seats `{0, 2}` form team A; `{1, 3}` form team B.
pub fn team_of(seat: Seat) -> Team {
    if seat % 2 == 0 {
        Team::A
    } else {
        Team::B
    }
}

/// This seat's teammate (the other seat on the same team).
pub fn teammate_of(seat: Seat) -> Seat {
    (seat + 2) % 4
}

/// Next seat clockwise, wrapping at 4.
pub fn next_seat(seat: Seat) -> Seat {
    (seat + 1) % 4
}

/// The level a team starts a match at.
pub fn starting_level() -> Rank {
    Rank::Two
}

/// The level at which a team wins the match by taking a deal.
pub fn terminal_level() -> Rank {
    Rank::Ace
}

/// Raise `level` by `steps`, clamped at the terminal level (Ace). Levels
/// never decrease and never skip past Ace.
pub fn advance_level(level: Rank, steps: u8) -> Rank {
    let target = level.value().saturating_add(steps);
    let capped = target.min(terminal_level().value());
    Rank::ORDERED
        .iter()
        .copied()
        .find(|r| r.value() == capped)
        .unwrap_or(terminal_level())
}
