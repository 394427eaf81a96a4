use std::fmt;
use std::str::FromStr;

/// Card rank. `Rank::value()` gives the natural rank-value used for raw
/// ordering; combination strength uses [`Card::combo_value`] instead, which
/// floats the current level's rank to 15.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub enum Rank {
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
    BlackJoker,
    RedJoker,
}

impl Rank {
    pub const ORDERED: [Rank; 13] = [
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ];

    pub fn is_joker(self) -> bool {
        matches!(self, Rank::BlackJoker | Rank::RedJoker)
    }

    /// Natural rank-value, 2..=14 for 2..A, jokers above everything.
    pub fn value(self) -> u8 {
        match self {
            Rank::Two => 2,
            Rank::Three => 3,
            Rank::Four => 4,
            Rank::Five => 5,
            Rank::Six => 6,
            Rank::Seven => 7,
            Rank::Eight => 8,
            Rank::Nine => 9,
            Rank::Ten => 10,
            Rank::Jack => 11,
            Rank::Queen => 12,
            Rank::King => 13,
            Rank::Ace => 14,
            Rank::BlackJoker => 15,
            Rank::RedJoker => 16,
        }
    }

    fn char_code(self) -> char {
        match self {
            Rank::Two => '2',
            Rank::Three => '3',
            Rank::Four => '4',
            Rank::Five => '5',
            Rank::Six => '6',
            Rank::Seven => '7',
            Rank::Eight => '8',
            Rank::Nine => '9',
            Rank::Ten => 'T',
            Rank::Jack => 'J',
            Rank::Queen => 'Q',
            Rank::King => 'K',
            Rank::Ace => 'A',
            Rank::BlackJoker => 'b',
            Rank::RedJoker => 'r',
        }
    }

    fn from_char(c: char) -> Option<Rank> {
        Some(match c {
            '2' => Rank::Two,
            '3' => Rank::Three,
            '4' => Rank::Four,
            '5' => Rank::Five,
            '6' => Rank::Six,
            '7' => Rank::Seven,
            '8' => Rank::Eight,
            '9' => Rank::Nine,
            'T' => Rank::Ten,
            'J' => Rank::Jack,
            'Q' => Rank::Queen,
            'K' => Rank::King,
            'A' => Rank::Ace,
            'b' => Rank::BlackJoker,
            'r' => Rank::RedJoker,
            _ => return None,
        })
    }
}

/// Card suit. Ordinary cards only; jokers carry no suit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Suit {
    Spade,
    Heart,
    Diamond,
    Club,
}

impl Suit {
    /// Deterministic tie-break order used for tribute card selection:
    /// Spade > Heart > Diamond > Club.
    pub fn tie_break_rank(self) -> u8 {
        match self {
            Suit::Spade => 3,
            Suit::Heart => 2,
            Suit::Diamond => 1,
            Suit::Club => 0,
        }
    }

    fn char_code(self) -> char {
        match self {
            Suit::Spade => 'S',
            Suit::Heart => 'H',
            Suit::Diamond => 'D',
            Suit::Club => 'C',
        }
    }

    fn from_char(c: char) -> Option<Suit> {
        Some(match c {
            'S' => Suit::Spade,
            'H' => Suit::Heart,
            'D' => Suit::Diamond,
            'C' => Suit::Club,
            _ => return None,
        })
    }
}

/// A single physical card: rank, suit (jokers have none), and which of the
/// two decks it came from. Value-typed, immutable, cheap to copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Option<Suit>,
    pub copy_index: u8,
}

/// Card identity is just the card itself: `(rank, suit, copy_index)` is
/// already a stable wire token.
pub type CardId = Card;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidCard;

impl Card {
    pub fn new(rank: Rank, suit: Option<Suit>, copy_index: u8) -> Result<Card, InvalidCard> {
        if rank.is_joker() && suit.is_some() {
            return Err(InvalidCard);
        }
        if !rank.is_joker() && suit.is_none() {
            return Err(InvalidCard);
        }
        if copy_index > 1 {
            return Err(InvalidCard);
        }
        Ok(Card {
            rank,
            suit,
            copy_index,
        })
    }

    pub fn is_joker(self) -> bool {
        self.rank.is_joker()
    }

    /// True when this card's rank equals the deal's current level.
    pub fn is_level_card(self, level: Rank) -> bool {
        !self.is_joker() && self.rank == level
    }

    /// True when this card is a wildcard: a level-card of suit Heart.
    pub fn is_wildcard(self, level: Rank) -> bool {
        self.is_level_card(level) && self.suit == Some(Suit::Heart)
    }

    /// Natural rank-value, ignoring the current level (2..=16).
    pub fn rank_value(self) -> u8 {
        self.rank.value()
    }

    /// Rank-value used when comparing cards *within a combination*: the
    /// level's rank floats to 15, jokers sit above that.
    pub fn combo_value(self, level: Rank) -> u8 {
        if self.is_joker() {
            match self.rank {
                Rank::BlackJoker => 16,
                Rank::RedJoker => 17,
                _ => unreachable!(),
            }
        } else if self.rank == level {
            15
        } else {
            self.rank.value()
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.suit {
            Some(suit) => write!(
                f,
                "{}{}{}",
                self.rank.char_code(),
                suit.char_code(),
                self.copy_index
            ),
            None => write!(f, "{}{}{}", self.rank.char_code(), self.rank.char_code(), self.copy_index),
        }
    }
}

impl FromStr for Card {
    type Err = InvalidCard;

    fn from_str(s: &str) -> Result<Card, InvalidCard> {
        let chars: Vec<char> = s.chars().collect();
        if chars.len() != 3 {
            return Err(InvalidCard);
        }
        let copy_index = chars[2].to_digit(10).ok_or(InvalidCard)? as u8;
        if chars[0] == 'r' || chars[0] == 'b' {
            let rank = Rank::from_char(chars[0]).ok_or(InvalidCard)?;
            return Card::new(rank, None, copy_index);
        }
        let rank = Rank::from_char(chars[0]).ok_or(InvalidCard)?;
        let suit = Suit::from_char(chars[1]).ok_or(InvalidCard)?;
        Card::new(rank, Some(suit), copy_index)
    }
}

impl serde::Serialize for Card {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for Card {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Card, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|_| serde::de::Error::custom(format!("invalid card token: {s}")))
    }
}

/// Build the canonical 108-card double deck: 2..A in all four suits, twice
/// each, plus two of each joker.
pub fn full_deck() -> Vec<Card> {
    let mut deck = Vec::with_capacity(108);
    for &rank in Rank::ORDERED.iter() {
        for &suit in &[Suit::Spade, Suit::Heart, Suit::Diamond, Suit::Club] {
            for copy in 0..2 {
                deck.push(Card::new(rank, Some(suit), copy).expect("valid ordinary card"));
            }
        }
    }
    for copy in 0..2 {
        deck.push(Card::new(Rank::BlackJoker, None, copy).expect("valid joker"));
        deck.push(Card::new(Rank::RedJoker, None, copy).expect("valid joker"));
    }
    deck
}
