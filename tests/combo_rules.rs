use guandan_core::domain::{beats, recognize, Card, ComboKind, Rank, Suit};

fn c(rank: Rank, suit: Suit) -> Card {
    Card::new(rank, Some(suit), 0).unwrap()
}

fn joker(rank: Rank, copy: u8) -> Card {
    Card::new(rank, None, copy).unwrap()
}

#[test]
fn straight_beats_single_is_rejected_by_shape_mismatch() {
    let single = recognize(&[c(Rank::King, Suit::Spade)], Rank::Two).unwrap();
    let straight = recognize(
        &[
            c(Rank::Three, Suit::Spade),
            c(Rank::Four, Suit::Diamond),
            c(Rank::Five, Suit::Heart),
            c(Rank::Six, Suit::Club),
            c(Rank::Seven, Suit::Spade),
        ],
        Rank::Two,
    )
    .unwrap();
    // Different shapes never beat one another outside of a bomb.
    assert!(!beats(&single, &straight));
    assert!(!beats(&straight, &single));
}

#[test]
fn bomb_beats_triple() {
    let triple = recognize(&[c(Rank::Nine, Suit::Spade), c(Rank::Nine, Suit::Heart), c(Rank::Nine, Suit::Diamond)], Rank::Two).unwrap();
    let bomb = recognize(
        &[
            c(Rank::Four, Suit::Spade),
            c(Rank::Four, Suit::Heart),
            c(Rank::Four, Suit::Diamond),
            c(Rank::Four, Suit::Club),
        ],
        Rank::Two,
    )
    .unwrap();
    assert!(matches!(bomb.kind, ComboKind::NaiveBomb(4)));
    assert!(beats(&triple, &bomb));
}

#[test]
fn bigger_bomb_beats_smaller_bomb() {
    let four = recognize(
        &[
            c(Rank::Four, Suit::Spade),
            c(Rank::Four, Suit::Heart),
            c(Rank::Four, Suit::Diamond),
            c(Rank::Four, Suit::Club),
        ],
        Rank::Two,
    )
    .unwrap();
    // Two decks carry two copies of Spade-Five; draw both by copy_index.
    let five_of_a_kind = recognize(
        &[
            Card::new(Rank::Five, Some(Suit::Spade), 0).unwrap(),
            Card::new(Rank::Five, Some(Suit::Heart), 0).unwrap(),
            Card::new(Rank::Five, Some(Suit::Diamond), 0).unwrap(),
            Card::new(Rank::Five, Some(Suit::Club), 0).unwrap(),
            Card::new(Rank::Five, Some(Suit::Spade), 1).unwrap(),
        ],
        Rank::Two,
    )
    .expect("five-card bomb recognized");
    assert!(matches!(five_of_a_kind.kind, ComboKind::NaiveBomb(5)));
    assert!(beats(&four, &five_of_a_kind));
}

#[test]
fn wildcard_completes_a_straight() {
    // Level is Two; the Two of Hearts is the wildcard and can stand in for
    // the missing Six.
    let wildcard = Card::new(Rank::Two, Some(Suit::Heart), 0).unwrap();
    let cards = [
        c(Rank::Three, Suit::Spade),
        c(Rank::Four, Suit::Diamond),
        c(Rank::Five, Suit::Heart),
        wildcard,
        c(Rank::Seven, Suit::Spade),
    ];
    let combo = recognize(&cards, Rank::Two).expect("wildcard fills the straight");
    assert_eq!(combo.kind, ComboKind::Straight);
    assert_eq!(combo.size(), 5);
}

#[test]
fn joker_bomb_beats_everything() {
    let joker_bomb = recognize(
        &[
            joker(Rank::BlackJoker, 0),
            joker(Rank::BlackJoker, 1),
            joker(Rank::RedJoker, 0),
            joker(Rank::RedJoker, 1),
        ],
        Rank::Two,
    )
    .unwrap();
    assert_eq!(joker_bomb.kind, ComboKind::JokerBomb);
    let straight_flush = recognize(
        &[
            Card::new(Rank::Three, Some(Suit::Spade), 0).unwrap(),
            Card::new(Rank::Four, Some(Suit::Spade), 0).unwrap(),
            Card::new(Rank::Five, Some(Suit::Spade), 0).unwrap(),
            Card::new(Rank::Six, Some(Suit::Spade), 0).unwrap(),
            Card::new(Rank::Seven, Some(Suit::Spade), 0).unwrap(),
        ],
        Rank::Two,
    )
    .unwrap();
    assert_eq!(straight_flush.kind, ComboKind::StraightFlush);
    assert!(beats(&straight_flush, &joker_bomb));
}
