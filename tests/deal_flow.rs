use guandan_core::domain::{Deal, DealStatus, Rank};

#[test]
fn opening_deal_deals_twenty_seven_cards_to_every_seat_with_seat_zero_leading() {
    let deal = Deal::new(1, Rank::Two, 42, None);
    assert_eq!(deal.status, DealStatus::Playing);
    for hand in &deal.hands {
        assert_eq!(hand.len(), 27);
    }
    let trick = deal.current_trick.as_ref().expect("opening deal starts with a trick");
    assert_eq!(trick.leader_seat, 0);
    assert_eq!(trick.current_seat, 0);
}

#[test]
fn same_seed_deals_the_same_opening_hand() {
    let a = Deal::new(1, Rank::Two, 99, None);
    let b = Deal::new(2, Rank::Two, 99, None);
    assert_eq!(a.hands, b.hands);
}

#[test]
fn a_lead_then_three_passes_closes_the_trick_in_the_leaders_favor() {
    let mut deal = Deal::new(1, Rank::Two, 7, None);
    let leader = deal.current_trick.as_ref().unwrap().leader_seat;
    assert_eq!(leader, 0);

    let lead_card = deal.hands[0][0];
    deal.apply_play(0, &[lead_card]).expect("leader's own card is a legal single");
    assert_eq!(deal.current_trick.as_ref().unwrap().current_seat, 1);

    deal.apply_pass(1).expect("seat 1 may pass once a lead is on the table");
    deal.apply_pass(2).expect("seat 2 may pass");
    assert!(deal.current_trick.is_some(), "trick is not over until it comes back around to the leader");

    deal.apply_pass(3).expect("seat 3 may pass, closing the trick");
    // A finished trick is folded into history and a fresh one opens,
    // led by the seat that won it.
    assert_eq!(deal.trick_history.len(), 1);
    assert_eq!(deal.trick_history[0].winner_seat, Some(0));
    let next_trick = deal.current_trick.as_ref().expect("a new trick opens for the next round");
    assert_eq!(next_trick.leader_seat, 0);
    assert_eq!(deal.hands[0].len(), 26, "the leader's played card left their hand");
}

#[test]
fn seat_out_of_turn_cannot_play() {
    let mut deal = Deal::new(1, Rank::Two, 7, None);
    let card = deal.hands[1][0];
    let err = deal.apply_play(1, &[card]).unwrap_err();
    assert_eq!(err, guandan_core::errors::DomainError::NotYourTurn);
}

#[test]
fn the_leader_cannot_pass_with_no_lead_on_the_table() {
    let mut deal = Deal::new(1, Rank::Two, 7, None);
    let err = deal.apply_pass(0).unwrap_err();
    assert_eq!(err, guandan_core::errors::DomainError::IllegalPass);
}
