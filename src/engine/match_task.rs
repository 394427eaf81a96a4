//! The per-match driver loop (spec: one single-threaded cooperative task per
//! match, suspended only while waiting on a seat's decision). Owns the
//! [`Match`], its [`Supervisor`], and its [`FanOut`]; nothing outside this
//! task ever touches them directly.

use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use tokio::sync::{mpsc, oneshot};
use tracing::warn;

use crate::domain::autoplay::AutoPlayStrategy;
use crate::domain::deal::{Deal, DealStatus};
use crate::domain::game_match::{Match, MatchResult};
use crate::domain::rules::Seat;
use crate::domain::snapshot::seat_view;
use crate::errors::DomainError;

use super::config::EngineConfig;
use super::events::{ActionRequest, EventEnvelope, EventPayload, HandDelta, PublicEvent};
use super::fanout::FanOut;
use super::supervisor::Supervisor;
use super::turn_driver::{self, SeatCommand};

/// Operational controls and liveness signals. These never touch a deal's
/// rules state directly, only the supervisor and fan-out around it.
pub enum ControlCommand {
    Attach {
        seat: Seat,
        reply: oneshot::Sender<mpsc::Receiver<EventEnvelope>>,
    },
    Detach {
        seat: Seat,
    },
    Heartbeat {
        seat: Seat,
    },
    Abort,
}

fn fallback_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(1)
}

fn drain_control(control_rx: &mut mpsc::Receiver<ControlCommand>, supervisor: &mut Supervisor, fanout: &mut FanOut, aborted: &mut bool) {
    while let Ok(cmd) = control_rx.try_recv() {
        match cmd {
            ControlCommand::Attach { seat, reply } => {
                supervisor.on_attach(seat, Instant::now());
                let rx = fanout.attach(seat);
                if reply.send(rx).is_err() {
                    fanout.detach(seat);
                }
                fanout.broadcast(EventPayload::Public(PublicEvent::SeatReconnected { seat }));
            }
            ControlCommand::Detach { seat } => {
                supervisor.on_detach(seat, Instant::now());
                fanout.detach(seat);
                fanout.broadcast(EventPayload::Public(PublicEvent::SeatDisconnected { seat }));
            }
            ControlCommand::Heartbeat { seat } => supervisor.on_heartbeat(seat, Instant::now()),
            ControlCommand::Abort => *aborted = true,
        }
    }
    for seat in supervisor.sweep_expired_heartbeats(Instant::now()) {
        fanout.broadcast(EventPayload::Public(PublicEvent::SeatEnteredTrusteeship { seat }));
    }
}

fn broadcast_hands(fanout: &FanOut, deal: &Deal) {
    for seat in 0..4u8 {
        fanout.send_private(
            seat,
            EventPayload::Private(HandDelta {
                seat,
                added: None,
                removed: None,
                full_hand: Some(deal.hands[seat as usize].clone()),
            }),
        );
        fanout.send_private(seat, EventPayload::Snapshot(seat_view(deal, seat)));
    }
}

/// Decisions that lapse all the way into a non-local error mean the match
/// task itself can't keep going for this seat (a dead channel, a bug). Log
/// it; the outer loop's idle/abort checks handle the fallout.
fn log_decision_error(match_id: u64, seat: Seat, err: &DomainError) {
    warn!(match_id, seat, error = %err, "turn driver returned a non-local error");
}

/// Translate a just-applied play/pass into the public events for it, by
/// diffing the trick's play/pass counts against their pre-decision values.
fn broadcast_play_outcome(fanout: &FanOut, deal: &Deal, seat: Seat, plays_before: usize, passes_before: usize, history_before: usize) {
    if deal.trick_history.len() > history_before {
        let finished = deal.trick_history.last().expect("just grew");
        if finished.plays.len() > plays_before {
            if let Some(last_play) = finished.plays.last() {
                fanout.broadcast(EventPayload::Public(PublicEvent::PlayMade {
                    seat,
                    play: last_play.clone(),
                }));
            }
        } else if finished.passes.len() > passes_before {
            fanout.broadcast(EventPayload::Public(PublicEvent::SeatPassed { seat }));
        }
        if let Some(winner) = finished.winner_seat {
            fanout.broadcast(EventPayload::Public(PublicEvent::TrickFinished { winner }));
        }
        fanout.send_private(
            seat,
            EventPayload::Private(HandDelta {
                seat,
                added: None,
                removed: None,
                full_hand: Some(deal.hands[seat as usize].clone()),
            }),
        );
        return;
    }

    let trick = deal.current_trick.as_ref().expect("trick still open when history is unchanged");
    if trick.plays.len() > plays_before {
        let play = trick.plays.last().expect("just grew").clone();
        fanout.send_private(
            seat,
            EventPayload::Private(HandDelta {
                seat,
                added: None,
                removed: Some(play.combo.cards.clone()),
                full_hand: None,
            }),
        );
        fanout.broadcast(EventPayload::Public(PublicEvent::PlayMade { seat, play }));
    } else if trick.passes.len() > passes_before {
        fanout.broadcast(EventPayload::Public(PublicEvent::SeatPassed { seat }));
    }
}

/// Drive one match end to end: deals in sequence, each deal's tribute phase
/// (if any) then its tricks, until a team reaches the terminal level or the
/// match is aborted. Returns the final result, or `None` if aborted first.
pub async fn run_match(
    match_id: u64,
    config: EngineConfig,
    mut seat_rx: [mpsc::Receiver<SeatCommand>; 4],
    mut control_rx: mpsc::Receiver<ControlCommand>,
    autoplay: Arc<dyn AutoPlayStrategy>,
) -> Option<MatchResult> {
    let mut m = Match::new(match_id);
    let mut supervisor = Supervisor::new(config.heartbeat_timeout, config.match_idle_timeout);
    let mut fanout = FanOut::new(config.event_queue_capacity);
    let mut aborted = false;

    'matches: loop {
        drain_control(&mut control_rx, &mut supervisor, &mut fanout, &mut aborted);
        if aborted {
            fanout.broadcast(EventPayload::Public(PublicEvent::MatchAborted {
                reason: "match aborted by operator".into(),
            }));
            break;
        }

        let seed = config.shuffle_seed.unwrap_or_else(fallback_seed);
        m.start_deal(seed);
        {
            let deal = m.current_deal.as_ref().expect("just started");
            fanout.broadcast(EventPayload::Public(PublicEvent::DealStarted {
                deal_id: deal.id,
                level: deal.level,
            }));
            broadcast_hands(&fanout, deal);
        }

        loop {
            drain_control(&mut control_rx, &mut supervisor, &mut fanout, &mut aborted);
            if aborted || supervisor.all_disconnected_past_idle_timeout(Instant::now()) {
                fanout.broadcast(EventPayload::Public(PublicEvent::MatchAborted {
                    reason: if aborted {
                        "match aborted by operator".into()
                    } else {
                        "every seat disconnected past the idle timeout".into()
                    },
                }));
                break 'matches;
            }

            let status = m.current_deal.as_ref().expect("deal in progress").status;
            match status {
                DealStatus::Tribute => {
                    let transfers_before = m
                        .current_deal
                        .as_ref()
                        .unwrap()
                        .tribute
                        .as_ref()
                        .map(|t| t.transfers.len())
                        .unwrap_or(0);
                    let awaiting = m.current_deal.as_ref().unwrap().tribute.as_ref().and_then(|t| t.awaiting_selection());
                    if let Some((seat, pool)) = awaiting {
                        fanout.send_private(
                            seat,
                            EventPayload::Action(ActionRequest::TributeSelect {
                                pool,
                                deadline_ms: config.tribute_decision_timeout.as_millis() as u64,
                            }),
                        );
                        let deal = m.current_deal.as_mut().unwrap();
                        if let Err(err) = turn_driver::drive_tribute_selection(
                            deal,
                            seat,
                            &mut seat_rx[seat as usize],
                            &mut supervisor,
                            &fanout,
                            config.tribute_decision_timeout,
                        )
                        .await
                        {
                            log_decision_error(match_id, seat, &err);
                        }
                    } else {
                        let pending = m
                            .current_deal
                            .as_ref()
                            .unwrap()
                            .tribute
                            .as_ref()
                            .map(|t| t.pending_returns().to_vec())
                            .unwrap_or_default();
                        if let Some((winner, _payer)) = pending.into_iter().next() {
                            fanout.send_private(
                                winner,
                                EventPayload::Action(ActionRequest::TributeReturn {
                                    deadline_ms: config.tribute_decision_timeout.as_millis() as u64,
                                }),
                            );
                            let level = m.current_deal.as_ref().unwrap().level;
                            let deal = m.current_deal.as_mut().unwrap();
                            if let Err(err) = turn_driver::drive_tribute_return(
                                deal,
                                winner,
                                &mut seat_rx[winner as usize],
                                &mut supervisor,
                                &fanout,
                                config.tribute_decision_timeout,
                                level,
                            )
                            .await
                            {
                                log_decision_error(match_id, winner, &err);
                            }
                        }
                    }

                    let deal_ref = m.current_deal.as_ref().unwrap();
                    match &deal_ref.tribute {
                        Some(phase) => {
                            for t in phase.transfers.iter().skip(transfers_before) {
                                fanout.broadcast(EventPayload::Public(PublicEvent::TributeTransfer { from: t.from, to: t.to }));
                            }
                        }
                        None => broadcast_hands(&fanout, deal_ref),
                    }
                }
                DealStatus::Playing => {
                    let deal_ref = m.current_deal.as_ref().unwrap();
                    if deal_ref.is_finished() {
                        break;
                    }
                    let trick = deal_ref.current_trick.as_ref().expect("playing deal has an open trick");
                    let seat = trick.current_seat;
                    let level = deal_ref.level;
                    let plays_before = trick.plays.len();
                    let passes_before = trick.passes.len();
                    let history_before = deal_ref.trick_history.len();

                    fanout.send_private(
                        seat,
                        EventPayload::Action(ActionRequest::PlayOrPass {
                            deadline_ms: config.play_decision_timeout.as_millis() as u64,
                        }),
                    );
                    let deal = m.current_deal.as_mut().unwrap();
                    if let Err(err) = turn_driver::drive_play_decision(
                        deal,
                        seat,
                        &mut seat_rx[seat as usize],
                        &mut supervisor,
                        autoplay.as_ref(),
                        &fanout,
                        config.play_decision_timeout,
                        level,
                    )
                    .await
                    {
                        log_decision_error(match_id, seat, &err);
                    }
                    broadcast_play_outcome(&fanout, m.current_deal.as_ref().unwrap(), seat, plays_before, passes_before, history_before);
                }
                DealStatus::Dealing | DealStatus::Finished => break,
            }
        }

        let result = m.finish_current_deal();
        if let Some(r) = result {
            fanout.broadcast(EventPayload::Public(PublicEvent::DealFinished { result: r }));
        }
        if m.is_finished() {
            if let Some(mr) = m.result() {
                fanout.broadcast(EventPayload::Public(PublicEvent::MatchFinished { result: mr }));
            }
            break;
        }
    }

    m.result()
}
