use std::time::{Duration, Instant};

use actix::prelude::*;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use tracing::{info, warn};

use crate::domain::rules::Seat;
use crate::engine::{EventEnvelope, MatchHandle, SeatCommand};
use crate::state::AppState;

use super::protocol::{ClientMsg, ServerMsg, PROTOCOL_VERSION};

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(15);
const CLIENT_TIMEOUT: Duration = Duration::from_secs(45);

/// One seat's live websocket connection to one match. Thin: all rules and
/// timing live in the match task behind `handle`, this just translates
/// frames.
pub struct MatchSession {
    match_id: u64,
    seat: Seat,
    handle: MatchHandle,
    last_heartbeat: Instant,
    heartbeat_handle: Option<SpawnHandle>,
    hello_done: bool,
}

impl MatchSession {
    fn new(match_id: u64, seat: Seat, handle: MatchHandle) -> Self {
        MatchSession {
            match_id,
            seat,
            handle,
            last_heartbeat: Instant::now(),
            heartbeat_handle: None,
            hello_done: false,
        }
    }

    fn send_json(ctx: &mut ws::WebsocketContext<Self>, msg: &ServerMsg) {
        match serde_json::to_string(msg) {
            Ok(payload) => ctx.text(payload),
            Err(err) => warn!(error = %err, "failed to serialize outbound message"),
        }
    }

    fn send_error_and_close(&self, ctx: &mut ws::WebsocketContext<Self>, code: crate::errors::ErrorCode, message: impl Into<String>) {
        Self::send_json(
            ctx,
            &ServerMsg::Error {
                code,
                message: message.into(),
            },
        );
        ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Error)));
        ctx.stop();
    }

    fn start_heartbeat(&mut self, ctx: &mut ws::WebsocketContext<Self>) {
        let handle = ctx.run_interval(HEARTBEAT_INTERVAL, |actor, ctx| {
            if Instant::now().duration_since(actor.last_heartbeat) > CLIENT_TIMEOUT {
                warn!(match_id = actor.match_id, seat = actor.seat, "heartbeat timed out, closing");
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Normal)));
                ctx.stop();
                return;
            }
            ctx.ping(b"keepalive");
        });
        self.heartbeat_handle = Some(handle);
    }

    fn forward_events(&self, ctx: &mut ws::WebsocketContext<Self>, mut rx: tokio::sync::mpsc::Receiver<EventEnvelope>) {
        let addr = ctx.address();
        actix::spawn(async move {
            while let Some(env) = rx.recv().await {
                addr.do_send(ForwardEvent(env));
            }
        });
    }
}

/// Delivered to the actor's own mailbox by the background forwarding task
/// started in `started()`; never constructed anywhere else.
#[derive(Message)]
#[rtype(result = "()")]
struct ForwardEvent(EventEnvelope);

impl Actor for MatchSession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        info!(match_id = self.match_id, seat = self.seat, "session started");
        self.start_heartbeat(ctx);

        let handle = self.handle.clone();
        let seat = self.seat;
        let addr = ctx.address();
        ctx.spawn(
            async move { handle.attach(seat).await }
                .into_actor(self)
                .map(move |res, actor, ctx| match res {
                    Ok(rx) => actor.forward_events(ctx, rx),
                    Err(err) => {
                        warn!(seat, error = %err, "failed to attach to match");
                        ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Error)));
                        ctx.stop();
                    }
                }),
        );
        let _ = addr;
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        let handle = self.handle.clone();
        let seat = self.seat;
        actix::spawn(async move { handle.detach(seat).await });
        info!(match_id = self.match_id, seat = self.seat, "session stopped");
    }
}

impl Handler<ForwardEvent> for MatchSession {
    type Result = ();

    fn handle(&mut self, msg: ForwardEvent, ctx: &mut Self::Context) -> Self::Result {
        Self::send_json(ctx, &ServerMsg::Event(msg.0));
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for MatchSession {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(payload)) => {
                self.last_heartbeat = Instant::now();
                ctx.pong(&payload);
            }
            Ok(ws::Message::Pong(_)) => {
                self.last_heartbeat = Instant::now();
            }
            Ok(ws::Message::Text(text)) => {
                self.last_heartbeat = Instant::now();
                let Ok(cmd) = serde_json::from_str::<ClientMsg>(&text) else {
                    self.send_error_and_close(ctx, crate::errors::ErrorCode::IllegalTransition, "malformed JSON");
                    return;
                };
                self.handle_client_msg(ctx, cmd);
            }
            Ok(ws::Message::Binary(_)) => {
                self.send_error_and_close(ctx, crate::errors::ErrorCode::IllegalTransition, "binary frames are not supported");
            }
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
            }
            Ok(ws::Message::Continuation(_)) | Ok(ws::Message::Nop) => {
                self.last_heartbeat = Instant::now();
            }
            Err(err) => {
                warn!(match_id = self.match_id, seat = self.seat, error = %err, "protocol error");
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Error)));
                ctx.stop();
            }
        }
    }
}

impl MatchSession {
    fn handle_client_msg(&mut self, ctx: &mut ws::WebsocketContext<Self>, cmd: ClientMsg) {
        match cmd {
            ClientMsg::Hello { protocol } => {
                if protocol != PROTOCOL_VERSION {
                    self.send_error_and_close(ctx, crate::errors::ErrorCode::IllegalTransition, "unsupported protocol version");
                    return;
                }
                self.hello_done = true;
                Self::send_json(
                    ctx,
                    &ServerMsg::HelloAck {
                        protocol: PROTOCOL_VERSION,
                        seat: self.seat,
                    },
                );
            }
            ClientMsg::Heartbeat => {
                let handle = self.handle.clone();
                let seat = self.seat;
                actix::spawn(async move { handle.heartbeat(seat).await });
            }
            other => {
                if !self.hello_done {
                    self.send_error_and_close(ctx, crate::errors::ErrorCode::IllegalTransition, "must send hello first");
                    return;
                }
                let seat_cmd = match other {
                    ClientMsg::PlayCards { cards } => SeatCommand::PlayCards(cards),
                    ClientMsg::Pass => SeatCommand::Pass,
                    ClientMsg::TributeSelect { card } => SeatCommand::TributeSelect(card),
                    ClientMsg::TributeReturn { card } => SeatCommand::TributeReturn(card),
                    ClientMsg::Hello { .. } | ClientMsg::Heartbeat => unreachable!("handled above"),
                };
                let handle = self.handle.clone();
                let seat = self.seat;
                actix::spawn(async move {
                    let _ = handle.submit(seat, seat_cmd).await;
                });
            }
        }
    }
}

/// Upgrade an HTTP request to a websocket bound to one seat of one match.
pub async fn upgrade(
    req: HttpRequest,
    stream: web::Payload,
    path: web::Path<(u64, u8)>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let (match_id, seat) = path.into_inner();
    let handle = app_state.matches.get(match_id).map_err(actix_web::error::ErrorNotFound)?;
    let session = MatchSession::new(match_id, seat, handle);
    ws::start(session, &req, stream)
}
