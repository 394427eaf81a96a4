use actix_web::{web, HttpResponse};

use crate::state::AppState;

use super::session;

async fn create_match(app_state: web::Data<AppState>) -> HttpResponse {
    let handle = app_state.matches.create();
    HttpResponse::Created().json(serde_json::json!({ "match_id": handle.match_id }))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/matches", web::post().to(create_match))
        .route("/matches/{match_id}/seats/{seat}/ws", web::get().to(session::upgrade));
}
