use actix_web::{web, App, HttpServer};
use guandan_core::engine::EngineConfig;
use guandan_core::state::AppState;
use guandan_core::transport::{self, MatchRegistry};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    guandan_core::telemetry::init_tracing();

    println!("Starting Guandan match server on http://127.0.0.1:8080");

    let config = EngineConfig::from_env().unwrap_or_else(|err| {
        eprintln!("invalid engine configuration: {err}");
        std::process::exit(1);
    });

    let matches = MatchRegistry::new(config);
    let app_state = web::Data::new(AppState::new(matches));

    HttpServer::new(move || App::new().app_data(app_state.clone()).configure(transport::routes::configure))
        .bind(("127.0.0.1", 8080))?
        .run()
        .await
}
