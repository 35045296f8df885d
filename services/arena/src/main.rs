use sea_orm::Database;
use tracing::info;

use courtside_arena::config::ArenaConfig;
use courtside_arena::router::build_router;
use courtside_arena::state::AppState;
use courtside_core::config::Config;
use courtside_core::tracing::init_tracing;

#[tokio::main]
async fn main() {
    init_tracing("courtside_arena");

    let config = ArenaConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let redis_cfg = deadpool_redis::Config::from_url(&config.redis_url);
    let redis = redis_cfg
        .create_pool(Some(deadpool_redis::Runtime::Tokio1))
        .expect("failed to create Redis pool");

    let state = AppState {
        db,
        redis,
        jwt_secret: config.jwt_secret,
        otp_secret: config.otp_secret,
        access_token_ttl_secs: config.access_token_ttl_secs,
        otp_ttl_secs: config.otp_ttl_secs,
        otp_max_attempts: config.otp_max_attempts,
        payment_link_base: config.payment_link_base,
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.arena_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("arena service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
