use axum::extract::State;
use axum::http::StatusCode;
use deadpool_redis::redis;

use courtside_core::health::readiness;

use crate::state::AppState;

async fn ping_redis(state: &AppState) -> Result<(), String> {
    let mut conn = state.redis.get().await.map_err(|e| e.to_string())?;
    let _: String = redis::cmd("PING")
        .query_async(&mut conn)
        .await
        .map_err(|e| e.to_string())?;
    Ok(())
}

/// `GET /readyz`: Postgres and Redis must both answer.
pub async fn readyz(State(state): State<AppState>) -> StatusCode {
    let postgres = state.db.ping().await.map_err(|e| e.to_string());
    let redis = ping_redis(&state).await;
    readiness(&[("postgres", postgres), ("redis", redis)])
}
