use axum::http::StatusCode;

/// Liveness handler for `GET /healthz`.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// Fold dependency probe results into a readiness status.
///
/// Services implement their own `GET /readyz` handler, run one probe per
/// backing store and hand the results here. Failures are logged with the
/// dependency name.
pub fn readiness<E: std::fmt::Display>(probes: &[(&'static str, Result<(), E>)]) -> StatusCode {
    let mut ready = true;
    for (dependency, result) in probes {
        if let Err(e) = result {
            tracing::warn!(dependency, error = %e, "readiness probe failed");
            ready = false;
        }
    }
    if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}
