use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use axum::{
    Json,
    extract::{ConnectInfo, Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use nonzero_ext::nonzero;
use serde_json::json;

use crate::AppState;

pub type SubmissionLimiter = DefaultKeyedRateLimiter<IpAddr>;

pub fn submission_limiter(per_minute: u32) -> SubmissionLimiter {
    let per_minute = NonZeroU32::new(per_minute).unwrap_or(nonzero!(5u32));
    RateLimiter::keyed(Quota::per_minute(per_minute))
}

/// Drops buckets that have refilled completely, so idle clients stop
/// taking memory.
pub fn prune_idle(limiter: &SubmissionLimiter) {
    let before = limiter.len();
    limiter.retain_recent();
    limiter.shrink_to_fit();
    let dropped = before.saturating_sub(limiter.len());
    if dropped > 0 {
        tracing::debug!("Pruned {} idle rate limit bucket(s)", dropped);
    }
}

pub fn spawn_pruning(state: Arc<AppState>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(60));
        loop {
            interval.tick().await;
            prune_idle(&state.submission_limiter);
        }
    })
}

// Keyed by client IP; requests without connect info share one bucket
pub async fn limit_submissions(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, (StatusCode, Json<serde_json::Value>)> {
    let ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));

    if state.submission_limiter.check_key(&ip).is_err() {
        tracing::warn!("Rate limited submission from {}", ip);
        return Err((
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({"error": "Too many submissions, try again in a minute"}))
        ));
    }

    Ok(next.run(request).await)
}
