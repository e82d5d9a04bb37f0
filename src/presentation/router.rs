// Route table for the dashboard HTTP surface
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    clear_cooldown, create_cooldown, get_chart, get_cooldown, get_flow, get_toast, health_check,
    next_day, previous_day, refresh_chart, refresh_cooldown, stream_chart, stream_cooldown,
    stream_flow, stream_toast,
};
use axum::{Router, routing::get, routing::post};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/chart", get(get_chart))
        .route("/chart/previous-day", post(previous_day))
        .route("/chart/next-day", post(next_day))
        .route("/chart/refresh", post(refresh_chart))
        .route("/chart/stream", get(stream_chart))
        .route("/flow", get(get_flow))
        .route("/flow/stream", get(stream_flow))
        .route(
            "/cooldown",
            get(get_cooldown).post(create_cooldown).delete(clear_cooldown),
        )
        .route("/cooldown/refresh", post(refresh_cooldown))
        .route("/cooldown/stream", get(stream_cooldown))
        .route("/toast", get(get_toast))
        .route("/toast/stream", get(stream_toast))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
