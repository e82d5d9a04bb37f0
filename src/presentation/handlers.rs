// HTTP request handlers
use crate::presentation::app_state::AppState;
use crate::presentation::views::{ChartView, CooldownStatusView, FlowPointView, ToastView};
use axum::{
    extract::State,
    response::{
        Json,
        sse::{Event, KeepAlive, Sse},
    },
};
use futures::Stream;
use serde::Serialize;
use std::convert::Infallible;
use std::sync::Arc;
use tokio::sync::watch;

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

fn chart_view(state: &AppState) -> Json<ChartView> {
    let chart = state.history.state();
    Json(ChartView::new(&chart, state.history.is_today()))
}

pub async fn get_chart(State(state): State<Arc<AppState>>) -> Json<ChartView> {
    chart_view(&state)
}

pub async fn previous_day(State(state): State<Arc<AppState>>) -> Json<ChartView> {
    state.history.previous_day();
    chart_view(&state)
}

pub async fn next_day(State(state): State<Arc<AppState>>) -> Json<ChartView> {
    if !state.history.next_day() {
        tracing::debug!("next day refused, already showing today");
    }
    chart_view(&state)
}

pub async fn refresh_chart(State(state): State<Arc<AppState>>) -> Json<ChartView> {
    state.history.refresh();
    chart_view(&state)
}

pub async fn get_flow(State(state): State<Arc<AppState>>) -> Json<Vec<FlowPointView>> {
    let points = state.flow.points();
    Json(FlowPointView::all(&points, state.flow.dead_band()))
}

/// Turn a state cell subscription into server-sent events: the current value
/// first, then one event per published change.
fn watch_events<T, V, F>(
    mut rx: watch::Receiver<Arc<T>>,
    name: &'static str,
    render: F,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>>
where
    T: Send + Sync + 'static,
    V: Serialize,
    F: Fn(&T) -> V + Send + 'static,
{
    let stream = async_stream::stream! {
        loop {
            let value = rx.borrow_and_update().clone();
            let rendered = serde_json::to_string(&render(&value));
            match rendered {
                Ok(data) => yield Ok(Event::default().event(name).data(data)),
                Err(e) => tracing::error!("{} serialization error: {}", name, e),
            }
            if rx.changed().await.is_err() {
                break;
            }
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}

pub async fn stream_chart(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let history = state.history.clone();
    watch_events(state.history.subscribe(), "chart", move |chart| {
        ChartView::new(chart, history.is_today())
    })
}

pub async fn stream_flow(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let dead_band = state.flow.dead_band();
    watch_events(state.flow.subscribe(), "flow", move |points| {
        FlowPointView::all(points, dead_band)
    })
}

pub async fn stream_cooldown(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    watch_events(state.cooldown.subscribe(), "cooldown", |view| {
        CooldownStatusView::from(view)
    })
}

pub async fn stream_toast(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    watch_events(state.notifier.subscribe(), "toast", |toast| {
        toast.clone().map(ToastView::from)
    })
}

pub async fn get_cooldown(State(state): State<Arc<AppState>>) -> Json<CooldownStatusView> {
    Json(CooldownStatusView::from(&*state.cooldown.view()))
}

pub async fn create_cooldown(State(state): State<Arc<AppState>>) -> Json<CooldownStatusView> {
    let view = state.cooldown.create().await;
    Json(CooldownStatusView::from(&*view))
}

pub async fn clear_cooldown(State(state): State<Arc<AppState>>) -> Json<CooldownStatusView> {
    let view = state.cooldown.clear().await;
    Json(CooldownStatusView::from(&*view))
}

pub async fn refresh_cooldown(State(state): State<Arc<AppState>>) -> Json<CooldownStatusView> {
    let view = state.cooldown.refresh_status().await;
    Json(CooldownStatusView::from(&*view))
}

pub async fn get_toast(State(state): State<Arc<AppState>>) -> Json<Option<ToastView>> {
    Json(state.notifier.current().map(ToastView::from))
}
