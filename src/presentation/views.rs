// JSON views handed to the renderer
use crate::domain::cooldown::CooldownView;
use crate::domain::flow::FlowPoint;
use crate::domain::telemetry::{ChartState, Dataset};
use crate::domain::toast::ToastMessage;
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartView {
    pub date: String,
    pub is_today: bool,
    pub loading: bool,
    pub labels: Vec<String>,
    pub datasets: Vec<DatasetView>,
}

#[derive(Debug, Serialize)]
pub struct DatasetView {
    pub id: &'static str,
    pub label: &'static str,
    pub color: &'static str,
    pub stack: &'static str,
    pub fill: bool,
    pub data: Vec<f64>,
}

impl From<&Dataset> for DatasetView {
    fn from(dataset: &Dataset) -> Self {
        Self {
            id: dataset.kind.id(),
            label: dataset.kind.label(),
            color: dataset.kind.color(),
            stack: dataset.kind.stack(),
            fill: dataset.kind.fill(),
            data: dataset.data.clone(),
        }
    }
}

impl ChartView {
    pub fn new(state: &ChartState, is_today: bool) -> Self {
        Self {
            date: state.selected_date.format("%Y-%m-%d").to_string(),
            is_today,
            loading: state.loading,
            labels: state.chart.labels.clone(),
            datasets: state.chart.datasets.iter().map(DatasetView::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FlowPointView {
    pub slot: &'static str,
    pub x: f64,
    pub y: f64,
    pub value: f64,
    pub rotation: f64,
    pub color: &'static str,
    pub transform: String,
}

impl FlowPointView {
    pub fn new(point: &FlowPoint, dead_band: f64) -> Self {
        Self {
            slot: point.slot().id(),
            x: point.x(),
            y: point.y(),
            value: point.value(),
            rotation: point.rotation(),
            color: point.color(dead_band).css(),
            transform: point.transform(),
        }
    }

    pub fn all(points: &[FlowPoint], dead_band: f64) -> Vec<Self> {
        points.iter().map(|p| Self::new(p, dead_band)).collect()
    }
}

#[derive(Debug, Serialize)]
pub struct CooldownStatusView {
    pub state: &'static str,
    pub loading: bool,
}

impl From<&CooldownView> for CooldownStatusView {
    fn from(view: &CooldownView) -> Self {
        Self {
            state: view.state.as_str(),
            loading: view.loading,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ToastView {
    pub text: String,
    pub severity: &'static str,
}

impl From<ToastMessage> for ToastView {
    fn from(message: ToastMessage) -> Self {
        Self {
            severity: message.severity.as_str(),
            text: message.text,
        }
    }
}
