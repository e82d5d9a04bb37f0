// Telemetry data domain models
use chrono::NaiveDate;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum SeriesError {
    #[error(
        "series lengths differ: times={times}, solarIn={solar_in}, house={house}, charger={charger}"
    )]
    LengthMismatch {
        times: usize,
        solar_in: usize,
        house: usize,
        charger: usize,
    },
}

/// One calendar day of power samples. Index `i` of every sequence refers to
/// the same moment; a ragged series cannot be constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetrySeries {
    times: Vec<String>,
    solar_in: Vec<f64>,
    house: Vec<f64>,
    charger: Vec<f64>,
}

impl TelemetrySeries {
    pub fn new(
        times: Vec<String>,
        solar_in: Vec<f64>,
        house: Vec<f64>,
        charger: Vec<f64>,
    ) -> Result<Self, SeriesError> {
        let len = times.len();
        if solar_in.len() != len || house.len() != len || charger.len() != len {
            return Err(SeriesError::LengthMismatch {
                times: len,
                solar_in: solar_in.len(),
                house: house.len(),
                charger: charger.len(),
            });
        }

        Ok(Self {
            times,
            solar_in,
            house,
            charger,
        })
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}

#[cfg(test)]
impl TelemetrySeries {
    pub fn times(&self) -> &[String] {
        &self.times
    }

    pub fn solar_in(&self) -> &[f64] {
        &self.solar_in
    }

    pub fn house(&self) -> &[f64] {
        &self.house
    }

    pub fn charger(&self) -> &[f64] {
        &self.charger
    }
}

/// A single point-in-time reading; no history is kept.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InstantReading {
    pub solar: f64,
    pub heat: f64,
    pub ev_charger: f64,
    pub house: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesKind {
    Solar,
    House,
    Charger,
}

impl SeriesKind {
    pub const ALL: [SeriesKind; 3] = [SeriesKind::Solar, SeriesKind::House, SeriesKind::Charger];

    pub fn id(&self) -> &'static str {
        match self {
            SeriesKind::Solar => "solar",
            SeriesKind::House => "house",
            SeriesKind::Charger => "charger",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SeriesKind::Solar => "Solar Production",
            SeriesKind::House => "House Consumption",
            SeriesKind::Charger => "Charger",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            SeriesKind::Solar => "#4caf50",
            SeriesKind::House => "#f44336",
            SeriesKind::Charger => "#38d9b9",
        }
    }

    /// Production stacks on its own; both loads stack together.
    pub fn stack(&self) -> &'static str {
        match self {
            SeriesKind::Solar => "solar",
            SeriesKind::House | SeriesKind::Charger => "load",
        }
    }

    pub fn fill(&self) -> bool {
        matches!(self, SeriesKind::Solar)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub kind: SeriesKind,
    pub data: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

impl ChartData {
    pub fn empty() -> Self {
        Self {
            labels: Vec::new(),
            datasets: SeriesKind::ALL
                .iter()
                .map(|kind| Dataset {
                    kind: *kind,
                    data: Vec::new(),
                })
                .collect(),
        }
    }

    /// Build a whole chart from one series. Labels and every dataset come
    /// from the same series so they stay index-aligned.
    pub fn from_series(series: TelemetrySeries) -> Self {
        let TelemetrySeries {
            times,
            solar_in,
            house,
            charger,
        } = series;

        Self {
            labels: times,
            datasets: vec![
                Dataset {
                    kind: SeriesKind::Solar,
                    data: solar_in,
                },
                Dataset {
                    kind: SeriesKind::House,
                    data: house,
                },
                Dataset {
                    kind: SeriesKind::Charger,
                    data: charger,
                },
            ],
        }
    }

}

#[cfg(test)]
impl ChartData {
    pub fn dataset(&self, kind: SeriesKind) -> Option<&Dataset> {
        self.datasets.iter().find(|d| d.kind == kind)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartState {
    pub selected_date: NaiveDate,
    pub loading: bool,
    pub chart: Arc<ChartData>,
}

impl ChartState {
    pub fn new(selected_date: NaiveDate) -> Self {
        Self {
            selected_date,
            loading: false,
            chart: Arc::new(ChartData::empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_series_rejects_ragged_sequences() {
        let err = TelemetrySeries::new(
            labels(&["08:00", "09:00"]),
            vec![0.0, 120.0],
            vec![300.0],
            vec![0.0, 0.0],
        )
        .unwrap_err();

        assert_eq!(
            err,
            SeriesError::LengthMismatch {
                times: 2,
                solar_in: 2,
                house: 1,
                charger: 2,
            }
        );
    }

    #[test]
    fn test_chart_from_series_keeps_alignment() {
        let series = TelemetrySeries::new(
            labels(&["08:00", "09:00"]),
            vec![0.0, 120.0],
            vec![300.0, 280.0],
            vec![0.0, 0.0],
        )
        .unwrap();

        let chart = ChartData::from_series(series);

        assert_eq!(chart.labels, labels(&["08:00", "09:00"]));
        assert_eq!(chart.dataset(SeriesKind::Solar).unwrap().data, vec![0.0, 120.0]);
        assert_eq!(chart.dataset(SeriesKind::House).unwrap().data, vec![300.0, 280.0]);
        assert_eq!(chart.dataset(SeriesKind::Charger).unwrap().data, vec![0.0, 0.0]);
        for dataset in &chart.datasets {
            assert_eq!(dataset.data.len(), chart.labels.len());
        }
    }

    #[test]
    fn test_empty_chart_has_every_dataset() {
        let chart = ChartData::empty();
        assert!(chart.labels.is_empty());
        assert_eq!(chart.datasets.len(), 3);
        assert_eq!(SeriesKind::Solar.stack(), "solar");
        assert_eq!(SeriesKind::Charger.stack(), "load");
    }
}
