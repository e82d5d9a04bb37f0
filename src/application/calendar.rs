// Source of the current calendar day
use chrono::{Local, NaiveDate};

pub trait Calendar: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// The host's local calendar day.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalCalendar;

impl Calendar for LocalCalendar {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

#[cfg(test)]
pub struct FixedCalendar(pub NaiveDate);

#[cfg(test)]
impl Calendar for FixedCalendar {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
