//! Calendar-day segmentation and dry/wet classification.

use chrono::{Datelike, NaiveDate, Weekday};
use sewerflow_grid::TimeGrid;

/// Dry-weather status of one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DayClass {
    /// Complete day with no rain (above threshold) in the day or look-back.
    Dry,
    /// Complete day affected by rain.
    Wet,
    /// Day not fully covered by the series, or touching an unfilled gap.
    Incomplete,
}

/// Which diurnal pattern group a day belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DayGroup {
    /// Every day (combined grouping).
    All,
    /// Monday to Friday.
    Weekday,
    /// Saturday and Sunday.
    Weekend,
}

impl DayGroup {
    /// Returns the weekday/weekend group of `date`.
    pub fn of(date: NaiveDate) -> Self {
        match date.weekday() {
            Weekday::Sat | Weekday::Sun => Self::Weekend,
            _ => Self::Weekday,
        }
    }
}

/// One calendar day of the grid.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct DayInfo {
    date: NaiveDate,
    #[serde(skip)]
    start: usize,
    #[serde(skip)]
    len: usize,
    class: DayClass,
    rain_depth: f64,
}

impl DayInfo {
    /// Returns the calendar date.
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Returns the grid index of the day's first sample.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Returns the number of grid samples in the day.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the day holds no samples.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the grid index range of the day.
    pub fn range(&self) -> std::ops::Range<usize> {
        self.start..self.start + self.len
    }

    /// Returns the dry/wet classification.
    pub fn class(&self) -> DayClass {
        self.class
    }

    /// Returns `true` if the day is dry.
    pub fn is_dry(&self) -> bool {
        self.class == DayClass::Dry
    }

    /// Returns the rain depth over the day and its look-back window.
    pub fn rain_depth(&self) -> f64 {
        self.rain_depth
    }
}

/// Splits the grid into calendar days and classifies each.
///
/// A day is complete when it has every slot and none of them falls in an
/// unfilled gap of the grid. A complete day is dry when the rain over
/// `[day start - lookback, day end)` is at or below `threshold`. Without
/// rain every complete day is dry.
pub(crate) fn classify_days(
    grid: &TimeGrid,
    rain: Option<&[f64]>,
    lookback_hours: u32,
    threshold: f64,
) -> Vec<DayInfo> {
    let spd = grid.samples_per_day();
    let lookback = grid.samples_for_hours(f64::from(lookback_hours));

    let mut days = Vec::new();
    let mut start = 0;
    while start < grid.len() {
        let date = grid.day_of(start);
        let mut end = start + 1;
        while end < grid.len() && grid.day_of(end) == date {
            end += 1;
        }
        let len = end - start;

        let rain_depth = rain
            .map(|r| r[start.saturating_sub(lookback)..end].iter().sum::<f64>())
            .unwrap_or(0.0);
        let class = if len < spd || grid.overlaps_gap(start..end) {
            DayClass::Incomplete
        } else if rain_depth <= threshold {
            DayClass::Dry
        } else {
            DayClass::Wet
        };

        days.push(DayInfo {
            date,
            start,
            len,
            class,
            rain_depth,
        });
        start = end;
    }
    days
}
