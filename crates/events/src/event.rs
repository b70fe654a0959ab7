//! Storm event type.

use chrono::NaiveDateTime;

/// One storm and the flow-response window that follows it.
///
/// Indices refer to the flow grid; `end_index` is inclusive.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct StormEvent {
    start: NaiveDateTime,
    rain_end: NaiveDateTime,
    end: NaiveDateTime,
    start_index: usize,
    rain_end_index: usize,
    end_index: usize,
    total_depth: f64,
    peak_intensity: f64,
}

impl StormEvent {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        start: NaiveDateTime,
        rain_end: NaiveDateTime,
        end: NaiveDateTime,
        start_index: usize,
        rain_end_index: usize,
        end_index: usize,
        total_depth: f64,
        peak_intensity: f64,
    ) -> Self {
        Self {
            start,
            rain_end,
            end,
            start_index,
            rain_end_index,
            end_index,
            total_depth,
            peak_intensity,
        }
    }

    /// Timestamp of the first wet sample.
    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    /// Timestamp of the last wet sample.
    pub fn rain_end(&self) -> NaiveDateTime {
        self.rain_end
    }

    /// Timestamp at which the response window closes.
    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    /// Grid index of the first wet sample.
    pub fn start_index(&self) -> usize {
        self.start_index
    }

    /// Grid index of the last wet sample.
    pub fn rain_end_index(&self) -> usize {
        self.rain_end_index
    }

    /// Grid index of the last sample in the window.
    pub fn end_index(&self) -> usize {
        self.end_index
    }

    /// Grid index range covered by the window.
    pub fn range(&self) -> std::ops::Range<usize> {
        self.start_index..self.end_index + 1
    }

    /// Number of grid samples in the window.
    pub fn len(&self) -> usize {
        self.end_index + 1 - self.start_index
    }

    /// Always `false`; a window holds at least its first wet sample.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Total rain depth of the event.
    pub fn total_depth(&self) -> f64 {
        self.total_depth
    }

    /// Largest rolling one-hour depth, in depth per hour.
    pub fn peak_intensity(&self) -> f64 {
        self.peak_intensity
    }
}
