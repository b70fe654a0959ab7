//! Diurnal base-wastewater patterns.

use sewerflow_stats::mean;

use crate::classify::DayGroup;
use crate::config::PatternMode;

/// Sanitary daily means at or below this are treated as zero.
const MIN_SANITARY_MEAN: f64 = 1e-9;

/// One representative dry day: a value per diurnal slot.
///
/// Multiplicative patterns have mean 1.0; additive patterns have mean 0.0.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct DiurnalPattern {
    mode: PatternMode,
    values: Vec<f64>,
}

impl DiurnalPattern {
    /// Builds a pattern from raw slot values, normalising them to mean 1.0
    /// (multiplicative) or 0.0 (additive).
    ///
    /// A multiplicative pattern whose mean is not positive becomes flat.
    pub fn normalized(mode: PatternMode, mut values: Vec<f64>) -> Self {
        let m = mean(&values);
        match mode {
            PatternMode::Multiplicative if m > MIN_SANITARY_MEAN => {
                values.iter_mut().for_each(|v| *v /= m);
            }
            PatternMode::Multiplicative => values.iter_mut().for_each(|v| *v = 1.0),
            PatternMode::Additive => values.iter_mut().for_each(|v| *v -= m),
        }
        Self { mode, values }
    }

    /// A pattern with no diurnal variation.
    pub fn flat(mode: PatternMode, slots: usize) -> Self {
        let v = match mode {
            PatternMode::Multiplicative => 1.0,
            PatternMode::Additive => 0.0,
        };
        Self {
            mode,
            values: vec![v; slots],
        }
    }

    /// Returns the pattern mode.
    pub fn mode(&self) -> PatternMode {
        self.mode
    }

    /// Returns the slot values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Returns the number of slots per day.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the pattern has no slots.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the base wastewater flow for a daily sanitary level at `slot`.
    pub fn apply(&self, level: f64, slot: usize) -> f64 {
        let p = self.values[slot % self.values.len()];
        match self.mode {
            PatternMode::Multiplicative => level * p,
            PatternMode::Additive => level + p,
        }
    }
}

/// Diurnal pattern and sanitary level of one day group.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct GroupPattern {
    group: DayGroup,
    pattern: DiurnalPattern,
    sanitary_level: f64,
    n_days: usize,
}

impl GroupPattern {
    pub(crate) fn new(
        group: DayGroup,
        pattern: DiurnalPattern,
        sanitary_level: f64,
        n_days: usize,
    ) -> Self {
        Self {
            group,
            pattern,
            sanitary_level,
            n_days,
        }
    }

    /// Returns the day group.
    pub fn group(&self) -> DayGroup {
        self.group
    }

    /// Returns the diurnal pattern.
    pub fn pattern(&self) -> &DiurnalPattern {
        &self.pattern
    }

    /// Returns the mean dry-day sanitary flow of the group.
    pub fn sanitary_level(&self) -> f64 {
        self.sanitary_level
    }

    /// Returns the number of dry days the pattern was averaged over.
    ///
    /// Zero means the group had no dry days and borrowed the combined pattern.
    pub fn n_days(&self) -> usize {
        self.n_days
    }
}

/// Sanitary flow of one dry day, by diurnal slot.
pub(crate) struct DrySanitaryDay {
    pub(crate) group: DayGroup,
    pub(crate) slots: Vec<usize>,
    pub(crate) sanitary: Vec<f64>,
}

impl DrySanitaryDay {
    pub(crate) fn level(&self) -> f64 {
        mean(&self.sanitary)
    }
}

/// Point-wise mean of the dry-day shape curves.
///
/// Returns `None` when no day contributes a usable shape.
pub(crate) fn extract_pattern<'a>(
    days: impl Iterator<Item = &'a DrySanitaryDay>,
    mode: PatternMode,
    slots_per_day: usize,
) -> Option<DiurnalPattern> {
    let mut sums = vec![0.0; slots_per_day];
    let mut counts = vec![0_usize; slots_per_day];

    for day in days {
        let level = day.level();
        if mode == PatternMode::Multiplicative && level <= MIN_SANITARY_MEAN {
            continue;
        }
        for (&slot, &s) in day.slots.iter().zip(&day.sanitary) {
            sums[slot] += match mode {
                PatternMode::Multiplicative => s / level,
                PatternMode::Additive => s - level,
            };
            counts[slot] += 1;
        }
    }

    if counts.iter().any(|&c| c == 0) {
        return None;
    }
    let raw: Vec<f64> = sums
        .iter()
        .zip(&counts)
        .map(|(s, &c)| s / c as f64)
        .collect();
    Some(DiurnalPattern::normalized(mode, raw))
}
