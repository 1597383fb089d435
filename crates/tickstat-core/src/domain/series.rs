use serde::{Deserialize, Serialize};

use crate::{UtcDateTime, ValidationError};

/// Numeric series keyed by a strictly increasing timestamp index.
///
/// `None` marks positions without a value (not enough history, gaps in the
/// source data).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    index: Vec<UtcDateTime>,
    values: Vec<Option<f64>>,
}

impl TimeSeries {
    pub fn new(index: Vec<UtcDateTime>, values: Vec<Option<f64>>) -> Result<Self, ValidationError> {
        if index.len() != values.len() {
            return Err(ValidationError::SeriesLengthMismatch {
                index: index.len(),
                values: values.len(),
            });
        }

        if let Some(position) = index.windows(2).position(|pair| pair[0] >= pair[1]) {
            return Err(ValidationError::UnorderedIndex {
                position: position + 1,
            });
        }

        Ok(Self { index, values })
    }

    /// Build from points already known to be ordered and unique, such as a
    /// bar series. Out-of-order points are dropped.
    pub fn from_sorted(points: impl IntoIterator<Item = (UtcDateTime, Option<f64>)>) -> Self {
        let mut series = Self::default();
        for (ts, value) in points {
            if series.index.last().is_some_and(|last| *last >= ts) {
                continue;
            }
            series.index.push(ts);
            series.values.push(value);
        }
        series
    }

    pub fn index(&self) -> &[UtcDateTime] {
        &self.index
    }

    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (UtcDateTime, Option<f64>)> + '_ {
        self.index.iter().copied().zip(self.values.iter().copied())
    }

    pub fn latest(&self) -> Option<(UtcDateTime, Option<f64>)> {
        self.iter().last()
    }

    pub fn into_parts(self) -> (Vec<UtcDateTime>, Vec<Option<f64>>) {
        (self.index, self.values)
    }
}
