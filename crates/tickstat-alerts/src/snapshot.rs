use serde::{Deserialize, Serialize};
use tickstat_core::Bar;

/// Column view of the latest analytics pass. The last row is the current one.
///
/// Columns are optional: a condition over a missing column never fires.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    zscore: Option<Vec<Option<f64>>>,
    price: Option<Vec<f64>>,
    volume: Option<Vec<f64>>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Price and volume columns taken from a bar sequence.
    pub fn from_bars(bars: &[Bar]) -> Self {
        Self {
            zscore: None,
            price: Some(bars.iter().map(|bar| bar.price).collect()),
            volume: Some(bars.iter().map(|bar| bar.volume).collect()),
        }
    }

    pub fn with_zscore(mut self, zscore: Vec<Option<f64>>) -> Self {
        self.zscore = Some(zscore);
        self
    }

    pub fn with_price(mut self, price: Vec<f64>) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_volume(mut self, volume: Vec<f64>) -> Self {
        self.volume = Some(volume);
        self
    }

    pub fn zscore(&self) -> Option<&[Option<f64>]> {
        self.zscore.as_deref()
    }

    pub fn price(&self) -> Option<&[f64]> {
        self.price.as_deref()
    }

    pub fn volume(&self) -> Option<&[f64]> {
        self.volume.as_deref()
    }

    /// Row count: the longest present column.
    pub fn len(&self) -> usize {
        let zscore = self.zscore.as_ref().map_or(0, Vec::len);
        let price = self.price.as_ref().map_or(0, Vec::len);
        let volume = self.volume.as_ref().map_or(0, Vec::len);
        zscore.max(price).max(volume)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
