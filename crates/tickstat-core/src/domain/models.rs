use serde::{Deserialize, Serialize};

use crate::{CoreError, Interval, Symbol, TimeSeries, UtcDateTime, ValidationError};

/// Single executed trade as delivered by the ingestion collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    pub timestamp: UtcDateTime,
    pub symbol: Symbol,
    pub price: f64,
    pub quantity: f64,
}

impl Tick {
    pub fn new(
        timestamp: UtcDateTime,
        symbol: Symbol,
        price: f64,
        quantity: f64,
    ) -> Result<Self, ValidationError> {
        validate_non_negative("price", price)?;
        validate_non_negative("quantity", quantity)?;

        Ok(Self {
            timestamp,
            symbol,
            price,
            quantity,
        })
    }

    /// Decode an exchange trade message (`{"T": millis, "s": symbol, "p": "price", "q": "qty"}`).
    pub fn from_trade_message(payload: &str) -> Result<Self, CoreError> {
        let message: TradeMessage = serde_json::from_str(payload)?;
        let price = parse_decimal_field("price", &message.price)?;
        let quantity = parse_decimal_field("quantity", &message.quantity)?;

        Ok(Self::new(
            UtcDateTime::from_unix_millis(message.trade_time)?,
            Symbol::parse(&message.symbol)?,
            price,
            quantity,
        )?)
    }
}

#[derive(Debug, Deserialize)]
struct TradeMessage {
    #[serde(rename = "T")]
    trade_time: i64,
    #[serde(rename = "s")]
    symbol: String,
    #[serde(rename = "p")]
    price: String,
    #[serde(rename = "q")]
    quantity: String,
}

fn parse_decimal_field(field: &'static str, raw: &str) -> Result<f64, ValidationError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| ValidationError::InvalidNumber { field })
}

/// Time bucket of trades: last traded price and the summed quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub bucket_start: UtcDateTime,
    pub price: f64,
    pub volume: f64,
}

impl Bar {
    pub fn new(bucket_start: UtcDateTime, price: f64, volume: f64) -> Result<Self, ValidationError> {
        validate_non_negative("price", price)?;
        validate_non_negative("volume", volume)?;

        Ok(Self {
            bucket_start,
            price,
            volume,
        })
    }
}

/// Bars for one symbol at one interval, ascending by `bucket_start`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarSeries {
    pub symbol: Symbol,
    pub interval: Interval,
    pub bars: Vec<Bar>,
}

impl BarSeries {
    pub fn new(symbol: Symbol, interval: Interval, bars: Vec<Bar>) -> Self {
        Self {
            symbol,
            interval,
            bars,
        }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn index(&self) -> Vec<UtcDateTime> {
        self.bars.iter().map(|bar| bar.bucket_start).collect()
    }

    pub fn prices(&self) -> Vec<Option<f64>> {
        self.bars.iter().map(|bar| Some(bar.price)).collect()
    }

    pub fn volumes(&self) -> Vec<f64> {
        self.bars.iter().map(|bar| bar.volume).collect()
    }

    /// Price column keyed by bucket start.
    pub fn price_series(&self) -> TimeSeries {
        TimeSeries::from_sorted(
            self.bars
                .iter()
                .map(|bar| (bar.bucket_start, Some(bar.price))),
        )
    }

    pub fn latest(&self) -> Option<&Bar> {
        self.bars.last()
    }
}

fn validate_non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    if value < 0.0 {
        return Err(ValidationError::NegativeValue { field });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(input: &str) -> UtcDateTime {
        UtcDateTime::parse(input).expect("timestamp")
    }

    #[test]
    fn rejects_non_finite_tick_price() {
        let symbol = Symbol::parse("BTCUSDT").expect("symbol");
        let err = Tick::new(ts("2024-01-01T00:00:00Z"), symbol, f64::NAN, 1.0)
            .expect_err("must fail");
        assert!(matches!(
            err,
            ValidationError::NonFiniteValue { field: "price" }
        ));
    }

    #[test]
    fn decodes_trade_message() {
        let payload = r#"{"e":"trade","E":1704067200123,"T":1704067200100,"s":"BTCUSDT","t":1,"p":"42000.50","q":"0.015","m":true}"#;
        let tick = Tick::from_trade_message(payload).expect("must decode");

        assert_eq!(tick.symbol.as_str(), "BTCUSDT");
        assert_eq!(tick.price, 42_000.5);
        assert_eq!(tick.quantity, 0.015);
        assert_eq!(tick.timestamp.unix_nanos(), 1_704_067_200_100_000_000);
    }

    #[test]
    fn rejects_trade_message_with_bad_price() {
        let payload = r#"{"T":1704067200100,"s":"BTCUSDT","p":"abc","q":"1"}"#;
        let err = Tick::from_trade_message(payload).expect_err("must fail");
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::InvalidNumber { field: "price" })
        ));
        assert!(matches!(
            Tick::from_trade_message("not json"),
            Err(CoreError::Serialization(_))
        ));
    }

    #[test]
    fn rejects_negative_bar_volume() {
        let err = Bar::new(ts("2024-01-01T00:00:00Z"), 10.0, -1.0).expect_err("must fail");
        assert!(matches!(
            err,
            ValidationError::NegativeValue { field: "volume" }
        ));
    }

    #[test]
    fn bar_series_exposes_columns() {
        let symbol = Symbol::parse("ETHUSDT").expect("symbol");
        let bars = vec![
            Bar::new(ts("2024-01-01T00:00:00Z"), 10.0, 1.5).expect("bar"),
            Bar::new(ts("2024-01-01T00:01:00Z"), 11.0, 2.5).expect("bar"),
        ];
        let series = BarSeries::new(symbol, Interval::OneMinute, bars);

        assert_eq!(series.prices(), vec![Some(10.0), Some(11.0)]);
        assert_eq!(series.volumes(), vec![1.5, 2.5]);
        assert_eq!(series.price_series().len(), 2);
        assert_eq!(series.latest().map(|bar| bar.price), Some(11.0));
    }
}
