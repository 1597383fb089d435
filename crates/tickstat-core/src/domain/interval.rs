use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Supported resample granularities for bar data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interval {
    #[serde(rename = "1s")]
    OneSecond,
    #[serde(rename = "1m")]
    OneMinute,
    #[serde(rename = "5m")]
    FiveMinutes,
}

impl Interval {
    pub const ALL: [Self; 3] = [Self::OneSecond, Self::OneMinute, Self::FiveMinutes];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OneSecond => "1s",
            Self::OneMinute => "1m",
            Self::FiveMinutes => "5m",
        }
    }

    pub const fn as_secs(self) -> u64 {
        match self {
            Self::OneSecond => 1,
            Self::OneMinute => 60,
            Self::FiveMinutes => 300,
        }
    }

    /// Bucket width in nanoseconds, the unit used for bucket arithmetic.
    pub const fn as_nanos(self) -> i128 {
        self.as_secs() as i128 * 1_000_000_000
    }

    pub const fn duration(self) -> Duration {
        Duration::from_secs(self.as_secs())
    }
}

impl Display for Interval {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interval {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "1s" => Ok(Self::OneSecond),
            "1m" | "1min" => Ok(Self::OneMinute),
            "5m" | "5min" => Ok(Self::FiveMinutes),
            other => Err(ValidationError::InvalidInterval {
                value: other.to_owned(),
            }),
        }
    }
}
