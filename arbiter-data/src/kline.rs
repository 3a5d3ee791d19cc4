use crate::error::DataError;

/// Candlestick interval buckets supported by the venue kline endpoint.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum KlineInterval {
    Min1,
    Min3,
    Min5,
    Min15,
    Min30,
    Hour1,
    Hour2,
    Hour4,
    Hour6,
    Hour12,
    Day,
    Week,
}

const MINUTE_BUCKETS: [(u64, KlineInterval); 5] = [
    (1, KlineInterval::Min1),
    (3, KlineInterval::Min3),
    (5, KlineInterval::Min5),
    (15, KlineInterval::Min15),
    (30, KlineInterval::Min30),
];

const HOUR_BUCKETS: [(u64, KlineInterval); 5] = [
    (1, KlineInterval::Hour1),
    (2, KlineInterval::Hour2),
    (4, KlineInterval::Hour4),
    (6, KlineInterval::Hour6),
    (12, KlineInterval::Hour12),
];

impl KlineInterval {
    /// Pick the smallest bucket covering `interval_secs`.
    ///
    /// Intervals exceeding seven days are rejected.
    pub fn from_seconds(interval_secs: u64) -> Result<Self, DataError> {
        for (minutes, bucket) in MINUTE_BUCKETS {
            if interval_secs <= minutes * 60 {
                return Ok(bucket);
            }
        }

        for (hours, bucket) in HOUR_BUCKETS {
            if interval_secs <= hours * 3_600 {
                return Ok(bucket);
            }
        }

        if interval_secs <= 86_400 {
            return Ok(KlineInterval::Day);
        }

        if interval_secs <= 7 * 86_400 {
            return Ok(KlineInterval::Week);
        }

        Err(DataError::UnsupportedInterval(interval_secs))
    }

    /// Venue wire name of the bucket.
    pub fn as_str(&self) -> &'static str {
        match self {
            KlineInterval::Min1 => "1min",
            KlineInterval::Min3 => "3min",
            KlineInterval::Min5 => "5min",
            KlineInterval::Min15 => "15min",
            KlineInterval::Min30 => "30min",
            KlineInterval::Hour1 => "1hour",
            KlineInterval::Hour2 => "2hour",
            KlineInterval::Hour4 => "4hour",
            KlineInterval::Hour6 => "6hour",
            KlineInterval::Hour12 => "12hour",
            KlineInterval::Day => "day",
            KlineInterval::Week => "week",
        }
    }
}

impl std::fmt::Display for KlineInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
