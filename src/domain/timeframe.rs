//! Bar sampling interval.
//!
//! Written `<count><unit>` where unit is `m` (minutes), `h` (hours), `d`
//! (days) or `w` (weeks), the notation exchanges use for kline intervals.

use chrono::TimeDelta;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeUnit {
    Minute,
    Hour,
    Day,
    Week,
}

impl TimeUnit {
    fn minutes(self) -> i64 {
        match self {
            TimeUnit::Minute => 1,
            TimeUnit::Hour => 60,
            TimeUnit::Day => 60 * 24,
            TimeUnit::Week => 60 * 24 * 7,
        }
    }

    fn suffix(self) -> char {
        match self {
            TimeUnit::Minute => 'm',
            TimeUnit::Hour => 'h',
            TimeUnit::Day => 'd',
            TimeUnit::Week => 'w',
        }
    }
}

/// Longest accepted interval: 52 weeks.
const MAX_MINUTES: i64 = 60 * 24 * 7 * 52;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Timeframe {
    pub count: u32,
    pub unit: TimeUnit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimeframeError {
    #[error("empty timeframe")]
    Empty,

    #[error("unknown unit '{0}' (expected m, h, d or w)")]
    UnknownUnit(char),

    #[error("invalid count in '{0}'")]
    InvalidCount(String),

    #[error("timeframe '{0}' is longer than 52 weeks")]
    TooLong(String),
}

impl Timeframe {
    pub const fn new(count: u32, unit: TimeUnit) -> Self {
        Self { count, unit }
    }

    fn minutes(&self) -> i64 {
        i64::from(self.count) * self.unit.minutes()
    }

    pub fn duration(&self) -> TimeDelta {
        self.span(1)
    }

    /// Wall-clock span covered by `bars` consecutive bars, saturating at `TimeDelta::MAX`.
    pub fn span(&self, bars: usize) -> TimeDelta {
        i64::try_from(bars)
            .ok()
            .and_then(|bars| bars.checked_mul(self.minutes()))
            .and_then(TimeDelta::try_minutes)
            .unwrap_or(TimeDelta::MAX)
    }
}

impl Default for Timeframe {
    fn default() -> Self {
        Timeframe::new(2, TimeUnit::Minute)
    }
}

impl FromStr for Timeframe {
    type Err = TimeframeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let unit_char = s.chars().last().ok_or(TimeframeError::Empty)?;
        let unit = match unit_char {
            'm' => TimeUnit::Minute,
            'h' | 'H' => TimeUnit::Hour,
            'd' | 'D' => TimeUnit::Day,
            'w' | 'W' => TimeUnit::Week,
            other => return Err(TimeframeError::UnknownUnit(other)),
        };
        let count: u32 = s[..s.len() - unit_char.len_utf8()]
            .parse()
            .map_err(|_| TimeframeError::InvalidCount(s.to_string()))?;
        if count == 0 {
            return Err(TimeframeError::InvalidCount(s.to_string()));
        }
        let timeframe = Timeframe { count, unit };
        if timeframe.minutes() > MAX_MINUTES {
            return Err(TimeframeError::TooLong(s.to_string()));
        }
        Ok(timeframe)
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.count, self.unit.suffix())
    }
}

/// Human form of a span, in the largest whole unit: "20 minutes", "4 hours", "1 day".
pub fn describe_span(span: TimeDelta) -> String {
    let minutes = span.num_minutes();
    let (value, unit) = if minutes != 0 && minutes % (60 * 24) == 0 {
        (minutes / (60 * 24), "day")
    } else if minutes != 0 && minutes % 60 == 0 {
        (minutes / 60, "hour")
    } else {
        (minutes, "minute")
    };
    if value == 1 {
        format!("1 {}", unit)
    } else {
        format!("{} {}s", value, unit)
    }
}
