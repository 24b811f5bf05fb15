use std::convert::Infallible;
use std::fmt;
use std::ops::AddAssign;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

const SECS_PER_MINUTE: u64 = 60;
const SECS_PER_HOUR: u64 = 60 * SECS_PER_MINUTE;
const SECS_PER_DAY: u64 = 24 * SECS_PER_HOUR;

/// Whole compact string: one or more `<number><unit>` tokens.
static TIME_STR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\d+(?:\.\d+)?[dhm])+$").expect("time string pattern")
});

/// A single `<number><unit>` token.
static TIME_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+(?:\.\d+)?)([dhm])").expect("time token pattern")
});

/// A duration with whole-second resolution.
///
/// Components are always carried up, so `seconds < 60`, `minutes < 60` and
/// `hours < 24`; days are unbounded. The sign lives in `negative` so a
/// deficit (estimate minus actual) can still be displayed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Time {
    days: u64,
    hours: u64,
    minutes: u64,
    seconds: u64,
    #[serde(default)]
    negative: bool,
}

impl Time {
    /// Build a time from components. Overflowing components are carried up.
    pub fn new(days: u64, hours: u64, minutes: u64, seconds: u64) -> Self {
        let mut time = Time {
            days,
            hours,
            minutes,
            seconds,
            negative: false,
        };
        time.carry_up();
        time
    }

    /// A signed number of seconds.
    pub fn parse_second(seconds: i64) -> Self {
        let mut time = Time {
            seconds: seconds.unsigned_abs(),
            negative: seconds < 0,
            ..Time::default()
        };
        time.carry_up();
        time
    }

    /// A signed number of milliseconds, truncated toward zero.
    pub fn parse_ms(millis: i64) -> Self {
        Time::parse_second(millis / 1000)
    }

    /// Fractional hours, rounded to the nearest second.
    pub fn parse_hour(hours: f64) -> Self {
        Time::parse_second((hours * SECS_PER_HOUR as f64).round() as i64)
    }

    /// Parse the compact form, e.g. `1d2h30m`, `0.5h` or `-45m`.
    ///
    /// Malformed input is not an error: it yields a zero time and a warning.
    pub fn parse_str(text: &str) -> Self {
        let text = text.trim();
        if text.is_empty() {
            return Time::default();
        }
        let (negative, body) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text),
        };
        if !TIME_STR.is_match(body) {
            tracing::warn!(input = text, "malformed time string, using zero");
            return Time::default();
        }

        let mut total = 0.0_f64;
        for caps in TIME_TOKEN.captures_iter(body) {
            let value: f64 = caps[1].parse().unwrap_or(0.0);
            let unit = match &caps[2] {
                "d" => SECS_PER_DAY,
                "h" => SECS_PER_HOUR,
                _ => SECS_PER_MINUTE,
            };
            total += value * unit as f64;
        }

        let seconds = total.round() as i64;
        Time::parse_second(if negative { -seconds } else { seconds })
    }

    pub fn days(&self) -> u64 {
        self.days
    }

    pub fn hours(&self) -> u64 {
        self.hours
    }

    pub fn minutes(&self) -> u64 {
        self.minutes
    }

    pub fn seconds(&self) -> u64 {
        self.seconds
    }

    pub fn is_negative(&self) -> bool {
        self.negative
    }

    pub fn is_empty(&self) -> bool {
        self.magnitude() == 0
    }

    /// Signed total in seconds, saturating at `i64::MAX`.
    pub fn to_seconds(&self) -> i64 {
        let magnitude = i64::try_from(self.magnitude()).unwrap_or(i64::MAX);
        if self.negative { -magnitude } else { magnitude }
    }

    pub fn to_minutes(&self) -> f64 {
        self.to_seconds() as f64 / SECS_PER_MINUTE as f64
    }

    pub fn to_hours(&self) -> f64 {
        self.to_seconds() as f64 / SECS_PER_HOUR as f64
    }

    /// Add `other` to this time in place and return the receiver.
    /// Sums past the representable range saturate.
    pub fn add(&mut self, other: &Time) -> &mut Self {
        *self = Time::parse_second(self.to_seconds().saturating_add(other.to_seconds()));
        self
    }

    /// Subtract `other` from this time in place and return the receiver.
    pub fn sub(&mut self, other: &Time) -> &mut Self {
        *self = Time::parse_second(self.to_seconds().saturating_sub(other.to_seconds()));
        self
    }

    /// Ratio of this time to `other`, or `None` if either side is zero.
    pub fn divide(&self, other: &Time) -> Option<f64> {
        if self.is_empty() || other.is_empty() {
            return None;
        }
        Some(self.to_seconds() as f64 / other.to_seconds() as f64)
    }

    fn magnitude(&self) -> u64 {
        self.days
            .saturating_mul(SECS_PER_DAY)
            .saturating_add(self.hours * SECS_PER_HOUR)
            .saturating_add(self.minutes * SECS_PER_MINUTE)
            .saturating_add(self.seconds)
    }

    // Order matters: seconds feed minutes, minutes feed hours, hours feed days.
    fn carry_up(&mut self) {
        self.minutes += self.seconds / 60;
        self.seconds %= 60;
        self.hours += self.minutes / 60;
        self.minutes %= 60;
        self.days += self.hours / 24;
        self.hours %= 24;
        if self.magnitude() == 0 {
            self.negative = false;
        }
    }
}

impl fmt::Display for Time {
    /// Only non-zero day/hour/minute units are written; seconds never are.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        if self.days > 0 {
            out.push_str(&format!("{}d", self.days));
        }
        if self.hours > 0 {
            out.push_str(&format!("{}h", self.hours));
        }
        if self.minutes > 0 {
            out.push_str(&format!("{}m", self.minutes));
        }
        if self.negative && !out.is_empty() {
            write!(f, "-")?;
        }
        write!(f, "{}", out)
    }
}

impl FromStr for Time {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Time::parse_str(s))
    }
}

impl AddAssign<&Time> for Time {
    fn add_assign(&mut self, other: &Time) {
        self.add(other);
    }
}

impl AddAssign for Time {
    fn add_assign(&mut self, other: Time) {
        self.add(&other);
    }
}
