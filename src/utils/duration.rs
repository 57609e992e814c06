//! Compact duration grammar: `1y2m3d4h5i6s`.
//!
//! Segments are optional and must appear in the order years, months, days,
//! an optional literal `T`, hours, minutes (`i`) and seconds. Parsing is total:
//! anything the grammar does not recognise contributes nothing.

use std::{fmt, time::Duration};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::constants::time;

static DURATION_GRAMMAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?P<years>[0-9]+y)?(?P<months>[0-9]+m)?(?P<days>[0-9]+d)?T?(?P<hours>[0-9]+h)?(?P<minutes>[0-9]+i)?(?P<seconds>[0-9]+s)?",
    )
    .expect("duration grammar is a valid regex")
});

/// A non-negative span of whole seconds produced by [`parse_duration`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DurationSpan {
    secs: u64,
}

impl DurationSpan {
    pub const ZERO: DurationSpan = DurationSpan { secs: 0 };

    pub fn as_secs(&self) -> u64 {
        self.secs
    }

    pub fn is_zero(&self) -> bool {
        self.secs == 0
    }

    pub fn as_duration(&self) -> Duration {
        Duration::from_secs(self.secs)
    }
}

impl fmt::Display for DurationSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.secs)
    }
}

/// Parses a duration string like "1y", "30d", "T12h" or "1y1m1d1h1i1s".
///
/// Never fails. An empty string, an out-of-order segment or a digit run too
/// large for a `u64` each contribute zero.
pub fn parse_duration(s: &str) -> DurationSpan {
    let Some(caps) = DURATION_GRAMMAR.captures(s) else {
        return DurationSpan::ZERO;
    };

    let unit = |name: &str| caps.name(name).map_or(0, |m| segment_value(m.as_str()));

    let days = unit("years")
        .saturating_mul(time::DAYS_PER_YEAR)
        .saturating_add(unit("months").saturating_mul(time::DAYS_PER_MONTH))
        .saturating_add(unit("days"));

    let secs = days
        .saturating_mul(time::SECONDS_PER_DAY)
        .saturating_add(unit("hours").saturating_mul(time::SECONDS_PER_HOUR))
        .saturating_add(unit("minutes").saturating_mul(time::SECONDS_PER_MINUTE))
        .saturating_add(unit("seconds"));

    DurationSpan { secs }
}

// Strips the unit suffix; unparsable digits count as zero.
fn segment_value(segment: &str) -> u64 {
    segment
        .get(..segment.len().saturating_sub(1))
        .and_then(|digits| digits.parse().ok())
        .unwrap_or(0)
}
