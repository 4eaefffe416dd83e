//! Half-open time intervals with unbounded ends.
//!
//! Every interval is `[begin, end)`. A missing `begin` extends to the
//! beginning of time and a missing `end` extends forever. Two intervals that
//! merely touch at a boundary do not overlap. An interval with `begin == end`
//! is an instant and is used for point-in-time queries.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::types::{SlotPath, Timestamp};

/// Errors raised by interval narrowing.
///
/// Narrowing is only ever requested for intervals already known to overlap,
/// so either variant indicates a bug in the caller.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum IntervalError {
    /// The two intervals passed to [`TimeInterval::narrow`] do not overlap.
    #[error("cannot narrow disjoint intervals {left} and {right}")]
    Disjoint {
        /// First operand.
        left: TimeInterval,
        /// Second operand.
        right: TimeInterval,
    },
    /// The narrowed bounds would be inverted.
    #[error("narrowed interval is inverted: begin {begin} is after end {end}")]
    Inverted {
        /// Largest begin candidate.
        begin: Timestamp,
        /// Smallest end candidate.
        end: Timestamp,
    },
}

impl IntervalError {
    /// Returns a machine-readable code for the error variant.
    pub fn code(&self) -> &'static str {
        match self {
            IntervalError::Disjoint { .. } => "IntervalDisjoint",
            IntervalError::Inverted { .. } => "IntervalInverted",
        }
    }
}

/// A time window `[begin, end)`; `None` means unbounded on that side.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct TimeInterval {
    /// Inclusive lower bound, `None` for the beginning of time.
    pub begin: Option<Timestamp>,
    /// Exclusive upper bound, `None` for open-ended.
    pub end: Option<Timestamp>,
}

impl TimeInterval {
    /// Builds an interval from optional bounds.
    pub const fn new(begin: Option<Timestamp>, end: Option<Timestamp>) -> Self {
        Self { begin, end }
    }

    /// The interval covering all of time.
    pub const fn unbounded() -> Self {
        Self::new(None, None)
    }

    /// `[begin, end)`.
    pub const fn between(begin: Timestamp, end: Timestamp) -> Self {
        Self::new(Some(begin), Some(end))
    }

    /// `[begin, +inf)`.
    pub const fn since(begin: Timestamp) -> Self {
        Self::new(Some(begin), None)
    }

    /// The instant `[at, at]`, used for point-in-time queries.
    pub const fn instant(at: Timestamp) -> Self {
        Self::new(Some(at), Some(at))
    }

    /// Returns the interval unchanged unless its begin lies after its end.
    pub fn validate(self) -> Result<Self, IntervalError> {
        match (self.begin, self.end) {
            (Some(begin), Some(end)) if begin > end => Err(IntervalError::Inverted { begin, end }),
            _ => Ok(self),
        }
    }

    /// True when both bounds are set and equal.
    pub fn is_instant(&self) -> bool {
        matches!((self.begin, self.end), (Some(b), Some(e)) if b == e)
    }

    /// True when `at` lies in `[begin, end)`.
    pub fn contains(&self, at: Timestamp) -> bool {
        self.begin.map_or(true, |b| b <= at) && self.end.map_or(true, |e| at < e)
    }

    /// Half-open overlap test. Symmetric; touching boundaries do not overlap.
    pub fn overlaps(&self, other: &TimeInterval) -> bool {
        lower_before_upper(self.begin, other.end) && lower_before_upper(other.begin, self.end)
    }

    /// True when `self` spans all of `inner`.
    pub fn covers(&self, inner: &TimeInterval) -> bool {
        let begin_ok = match (self.begin, inner.begin) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(outer), Some(inner)) => outer <= inner,
        };
        let end_ok = match (self.end, inner.end) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(outer), Some(inner)) => outer >= inner,
        };
        begin_ok && end_ok
    }

    /// Intersects two overlapping intervals.
    ///
    /// Fails with [`IntervalError::Disjoint`] instead of producing an empty
    /// interval when the operands do not overlap.
    pub fn narrow(&self, other: &TimeInterval) -> Result<TimeInterval, IntervalError> {
        if !self.overlaps(other) {
            return Err(IntervalError::Disjoint {
                left: *self,
                right: *other,
            });
        }
        narrow(&[self.begin, other.begin], &[self.end, other.end])
    }
}

impl fmt::Display for TimeInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.begin {
            Some(begin) => write!(f, "[{begin}, ")?,
            None => f.write_str("[-inf, ")?,
        }
        match self.end {
            Some(end) => write!(f, "{end})"),
            None => f.write_str("+inf)"),
        }
    }
}

/// Computes the tightest bounds from candidate lists.
///
/// The begin is the latest defined candidate and the end the earliest defined
/// candidate; `None` candidates act as the respective infinity and never win
/// against a defined value.
pub fn narrow(
    begins: &[Option<Timestamp>],
    ends: &[Option<Timestamp>],
) -> Result<TimeInterval, IntervalError> {
    let begin = begins.iter().flatten().max().copied();
    let end = ends.iter().flatten().min().copied();
    if let (Some(begin), Some(end)) = (begin, end) {
        if begin > end {
            return Err(IntervalError::Inverted { begin, end });
        }
    }
    Ok(TimeInterval::new(begin, end))
}

/// An interval together with the slot path it was discovered by.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Timeframe {
    /// When the connection held.
    #[serde(flatten)]
    pub interval: TimeInterval,
    /// How the node was reached.
    pub path: SlotPath,
}

impl Timeframe {
    /// Pairs an interval with its discovery path.
    pub fn new(interval: TimeInterval, path: SlotPath) -> Self {
        Self { interval, path }
    }
}

/// Merges overlapping and touching timeframes.
///
/// Timeframes are sorted by begin and swept left to right; any timeframe that
/// starts at or before the running end is absorbed into the accumulated one.
/// The accumulated timeframe keeps the path of the earliest-starting member;
/// paths of absorbed timeframes are dropped. Ties on `begin` keep discovery
/// order, so the first discovered path wins.
pub fn merge(mut timeframes: Vec<Timeframe>) -> Vec<Timeframe> {
    if timeframes.len() <= 1 {
        return timeframes;
    }
    timeframes.sort_by(|a, b| a.interval.begin.cmp(&b.interval.begin));

    let mut merged: Vec<Timeframe> = Vec::with_capacity(timeframes.len());
    for next in timeframes {
        match merged.last_mut() {
            Some(last) if starts_by(next.interval.begin, last.interval.end) => {
                last.interval.end = later_end(last.interval.end, next.interval.end);
            }
            _ => merged.push(next),
        }
    }
    merged
}

fn lower_before_upper(lower: Option<Timestamp>, upper: Option<Timestamp>) -> bool {
    match (lower, upper) {
        (Some(lower), Some(upper)) => lower < upper,
        _ => true,
    }
}

fn starts_by(begin: Option<Timestamp>, end: Option<Timestamp>) -> bool {
    match (begin, end) {
        (Some(begin), Some(end)) => begin <= end,
        _ => true,
    }
}

fn later_end(a: Option<Timestamp>, b: Option<Timestamp>) -> Option<Timestamp> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.max(b)),
        _ => None,
    }
}
