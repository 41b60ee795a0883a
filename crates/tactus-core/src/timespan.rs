use crate::Fraction;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A half-open interval `[begin, end)` over rational cycle time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeSpan {
    pub begin: Fraction,
    pub end: Fraction,
}

impl TimeSpan {
    /// Create a new timespan. Invariant: `begin <= end`.
    pub fn new(begin: Fraction, end: Fraction) -> Self {
        debug_assert!(begin <= end, "timespan begin must not exceed end");
        TimeSpan { begin, end }
    }

    pub fn from_ints(begin: i64, end: i64) -> Self {
        TimeSpan::new(Fraction::from_int(begin), Fraction::from_int(end))
    }

    pub fn duration(&self) -> Fraction {
        self.end - self.begin
    }

    /// Zero-width spans denote instant queries.
    pub fn is_instant(&self) -> bool {
        self.begin == self.end
    }

    /// Half-open containment of a point in time.
    pub fn contains(&self, time: Fraction) -> bool {
        time >= self.begin && time < self.end
    }

    /// Overlap of two spans: max of begins, min of ends. A zero-width
    /// result is representable; an inverted one is `None`.
    pub fn intersection(&self, other: &TimeSpan) -> Option<TimeSpan> {
        let begin = self.begin.max(other.begin);
        let end = self.end.min(other.end);
        if begin > end {
            return None;
        }
        Some(TimeSpan::new(begin, end))
    }

    /// Split into the maximal list of sub-spans each confined to a single
    /// integer cycle `[n, n+1)`, in order. An instant span is preserved as
    /// a single instant sub-span.
    pub fn span_cycles(&self) -> Vec<TimeSpan> {
        if self.is_instant() {
            return vec![*self];
        }
        let mut spans = Vec::new();
        let mut begin = self.begin;
        while begin < self.end {
            let next = begin.floor() + Fraction::one();
            let end = next.min(self.end);
            spans.push(TimeSpan::new(begin, end));
            begin = end;
        }
        spans
    }
}

impl fmt::Display for TimeSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.begin, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration() {
        let ts = TimeSpan::from_ints(0, 2);
        assert_eq!(ts.duration(), Fraction::from_int(2));
    }

    #[test]
    fn contains_is_half_open() {
        let ts = TimeSpan::from_ints(0, 1);
        assert!(ts.contains(Fraction::zero()));
        assert!(ts.contains(Fraction::new(1, 2)));
        assert!(!ts.contains(Fraction::one()));
    }

    #[test]
    fn intersection() {
        let a = TimeSpan::from_ints(0, 2);
        let b = TimeSpan::from_ints(1, 3);
        assert_eq!(a.intersection(&b), Some(TimeSpan::from_ints(1, 2)));

        let c = TimeSpan::from_ints(3, 4);
        assert_eq!(a.intersection(&c), None);
    }

    #[test]
    fn intersection_can_be_zero_width() {
        let a = TimeSpan::from_ints(0, 1);
        let b = TimeSpan::from_ints(1, 2);
        let touch = a.intersection(&b).unwrap();
        assert!(touch.is_instant());
        assert_eq!(touch.begin, Fraction::one());
    }

    #[test]
    fn span_cycles_single_cycle() {
        let ts = TimeSpan::new(Fraction::new(1, 4), Fraction::new(3, 4));
        assert_eq!(ts.span_cycles(), vec![ts]);
    }

    #[test]
    fn span_cycles_splits_at_integer_boundaries() {
        let ts = TimeSpan::new(Fraction::new(1, 2), Fraction::new(5, 2));
        assert_eq!(
            ts.span_cycles(),
            vec![
                TimeSpan::new(Fraction::new(1, 2), Fraction::one()),
                TimeSpan::from_ints(1, 2),
                TimeSpan::new(Fraction::from_int(2), Fraction::new(5, 2)),
            ]
        );
    }

    #[test]
    fn span_cycles_negative_time() {
        let ts = TimeSpan::new(Fraction::new(-1, 2), Fraction::new(1, 2));
        assert_eq!(
            ts.span_cycles(),
            vec![
                TimeSpan::new(Fraction::new(-1, 2), Fraction::zero()),
                TimeSpan::new(Fraction::zero(), Fraction::new(1, 2)),
            ]
        );
    }

    #[test]
    fn span_cycles_preserves_instants() {
        let ts = TimeSpan::new(Fraction::new(1, 2), Fraction::new(1, 2));
        assert_eq!(ts.span_cycles(), vec![ts]);
    }
}
