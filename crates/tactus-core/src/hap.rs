use crate::TimeSpan;
use serde::{Deserialize, Serialize};

/// A single event produced by querying a pattern.
///
/// `part` is the fragment of the event that overlaps the queried span.
/// `whole` is the event's full extent, or `None` for continuous values
/// with no natural onset. `part` is always contained in `whole` when a
/// whole is present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hap<T> {
    pub whole: Option<TimeSpan>,
    pub part: TimeSpan,
    pub value: T,
}

impl<T> Hap<T> {
    pub fn new(whole: Option<TimeSpan>, part: TimeSpan, value: T) -> Self {
        Hap { whole, part, value }
    }

    /// The whole if present, otherwise the part.
    pub fn whole_or_part(&self) -> TimeSpan {
        self.whole.unwrap_or(self.part)
    }

    /// Whether this fragment carries the event's onset, i.e. the part
    /// begins exactly where the whole begins.
    pub fn has_onset(&self) -> bool {
        match self.whole {
            Some(whole) => whole.begin == self.part.begin,
            None => false,
        }
    }

    /// Apply the same time transform to both whole and part.
    pub fn with_span(self, f: impl Fn(TimeSpan) -> TimeSpan) -> Self {
        Hap {
            whole: self.whole.map(&f),
            part: f(self.part),
            value: self.value,
        }
    }

    pub fn with_value<U>(self, f: impl FnOnce(T) -> U) -> Hap<U> {
        Hap {
            whole: self.whole,
            part: self.part,
            value: f(self.value),
        }
    }
}
