//! The pattern tree and its query engine.
//!
//! A pattern is an immutable tree of combinator nodes behind an [`Arc`].
//! Querying walks the tree for a given timespan and produces [`Hap`]s;
//! the same query always produces the same events, in construction order
//! (cycle by cycle, slot by slot, stack lane by stack lane), never
//! re-sorted by time.

use crate::error::{ArithmeticError, InvalidSpanError};
use crate::euclid::bjorklund;
use crate::rng;
use crate::{Fraction, Hap, TimeSpan};
use std::sync::Arc;

/// One node of a pattern tree.
#[derive(Debug)]
pub enum Node<T> {
    /// Silence: no events anywhere.
    Silence,
    /// The value, once per cycle, filling the whole cycle.
    Pure(T),
    /// Children played in sequence within each cycle, each occupying a
    /// slot proportional to its weight.
    Timecat(Vec<(Fraction, Pattern<T>)>),
    /// Children take turns, one whole cycle each, round robin.
    Slowcat(Vec<Pattern<T>>),
    /// Children play simultaneously.
    Stack(Vec<Pattern<T>>),
    /// Child compressed in time by `factor` (> 0).
    Fast { factor: Fraction, child: Pattern<T> },
    /// Child stretched in time by `factor` (> 0).
    Slow { factor: Fraction, child: Pattern<T> },
    /// Child gated by a euclidean onset mask over each cycle.
    Euclid {
        pulses: u32,
        steps: u32,
        rotation: u32,
        child: Pattern<T>,
    },
    /// Child events dropped with probability `amount`, decided per event
    /// onset from `seed`.
    Degrade {
        amount: f64,
        seed: u64,
        child: Pattern<T>,
    },
    /// One option picked uniformly per cycle from `seed`.
    Choice { seed: u64, options: Vec<Pattern<T>> },
}

/// A queryable pattern of values over cycle time.
///
/// Cloning is cheap: patterns share their tree.
#[derive(Debug)]
pub struct Pattern<T> {
    node: Arc<Node<T>>,
}

impl<T> Clone for Pattern<T> {
    fn clone(&self) -> Self {
        Pattern {
            node: Arc::clone(&self.node),
        }
    }
}

impl<T> Pattern<T> {
    pub(crate) fn from_node(node: Node<T>) -> Self {
        Pattern {
            node: Arc::new(node),
        }
    }

    pub fn node(&self) -> &Node<T> {
        &self.node
    }

    /// Speed the pattern up by `factor`. Invariant: `factor > 0`,
    /// enforced where patterns are built from user input.
    pub fn fast(&self, factor: Fraction) -> Self {
        debug_assert!(factor.is_positive());
        Pattern::from_node(Node::Fast {
            factor,
            child: self.clone(),
        })
    }

    /// Slow the pattern down by `factor`. Invariant: `factor > 0`.
    pub fn slow(&self, factor: Fraction) -> Self {
        debug_assert!(factor.is_positive());
        Pattern::from_node(Node::Slow {
            factor,
            child: self.clone(),
        })
    }

    /// Gate the pattern through a euclidean rhythm: within each cycle the
    /// pattern sounds only in the onset slots of `bjorklund(pulses, steps)`,
    /// rotated left by `rotation`.
    pub fn euclid(&self, pulses: u32, steps: u32, rotation: u32) -> Result<Self, ArithmeticError> {
        if steps == 0 {
            return Err(ArithmeticError::ZeroSteps);
        }
        Ok(Pattern::from_node(Node::Euclid {
            pulses,
            steps,
            rotation,
            child: self.clone(),
        }))
    }

    /// Randomly drop events with probability `amount` in `[0, 1]`, decided
    /// deterministically from `seed` and each event's onset.
    pub fn degrade_by(&self, amount: f64, seed: u64) -> Self {
        Pattern::from_node(Node::Degrade {
            amount,
            seed,
            child: self.clone(),
        })
    }

    /// `degrade_by` with the conventional 50% amount.
    pub fn degrade(&self, seed: u64) -> Self {
        self.degrade_by(0.5, seed)
    }
}

impl<T: Clone> Pattern<T> {
    /// Query the arc `[begin, end)`. Fails if `begin > end`; an equal
    /// begin and end performs an instant query at that point.
    pub fn query_arc(
        &self,
        begin: impl Into<Fraction>,
        end: impl Into<Fraction>,
    ) -> Result<Vec<Hap<T>>, InvalidSpanError> {
        let begin = begin.into();
        let end = end.into();
        if begin > end {
            return Err(InvalidSpanError { begin, end });
        }
        Ok(self.query(TimeSpan::new(begin, end)))
    }

    /// Query a timespan, returning every event fragment overlapping it.
    pub fn query(&self, span: TimeSpan) -> Vec<Hap<T>> {
        match self.node() {
            Node::Silence => Vec::new(),
            Node::Pure(value) => span
                .span_cycles()
                .into_iter()
                .map(|part| {
                    let begin = part.begin.floor();
                    let whole = TimeSpan::new(begin, begin + Fraction::one());
                    Hap::new(Some(whole), part, value.clone())
                })
                .collect(),
            Node::Timecat(children) => self.query_per_cycle(span, |sub, haps| {
                query_timecat(children, sub, haps)
            }),
            Node::Slowcat(children) => self.query_per_cycle(span, |sub, haps| {
                query_slowcat(children, sub, haps)
            }),
            Node::Stack(children) => {
                let mut haps = Vec::new();
                for child in children {
                    haps.extend(child.query(span));
                }
                haps
            }
            Node::Fast { factor, child } => {
                let inner = TimeSpan::new(span.begin * *factor, span.end * *factor);
                child
                    .query(inner)
                    .into_iter()
                    .map(|hap| {
                        hap.with_span(|s| TimeSpan::new(s.begin / *factor, s.end / *factor))
                    })
                    .collect()
            }
            Node::Slow { factor, child } => {
                let inner = TimeSpan::new(span.begin / *factor, span.end / *factor);
                child
                    .query(inner)
                    .into_iter()
                    .map(|hap| {
                        hap.with_span(|s| TimeSpan::new(s.begin * *factor, s.end * *factor))
                    })
                    .collect()
            }
            Node::Euclid {
                pulses,
                steps,
                rotation,
                child,
            } => {
                // steps > 0 is checked at construction.
                let mask = match bjorklund(*pulses, *steps, *rotation) {
                    Ok(mask) => mask,
                    Err(_) => return Vec::new(),
                };
                self.query_per_cycle(span, |sub, haps| {
                    query_euclid(child, &mask, sub, haps)
                })
            }
            Node::Degrade {
                amount,
                seed,
                child,
            } => child
                .query(span)
                .into_iter()
                .filter(|hap| {
                    let key = rng::time_key(hap.whole_or_part().begin);
                    rng::unit_value(*seed, key) >= *amount
                })
                .collect(),
            Node::Choice { seed, options } => self.query_per_cycle(span, |sub, haps| {
                let cycle = sub.begin.floor_int();
                let draw = rng::unit_value(*seed, rng::cycle_key(cycle));
                let index = ((draw * options.len() as f64) as usize).min(options.len() - 1);
                haps.extend(options[index].query(sub));
            }),
        }
    }

    /// Split the query at cycle boundaries and delegate each single-cycle
    /// sub-span, in order.
    fn query_per_cycle(
        &self,
        span: TimeSpan,
        mut per_cycle: impl FnMut(TimeSpan, &mut Vec<Hap<T>>),
    ) -> Vec<Hap<T>> {
        let mut haps = Vec::new();
        for sub in span.span_cycles() {
            per_cycle(sub, &mut haps);
        }
        haps
    }
}

/// Query `source` as if it filled `slot` with one cycle of material,
/// restricted to the overlap of `slot` and `sub`. `slot` and `sub` lie
/// within the same integer cycle.
fn query_slot<T: Clone>(
    source: &Pattern<T>,
    slot: TimeSpan,
    sub: TimeSpan,
    haps: &mut Vec<Hap<T>>,
) {
    let part = match slot.intersection(&sub) {
        Some(part) => part,
        None => return,
    };
    if part.is_instant() {
        // An instant overlap only counts for an instant query landing
        // inside the slot, half-open.
        if !(sub.is_instant() && slot.contains(sub.begin)) {
            return;
        }
    }
    let width = slot.duration();
    if width.is_zero() {
        return;
    }
    let cycle = slot.begin.floor();
    let to_inner = |t: Fraction| cycle + (t - slot.begin) / width;
    let to_outer = |t: Fraction| slot.begin + (t - cycle) * width;
    let inner = TimeSpan::new(to_inner(part.begin), to_inner(part.end));
    for hap in source.query(inner) {
        haps.push(hap.with_span(|s| TimeSpan::new(to_outer(s.begin), to_outer(s.end))));
    }
}

fn query_timecat<T: Clone>(
    children: &[(Fraction, Pattern<T>)],
    sub: TimeSpan,
    haps: &mut Vec<Hap<T>>,
) {
    let total: Fraction = children
        .iter()
        .fold(Fraction::zero(), |acc, (w, _)| acc + *w);
    if !total.is_positive() {
        return;
    }
    let cycle = sub.begin.floor();
    let mut offset = Fraction::zero();
    for (weight, child) in children {
        let begin = cycle + offset / total;
        offset = offset + *weight;
        let end = cycle + offset / total;
        query_slot(child, TimeSpan::new(begin, end), sub, haps);
    }
}

fn query_slowcat<T: Clone>(children: &[Pattern<T>], sub: TimeSpan, haps: &mut Vec<Hap<T>>) {
    let len = children.len() as i64;
    let cycle = sub.begin.floor_int();
    let index = cycle.rem_euclid(len) as usize;
    // Shift so the chosen child sees consecutive cycles of its own time.
    let delta = Fraction::from_int(cycle - cycle.div_euclid(len));
    let inner = TimeSpan::new(sub.begin - delta, sub.end - delta);
    for hap in children[index].query(inner) {
        haps.push(hap.with_span(|s| TimeSpan::new(s.begin + delta, s.end + delta)));
    }
}

fn query_euclid<T: Clone>(
    child: &Pattern<T>,
    mask: &[bool],
    sub: TimeSpan,
    haps: &mut Vec<Hap<T>>,
) {
    let steps = mask.len() as i64;
    let cycle = sub.begin.floor();
    for (i, &on) in mask.iter().enumerate() {
        if !on {
            continue;
        }
        let begin = cycle + Fraction::new(i as i64, steps);
        let end = cycle + Fraction::new(i as i64 + 1, steps);
        query_slot(child, TimeSpan::new(begin, end), sub, haps);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combinators::{fastcat, pure, silence, stack};

    fn parts<'a>(haps: &'a [Hap<&'a str>]) -> Vec<(TimeSpan, &'a str)> {
        haps.iter().map(|h| (h.part, h.value)).collect()
    }

    #[test]
    fn pure_repeats_every_cycle() {
        let p = pure("a");
        let haps = p.query_arc(0, 2).unwrap();
        assert_eq!(
            parts(&haps),
            vec![
                (TimeSpan::from_ints(0, 1), "a"),
                (TimeSpan::from_ints(1, 2), "a"),
            ]
        );
        assert!(haps.iter().all(|h| h.has_onset()));
    }

    #[test]
    fn pure_fragments_keep_their_whole() {
        let p = pure("a");
        let haps = p.query(TimeSpan::new(Fraction::new(1, 4), Fraction::new(3, 4)));
        assert_eq!(haps.len(), 1);
        assert_eq!(haps[0].whole, Some(TimeSpan::from_ints(0, 1)));
        assert_eq!(
            haps[0].part,
            TimeSpan::new(Fraction::new(1, 4), Fraction::new(3, 4))
        );
        assert!(!haps[0].has_onset());
    }

    #[test]
    fn silence_is_empty() {
        let p: Pattern<&str> = silence();
        assert!(p.query_arc(0, 4).unwrap().is_empty());
    }

    #[test]
    fn query_arc_rejects_inverted_spans() {
        let p = pure("a");
        let err = p.query_arc(1, 0).unwrap_err();
        assert_eq!(err.begin, Fraction::one());
        assert_eq!(err.end, Fraction::zero());
    }

    #[test]
    fn instant_query_picks_the_sounding_event() {
        let p = fastcat(vec![pure("a"), pure("b")]);
        let at = |n: i64, d: i64| {
            let t = Fraction::new(n, d);
            p.query(TimeSpan::new(t, t))
        };
        let haps = at(1, 2);
        assert_eq!(haps.len(), 1);
        assert_eq!(haps[0].value, "b");
        assert!(haps[0].part.is_instant());

        let haps = at(1, 4);
        assert_eq!(haps.len(), 1);
        assert_eq!(haps[0].value, "a");
    }

    #[test]
    fn fast_squeezes_and_repeats() {
        let p = pure("a").fast(Fraction::from_int(2));
        let haps = p.query_arc(0, 1).unwrap();
        assert_eq!(
            parts(&haps),
            vec![
                (TimeSpan::new(Fraction::zero(), Fraction::new(1, 2)), "a"),
                (TimeSpan::new(Fraction::new(1, 2), Fraction::one()), "a"),
            ]
        );
    }

    #[test]
    fn slow_stretches() {
        let p = pure("a").slow(Fraction::from_int(2));
        let haps = p.query_arc(0, 2).unwrap();
        assert_eq!(haps.len(), 1);
        assert_eq!(haps[0].whole, Some(TimeSpan::from_ints(0, 2)));
        assert_eq!(haps[0].part, TimeSpan::from_ints(0, 2));
    }

    #[test]
    fn slow_fragment_reveals_partial_event() {
        let p = pure("a").slow(Fraction::from_int(2));
        let haps = p.query_arc(1, 2).unwrap();
        assert_eq!(haps.len(), 1);
        assert_eq!(haps[0].whole, Some(TimeSpan::from_ints(0, 2)));
        assert_eq!(haps[0].part, TimeSpan::from_ints(1, 2));
        assert!(!haps[0].has_onset());
    }

    #[test]
    fn stack_preserves_lane_order() {
        let a = fastcat(vec![pure("a1"), pure("a2")]);
        let b = pure("b");
        let haps = stack(vec![a, b]).query_arc(0, 1).unwrap();
        assert_eq!(
            parts(&haps),
            vec![
                (TimeSpan::new(Fraction::zero(), Fraction::new(1, 2)), "a1"),
                (TimeSpan::new(Fraction::new(1, 2), Fraction::one()), "a2"),
                (TimeSpan::from_ints(0, 1), "b"),
            ]
        );
    }

    #[test]
    fn euclid_places_onsets() {
        let p = pure("a").euclid(3, 8, 0).unwrap();
        let haps = p.query_arc(0, 1).unwrap();
        assert_eq!(
            parts(&haps),
            vec![
                (TimeSpan::new(Fraction::zero(), Fraction::new(1, 8)), "a"),
                (TimeSpan::new(Fraction::new(3, 8), Fraction::new(1, 2)), "a"),
                (TimeSpan::new(Fraction::new(3, 4), Fraction::new(7, 8)), "a"),
            ]
        );
    }

    #[test]
    fn euclid_zero_steps_fails_at_construction() {
        assert_eq!(
            pure("a").euclid(3, 0, 0).unwrap_err(),
            ArithmeticError::ZeroSteps
        );
    }

    #[test]
    fn degrade_zero_keeps_everything() {
        let p = pure("a").degrade_by(0.0, 42);
        assert_eq!(p.query_arc(0, 10).unwrap().len(), 10);
    }

    #[test]
    fn degrade_one_drops_everything() {
        let p = pure("a").degrade_by(1.0, 42);
        assert!(p.query_arc(0, 10).unwrap().is_empty());
    }

    #[test]
    fn degrade_is_stable_across_queries() {
        let p = pure("a").degrade(7);
        let whole = p.query_arc(0, 8).unwrap();
        let mut pieces = Vec::new();
        for n in 0..8 {
            pieces.extend(p.query_arc(n, n + 1).unwrap());
        }
        assert_eq!(whole, pieces);
    }

    #[test]
    fn split_query_equals_whole_query() {
        let p = stack(vec![
            fastcat(vec![pure("a"), pure("b"), pure("c")]),
            pure("d").fast(Fraction::from_int(3)),
        ]);
        let whole = p.query_arc(0, 2).unwrap();
        let mut halves = p.query(TimeSpan::new(Fraction::zero(), Fraction::new(2, 3)));
        halves.extend(p.query(TimeSpan::new(Fraction::new(2, 3), Fraction::from_int(2))));
        // Fragments at the split may differ in shape and interleaving;
        // compare the set of onsets.
        fn onsets<'a>(haps: &'a [Hap<&'a str>]) -> Vec<(Fraction, &'a str)> {
            let mut onsets = haps
                .iter()
                .filter(|h| h.has_onset())
                .map(|h| (h.whole_or_part().begin, h.value))
                .collect::<Vec<_>>();
            onsets.sort();
            onsets
        }
        assert_eq!(onsets(&whole), onsets(&halves));
    }
}
