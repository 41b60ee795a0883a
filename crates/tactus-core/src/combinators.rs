//! Constructors for pattern trees.

use crate::pattern::{Node, Pattern};
use crate::Fraction;

/// The value, once per cycle.
pub fn pure<T>(value: T) -> Pattern<T> {
    Pattern::from_node(Node::Pure(value))
}

/// A pattern with no events.
pub fn silence<T>() -> Pattern<T> {
    Pattern::from_node(Node::Silence)
}

/// Concatenate within a cycle, each child's slot proportional to its
/// weight. Weights must be positive; zero-weight material is expressed
/// as silence children instead.
pub fn timecat<T>(mut children: Vec<(Fraction, Pattern<T>)>) -> Pattern<T> {
    match children.len() {
        0 => silence(),
        1 => children.remove(0).1,
        _ => Pattern::from_node(Node::Timecat(children)),
    }
}

/// Concatenate within a cycle with equal slots.
pub fn fastcat<T>(children: Vec<Pattern<T>>) -> Pattern<T> {
    timecat(
        children
            .into_iter()
            .map(|child| (Fraction::one(), child))
            .collect(),
    )
}

/// Children take turns, one full cycle each.
pub fn slowcat<T>(mut children: Vec<Pattern<T>>) -> Pattern<T> {
    match children.len() {
        0 => silence(),
        1 => children.remove(0),
        _ => Pattern::from_node(Node::Slowcat(children)),
    }
}

/// Play all children simultaneously.
pub fn stack<T>(mut children: Vec<Pattern<T>>) -> Pattern<T> {
    match children.len() {
        0 => silence(),
        1 => children.remove(0),
        _ => Pattern::from_node(Node::Stack(children)),
    }
}

/// Pick one option uniformly at random each cycle, deterministically
/// from `seed`.
pub fn choice<T>(seed: u64, mut options: Vec<Pattern<T>>) -> Pattern<T> {
    match options.len() {
        0 => silence(),
        1 => options.remove(0),
        _ => Pattern::from_node(Node::Choice { seed, options }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TimeSpan;

    #[test]
    fn fastcat_divides_the_cycle_evenly() {
        let p = fastcat(vec![pure("a"), pure("b"), pure("c")]);
        let haps = p.query_arc(0, 1).unwrap();
        assert_eq!(haps.len(), 3);
        for (i, hap) in haps.iter().enumerate() {
            let begin = Fraction::new(i as i64, 3);
            let end = Fraction::new(i as i64 + 1, 3);
            assert_eq!(hap.part, TimeSpan::new(begin, end));
            assert_eq!(hap.whole, Some(hap.part));
            assert!(hap.has_onset());
        }
        assert_eq!(haps[0].value, "a");
        assert_eq!(haps[1].value, "b");
        assert_eq!(haps[2].value, "c");
    }

    #[test]
    fn timecat_honors_weights() {
        let p = timecat(vec![
            (Fraction::from_int(2), pure("a")),
            (Fraction::from_int(3), pure("b")),
        ]);
        let haps = p.query_arc(0, 1).unwrap();
        assert_eq!(haps.len(), 2);
        assert_eq!(
            haps[0].part,
            TimeSpan::new(Fraction::zero(), Fraction::new(2, 5))
        );
        assert_eq!(
            haps[1].part,
            TimeSpan::new(Fraction::new(2, 5), Fraction::one())
        );
    }

    #[test]
    fn slowcat_alternates_cycles() {
        let p = slowcat(vec![pure("a"), pure("b")]);
        let haps = p.query_arc(0, 4).unwrap();
        let values: Vec<_> = haps.iter().map(|h| h.value).collect();
        assert_eq!(values, vec!["a", "b", "a", "b"]);
        for (i, hap) in haps.iter().enumerate() {
            assert_eq!(hap.part, TimeSpan::from_ints(i as i64, i as i64 + 1));
        }
    }

    #[test]
    fn slowcat_is_well_defined_at_negative_cycles() {
        let p = slowcat(vec![pure("a"), pure("b"), pure("c")]);
        let haps = p.query_arc(-3, 0).unwrap();
        let values: Vec<_> = haps.iter().map(|h| h.value).collect();
        assert_eq!(values, vec!["a", "b", "c"]);
    }

    #[test]
    fn nested_slowcat_interleaves() {
        // <a <b c>> plays a, b, a, c.
        let inner = slowcat(vec![pure("b"), pure("c")]);
        let p = slowcat(vec![pure("a"), inner]);
        let values: Vec<_> = p
            .query_arc(0, 4)
            .unwrap()
            .iter()
            .map(|h| h.value)
            .collect();
        assert_eq!(values, vec!["a", "b", "a", "c"]);
    }

    #[test]
    fn empty_constructors_collapse_to_silence() {
        assert!(fastcat::<&str>(vec![]).query_arc(0, 1).unwrap().is_empty());
        assert!(slowcat::<&str>(vec![]).query_arc(0, 1).unwrap().is_empty());
        assert!(stack::<&str>(vec![]).query_arc(0, 1).unwrap().is_empty());
        assert!(choice::<&str>(0, vec![]).query_arc(0, 1).unwrap().is_empty());
    }

    #[test]
    fn singleton_constructors_pass_through() {
        let p = fastcat(vec![pure("a")]);
        let haps = p.query_arc(0, 1).unwrap();
        assert_eq!(haps.len(), 1);
        assert_eq!(haps[0].part, TimeSpan::from_ints(0, 1));
    }

    #[test]
    fn choice_is_deterministic_per_cycle() {
        let p = choice(99, vec![pure("a"), pure("b"), pure("c")]);
        let first = p.query_arc(0, 32).unwrap();
        let second = p.query_arc(0, 32).unwrap();
        assert_eq!(first, second);
        // One event per cycle, whichever option wins.
        assert_eq!(first.len(), 32);
    }

    #[test]
    fn choice_eventually_picks_every_option() {
        let p = choice(5, vec![pure("a"), pure("b")]);
        let values: std::collections::HashSet<_> = p
            .query_arc(0, 64)
            .unwrap()
            .iter()
            .map(|h| h.value)
            .collect();
        assert_eq!(values.len(), 2);
    }

    #[test]
    fn choice_seeds_are_independent() {
        let options = || vec![pure("a"), pure("b")];
        let p = choice(1, options());
        let q = choice(2, options());
        let pv: Vec<_> = p.query_arc(0, 64).unwrap().iter().map(|h| h.value).collect();
        let qv: Vec<_> = q.query_arc(0, 64).unwrap().iter().map(|h| h.value).collect();
        assert_ne!(pv, qv);
    }

    #[test]
    fn nested_structure_subdivides() {
        // "c [d e]" puts d and e in the second half.
        let p = fastcat(vec![pure("c"), fastcat(vec![pure("d"), pure("e")])]);
        let haps = p.query_arc(0, 1).unwrap();
        assert_eq!(haps.len(), 3);
        assert_eq!(
            haps[1].part,
            TimeSpan::new(Fraction::new(1, 2), Fraction::new(3, 4))
        );
        assert_eq!(
            haps[2].part,
            TimeSpan::new(Fraction::new(3, 4), Fraction::one())
        );
    }
}
