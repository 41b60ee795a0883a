//! Cyclic pattern query engine.
//!
//! Patterns are pure functions of time: querying a [`TimeSpan`] yields the
//! [`Hap`] events active during it, built from exact rational arithmetic so
//! arbitrarily nested subdivisions never drift. See [`combinators`] for the
//! constructors and [`Pattern`] for the transforms.

pub mod combinators;
pub mod error;
pub mod euclid;
pub mod fraction;
pub mod hap;
pub mod pattern;
pub mod rng;
pub mod timespan;

pub use combinators::{choice, fastcat, pure, silence, slowcat, stack, timecat};
pub use error::{ArithmeticError, InvalidSpanError};
pub use fraction::Fraction;
pub use hap::Hap;
pub use pattern::{Node, Pattern};
pub use timespan::TimeSpan;
