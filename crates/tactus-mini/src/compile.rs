//! Lowering the syntax tree into a queryable pattern.

use crate::ast::{Ast, AtomNode, AtomValue, ElementNode, SuffixOp};
use crate::error::{Error, ParseError};
use crate::parser;
use crate::span::Span;
use crate::value::Value;
use tactus_core::{choice, pure, silence, slowcat, stack, timecat, ArithmeticError, Fraction, Pattern};

/// Parse and compile source text in one step.
pub fn pattern(source: &str) -> Result<Pattern<Value>, Error> {
    let ast = parser::parse(source)?;
    compile(&ast)
}

/// Compile a parsed syntax tree. Argument validation that needs the
/// numeric value (euclid integers, factor signs, probabilities) happens
/// here rather than in the parser.
pub fn compile(ast: &Ast) -> Result<Pattern<Value>, Error> {
    match ast {
        Ast::Atom(atom) => Ok(compile_atom(atom)),
        Ast::Sequence(node) => {
            let mut slots = Vec::new();
            for element in &node.elements {
                let pat = compile_element(element)?;
                let weight = slot_weight(element)?;
                for _ in 0..element.reps {
                    slots.push((weight, pat.clone()));
                }
            }
            Ok(timecat(slots))
        }
        Ast::Stack(node) => {
            let children = node
                .children
                .iter()
                .map(compile)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(stack(children))
        }
        Ast::Alternation(node) => {
            let mut turns = Vec::new();
            for element in &node.elements {
                let pat = compile_element(element)?;
                // In an alternation, weight means extra turns, so it
                // must be whole.
                let weight = turn_weight(element)?;
                for _ in 0..(u64::from(element.reps) * weight) {
                    turns.push(pat.clone());
                }
            }
            Ok(slowcat(turns))
        }
        Ast::Choice(node) => {
            let options = node
                .options
                .iter()
                .map(compile)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(choice(node.seed, options))
        }
    }
}

fn compile_atom(atom: &AtomNode) -> Pattern<Value> {
    match &atom.value {
        AtomValue::Number(n) => pure(Value::Number(*n)),
        AtomValue::String(s) => pure(Value::String(s.clone())),
        AtomValue::Rest => silence(),
    }
}

fn compile_element(element: &ElementNode) -> Result<Pattern<Value>, Error> {
    let mut pat = compile(&element.source)?;
    for op in &element.ops {
        pat = apply_op(pat, op, element.span)?;
    }
    Ok(pat)
}

fn apply_op(
    pat: Pattern<Value>,
    op: &SuffixOp,
    span: Span,
) -> Result<Pattern<Value>, Error> {
    match op {
        SuffixOp::Fast { amount } => Ok(pat.fast(positive_factor(*amount, span)?)),
        SuffixOp::Slow { amount } => Ok(pat.slow(positive_factor(*amount, span)?)),
        SuffixOp::Euclid {
            pulses,
            steps,
            rotation,
        } => {
            let pulses = counting_number(*pulses, "pulse count", span)?;
            let steps = counting_number(*steps, "step count", span)?;
            let rotation = match rotation {
                Some(r) => counting_number(*r, "rotation", span)?,
                None => 0,
            };
            // steps == 0 is an arithmetic error, not an invalid argument
            if steps == 0 {
                return Err(ArithmeticError::ZeroSteps.into());
            }
            if pulses > steps {
                return Err(ParseError::invalid_argument(
                    format!("pulse count {} exceeds step count {}", pulses, steps),
                    span,
                )
                .into());
            }
            Ok(pat.euclid(pulses, steps, rotation)?)
        }
        SuffixOp::Degrade { amount, seed } => {
            if !(0.0..=1.0).contains(amount) {
                return Err(ParseError::invalid_argument(
                    "degrade probability must be between 0 and 1",
                    span,
                )
                .into());
            }
            Ok(pat.degrade_by(*amount, *seed))
        }
    }
}

fn positive_factor(amount: f64, span: Span) -> Result<Fraction, Error> {
    let factor = Fraction::from_float(amount);
    if !factor.is_positive() {
        return Err(ParseError::invalid_argument("factor must be positive", span).into());
    }
    Ok(factor)
}

fn slot_weight(element: &ElementNode) -> Result<Fraction, Error> {
    let weight = Fraction::from_float(element.weight);
    if !weight.is_positive() {
        return Err(
            ParseError::invalid_argument("weight must be positive", element.span).into(),
        );
    }
    Ok(weight)
}

fn turn_weight(element: &ElementNode) -> Result<u64, Error> {
    if element.weight.fract() != 0.0 || element.weight < 1.0 {
        return Err(ParseError::invalid_argument(
            "alternation weights must be whole numbers",
            element.span,
        )
        .into());
    }
    Ok(element.weight as u64)
}

fn counting_number(n: f64, what: &str, span: Span) -> Result<u32, Error> {
    if n.fract() != 0.0 || n < 0.0 || n > f64::from(u32::MAX) {
        return Err(ParseError::invalid_argument(
            format!("{} must be a non-negative integer", what),
            span,
        )
        .into());
    }
    Ok(n as u32)
}
