use crate::span::Span;
use serde::{Deserialize, Serialize};

/// Syntax tree for mini-notation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Ast {
    Atom(AtomNode),
    Sequence(SequenceNode),
    Stack(StackNode),
    Alternation(AlternationNode),
    Choice(ChoiceNode),
}

impl Ast {
    pub fn span(&self) -> Span {
        match self {
            Ast::Atom(node) => node.span,
            Ast::Sequence(node) => node.span,
            Ast::Stack(node) => node.span,
            Ast::Alternation(node) => node.span,
            Ast::Choice(node) => node.span,
        }
    }
}

/// A leaf value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtomNode {
    pub value: AtomValue,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AtomValue {
    Number(f64),
    String(String),
    /// `~`
    Rest,
}

impl AtomNode {
    pub fn number(n: f64, span: Span) -> Self {
        AtomNode {
            value: AtomValue::Number(n),
            span,
        }
    }

    pub fn string(s: impl Into<String>, span: Span) -> Self {
        AtomNode {
            value: AtomValue::String(s.into()),
            span,
        }
    }

    pub fn rest(span: Span) -> Self {
        AtomNode {
            value: AtomValue::Rest,
            span,
        }
    }
}

/// Space-separated steps sharing one cycle, weighted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceNode {
    pub elements: Vec<ElementNode>,
    pub span: Span,
}

/// Comma-separated layers playing simultaneously.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackNode {
    pub children: Vec<Ast>,
    pub span: Span,
}

/// `<a b c>`: one element per cycle, round robin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlternationNode {
    pub elements: Vec<ElementNode>,
    pub span: Span,
}

/// Pipe-separated options, one picked per cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceNode {
    pub options: Vec<Ast>,
    pub seed: u64,
    pub span: Span,
}

/// One step of a sequence or alternation: a source with suffix
/// modifiers, a relative width, and a repetition count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementNode {
    pub source: Box<Ast>,
    pub ops: Vec<SuffixOp>,
    pub weight: f64,
    pub reps: u32,
    pub span: Span,
}

impl ElementNode {
    pub fn new(source: Ast, span: Span) -> Self {
        ElementNode {
            source: Box::new(source),
            ops: Vec::new(),
            weight: 1.0,
            reps: 1,
            span,
        }
    }

    /// Whether this element is just its source, with no modifiers.
    pub fn is_plain(&self) -> bool {
        self.ops.is_empty() && self.weight == 1.0 && self.reps == 1
    }
}

/// Suffix modifiers, applied left to right.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SuffixOp {
    /// `*n`
    Fast { amount: f64 },
    /// `/n`
    Slow { amount: f64 },
    /// `(pulses, steps)` or `(pulses, steps, rotation)`
    Euclid {
        pulses: f64,
        steps: f64,
        rotation: Option<f64>,
    },
    /// `?` or `?p`
    Degrade { amount: f64, seed: u64 },
}
