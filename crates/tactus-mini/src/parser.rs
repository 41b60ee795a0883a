use crate::ast::*;
use crate::error::ParseError;
use crate::lexer::{Lexer, Token};
use crate::span::Span;

type Result<T> = std::result::Result<T, ParseError>;

/// Recursive descent parser for mini-notation.
///
/// Binding, loosest first: `,` (stack), `|` (choice), whitespace
/// (sequence), then element suffixes. Each `?` and each `|` group gets
/// its own seed, assigned in source order so a given source text always
/// compiles to the same pattern.
pub struct Parser<'source> {
    lexer: Lexer<'source>,
    seed_counter: u64,
}

/// Parse a complete pattern from source text.
pub fn parse(source: &str) -> Result<Ast> {
    Parser::new(source).parse()
}

impl<'source> Parser<'source> {
    pub fn new(source: &'source str) -> Self {
        Parser {
            lexer: Lexer::new(source),
            seed_counter: 0,
        }
    }

    pub fn parse(&mut self) -> Result<Ast> {
        let ast = self.parse_stack()?;
        if let Some((token, span)) = self.peek() {
            return Err(ParseError::unexpected_token(
                "end of input",
                token.to_string(),
                span,
            ));
        }
        Ok(ast)
    }

    fn parse_stack(&mut self) -> Result<Ast> {
        let first = self.parse_choice()?;
        if !matches!(self.peek(), Some((Token::Comma, _))) {
            return Ok(first);
        }
        let mut children = vec![first];
        while let Some((Token::Comma, _)) = self.peek() {
            self.next();
            children.push(self.parse_choice()?);
        }
        let span = children[0].span().merge(children[children.len() - 1].span());
        Ok(Ast::Stack(StackNode { children, span }))
    }

    fn parse_choice(&mut self) -> Result<Ast> {
        let first = self.parse_sequence()?;
        if !matches!(self.peek(), Some((Token::Pipe, _))) {
            return Ok(first);
        }
        let mut options = vec![first];
        while let Some((Token::Pipe, _)) = self.peek() {
            self.next();
            options.push(self.parse_sequence()?);
        }
        let span = options[0].span().merge(options[options.len() - 1].span());
        let seed = self.fresh_seed();
        Ok(Ast::Choice(ChoiceNode {
            options,
            seed,
            span,
        }))
    }

    fn parse_sequence(&mut self) -> Result<Ast> {
        let mut elements = Vec::new();
        loop {
            match self.peek() {
                None => break,
                Some((token, _)) if is_sequence_end(&token) => break,
                Some(_) => elements.push(self.parse_element()?),
            }
        }
        match elements.len() {
            0 => match self.peek() {
                Some((token, span)) => Err(ParseError::unexpected_token(
                    "a pattern element",
                    token.to_string(),
                    span,
                )),
                None => Err(ParseError::unexpected_eof("a pattern element")),
            },
            1 if elements[0].is_plain() => {
                let element = elements.remove(0);
                Ok(*element.source)
            }
            _ => {
                let span = elements[0]
                    .span
                    .merge(elements[elements.len() - 1].span);
                Ok(Ast::Sequence(SequenceNode { elements, span }))
            }
        }
    }

    fn parse_element(&mut self) -> Result<ElementNode> {
        let source = self.parse_primary()?;
        let span = source.span();
        let mut element = ElementNode::new(source, span);
        loop {
            match self.peek() {
                Some((Token::Star, _)) => {
                    self.next();
                    let (amount, span) = self.expect_number("a factor after '*'")?;
                    element.ops.push(SuffixOp::Fast { amount });
                    element.span = element.span.merge(span);
                }
                Some((Token::Slash, _)) => {
                    self.next();
                    let (amount, span) = self.expect_number("a factor after '/'")?;
                    element.ops.push(SuffixOp::Slow { amount });
                    element.span = element.span.merge(span);
                }
                Some((Token::At, _)) => {
                    self.next();
                    let (weight, span) = self.expect_number("a weight after '@'")?;
                    if weight <= 0.0 {
                        return Err(ParseError::invalid_argument(
                            "weight must be positive",
                            span,
                        ));
                    }
                    element.weight = weight;
                    element.span = element.span.merge(span);
                }
                Some((Token::Underscore, span)) => {
                    self.next();
                    element.weight += 1.0;
                    element.span = element.span.merge(span);
                }
                Some((Token::Bang, span)) => {
                    self.next();
                    if let Some((Token::Number(n), num_span)) = self.peek() {
                        self.next();
                        if n.fract() != 0.0 || n < 1.0 {
                            return Err(ParseError::invalid_argument(
                                "replication count must be a positive integer",
                                num_span,
                            ));
                        }
                        element.reps = n as u32;
                        element.span = element.span.merge(num_span);
                    } else {
                        element.reps += 1;
                        element.span = element.span.merge(span);
                    }
                }
                Some((Token::LParen, open_span)) => {
                    self.next();
                    let (pulses, _) = self.expect_number("a pulse count")?;
                    self.expect_token(Token::Comma, "','")?;
                    let (steps, _) = self.expect_number("a step count")?;
                    let rotation = if let Some((Token::Comma, _)) = self.peek() {
                        self.next();
                        let (r, _) = self.expect_number("a rotation")?;
                        Some(r)
                    } else {
                        None
                    };
                    let close = match self.next() {
                        Some((Token::RParen, span)) => span,
                        _ => return Err(ParseError::unclosed_delimiter('(', open_span)),
                    };
                    element.ops.push(SuffixOp::Euclid {
                        pulses,
                        steps,
                        rotation,
                    });
                    element.span = element.span.merge(close);
                }
                Some((Token::Question, span)) => {
                    self.next();
                    let amount = if let Some((Token::Number(n), num_span)) = self.peek() {
                        self.next();
                        element.span = element.span.merge(num_span);
                        n
                    } else {
                        element.span = element.span.merge(span);
                        0.5
                    };
                    let seed = self.fresh_seed();
                    element.ops.push(SuffixOp::Degrade { amount, seed });
                }
                _ => break,
            }
        }
        Ok(element)
    }

    fn parse_primary(&mut self) -> Result<Ast> {
        match self.next() {
            None => Err(ParseError::unexpected_eof("a pattern element")),
            Some((Token::Atom, span)) => {
                Ok(Ast::Atom(AtomNode::string(self.lexer.slice(span), span)))
            }
            Some((Token::Number(n), span)) => Ok(Ast::Atom(AtomNode::number(n, span))),
            Some((Token::Tilde, span)) => Ok(Ast::Atom(AtomNode::rest(span))),
            Some((Token::LBracket, open_span)) => {
                let inner = self.parse_stack()?;
                match self.next() {
                    Some((Token::RBracket, _)) => Ok(inner),
                    _ => Err(ParseError::unclosed_delimiter('[', open_span)),
                }
            }
            Some((Token::LAngle, open_span)) => self.parse_alternation(open_span),
            Some((token, span)) => Err(ParseError::unexpected_token(
                "a pattern element",
                token.to_string(),
                span,
            )),
        }
    }

    fn parse_alternation(&mut self, open_span: Span) -> Result<Ast> {
        let mut elements = Vec::new();
        loop {
            match self.peek() {
                None => return Err(ParseError::unclosed_delimiter('<', open_span)),
                Some((Token::RAngle, close_span)) => {
                    self.next();
                    if elements.is_empty() {
                        return Err(ParseError::unexpected_token(
                            "a pattern element",
                            Token::RAngle.to_string(),
                            close_span,
                        ));
                    }
                    let span = open_span.merge(close_span);
                    return Ok(Ast::Alternation(AlternationNode { elements, span }));
                }
                Some((token, span)) if matches!(token, Token::Comma | Token::Pipe) => {
                    return Err(ParseError::unexpected_token(
                        "'>' or a pattern element",
                        token.to_string(),
                        span,
                    ));
                }
                Some(_) => elements.push(self.parse_element()?),
            }
        }
    }

    fn expect_number(&mut self, expected: &str) -> Result<(f64, Span)> {
        match self.next() {
            Some((Token::Number(n), span)) => Ok((n, span)),
            Some((token, span)) => Err(ParseError::unexpected_token(
                expected,
                token.to_string(),
                span,
            )),
            None => Err(ParseError::unexpected_eof(expected)),
        }
    }

    fn expect_token(&mut self, wanted: Token, expected: &str) -> Result<Span> {
        match self.next() {
            Some((token, span)) if token == wanted => Ok(span),
            Some((token, span)) => Err(ParseError::unexpected_token(
                expected,
                token.to_string(),
                span,
            )),
            None => Err(ParseError::unexpected_eof(expected)),
        }
    }

    fn fresh_seed(&mut self) -> u64 {
        let seed = self.seed_counter;
        self.seed_counter += 1;
        seed
    }

    fn peek(&mut self) -> Option<(Token, Span)> {
        self.lexer.peek_token()
    }

    fn next(&mut self) -> Option<(Token, Span)> {
        self.lexer.next_token()
    }
}

fn is_sequence_end(token: &Token) -> bool {
    matches!(
        token,
        Token::Comma | Token::Pipe | Token::RBracket | Token::RAngle
    )
}
