use crate::span::Span;
use logos::Logos;

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
pub enum Token {
    // Numbers win over atoms when both could match
    #[regex(r"-?[0-9]+(\.[0-9]+)?", parse_number, priority = 10)]
    Number(f64),

    // Note and sample names: c3, bd, c#4, hh'open
    #[regex(r"[a-zA-Z][a-zA-Z0-9'._#-]*", priority = 5)]
    Atom,

    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("<")]
    LAngle,
    #[token(">")]
    RAngle,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,

    #[token(",")]
    Comma,
    #[token("|")]
    Pipe,

    #[token("@")]
    At,
    #[token("_")]
    Underscore,
    #[token("!")]
    Bang,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("?")]
    Question,

    #[token("~")]
    Tilde,

    Error,
}

fn parse_number(lex: &mut logos::Lexer<Token>) -> Option<f64> {
    lex.slice().parse().ok()
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{}", n),
            Token::Atom => write!(f, "atom"),
            Token::LBracket => write!(f, "["),
            Token::RBracket => write!(f, "]"),
            Token::LAngle => write!(f, "<"),
            Token::RAngle => write!(f, ">"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::Comma => write!(f, ","),
            Token::Pipe => write!(f, "|"),
            Token::At => write!(f, "@"),
            Token::Underscore => write!(f, "_"),
            Token::Bang => write!(f, "!"),
            Token::Star => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::Question => write!(f, "?"),
            Token::Tilde => write!(f, "~"),
            Token::Error => write!(f, "unrecognized input"),
        }
    }
}

/// Lexer wrapper with single-token lookahead and position tracking.
pub struct Lexer<'source> {
    inner: logos::Lexer<'source, Token>,
    peeked: Option<Option<(Token, Span)>>,
}

impl<'source> Lexer<'source> {
    pub fn new(source: &'source str) -> Self {
        Lexer {
            inner: Token::lexer(source),
            peeked: None,
        }
    }

    pub fn next_token(&mut self) -> Option<(Token, Span)> {
        if let Some(peeked) = self.peeked.take() {
            return peeked;
        }
        let token = self.inner.next()?;
        let span = Span::from(self.inner.span());
        Some((token.unwrap_or(Token::Error), span))
    }

    pub fn peek_token(&mut self) -> Option<(Token, Span)> {
        if self.peeked.is_none() {
            self.peeked = Some(self.next_token());
        }
        self.peeked.as_ref().and_then(|x| x.clone())
    }

    pub fn source(&self) -> &'source str {
        self.inner.source()
    }

    pub fn slice(&self, span: Span) -> &'source str {
        &self.source()[span.to_range()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(input: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(input);
        let mut tokens = Vec::new();
        while let Some((token, _)) = lexer.next_token() {
            tokens.push(token);
        }
        tokens
    }

    #[test]
    fn lexes_atoms() {
        assert_eq!(
            lex("bd sd c#4 hh'open"),
            vec![Token::Atom, Token::Atom, Token::Atom, Token::Atom]
        );
    }

    #[test]
    fn lexes_numbers() {
        assert_eq!(
            lex("1 2.5 -3"),
            vec![Token::Number(1.0), Token::Number(2.5), Token::Number(-3.0)]
        );
    }

    #[test]
    fn underscore_alone_is_an_operator() {
        assert_eq!(lex("a _ _"), vec![Token::Atom, Token::Underscore, Token::Underscore]);
        // but inside a name it stays part of the atom
        assert_eq!(lex("a_b"), vec![Token::Atom]);
    }

    #[test]
    fn lexes_suffixes() {
        assert_eq!(
            lex("bd*2 sd@3 cp?"),
            vec![
                Token::Atom,
                Token::Star,
                Token::Number(2.0),
                Token::Atom,
                Token::At,
                Token::Number(3.0),
                Token::Atom,
                Token::Question,
            ]
        );
    }

    #[test]
    fn lexes_euclid_call() {
        assert_eq!(
            lex("bd(3,8)"),
            vec![
                Token::Atom,
                Token::LParen,
                Token::Number(3.0),
                Token::Comma,
                Token::Number(8.0),
                Token::RParen,
            ]
        );
    }

    #[test]
    fn lexes_groups_and_separators() {
        assert_eq!(
            lex("[a,b] <c d> | ~"),
            vec![
                Token::LBracket,
                Token::Atom,
                Token::Comma,
                Token::Atom,
                Token::RBracket,
                Token::LAngle,
                Token::Atom,
                Token::Atom,
                Token::RAngle,
                Token::Pipe,
                Token::Tilde,
            ]
        );
    }

    #[test]
    fn unknown_characters_become_error_tokens() {
        assert_eq!(lex("a $ b"), vec![Token::Atom, Token::Error, Token::Atom]);
    }

    #[test]
    fn slice_recovers_source_text() {
        let mut lexer = Lexer::new("bd sd");
        let (token, span) = lexer.next_token().unwrap();
        assert_eq!(token, Token::Atom);
        assert_eq!(lexer.slice(span), "bd");
    }

    #[test]
    fn peek_does_not_consume() {
        let mut lexer = Lexer::new("bd *");
        assert_eq!(lexer.peek_token().unwrap().0, Token::Atom);
        assert_eq!(lexer.peek_token().unwrap().0, Token::Atom);
        assert_eq!(lexer.next_token().unwrap().0, Token::Atom);
        assert_eq!(lexer.next_token().unwrap().0, Token::Star);
        assert_eq!(lexer.next_token(), None);
    }
}
