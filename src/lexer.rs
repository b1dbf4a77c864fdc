use std::fmt::Display;

use itertools::Itertools;
use nom::{
    branch::alt,
    character::complete::{char, satisfy},
    combinator::{map, value},
    IResult,
};

use crate::{
    error::{CompileError, Malformation},
    utils::TokenClass,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    Symbol(char),
    Union,
    Concat,
    Star,
    Plus,
    Optional,
    Open,
    Close,
}

impl Token {
    pub fn class(&self) -> TokenClass {
        match self {
            Self::Symbol(_) => TokenClass::OPERAND,
            Self::Union | Self::Concat => TokenClass::BINARY,
            Self::Star | Self::Plus | Self::Optional => TokenClass::POSTFIX,
            Self::Open => TokenClass::OPEN_GROUP,
            Self::Close => TokenClass::CLOSE_GROUP,
        }
    }

    /// Binding strength of an operator; operands and grouping markers bind nothing.
    pub const fn precedence(&self) -> u8 {
        match self {
            Self::Star | Self::Plus | Self::Optional => 3,
            Self::Concat => 2,
            Self::Union => 1,
            Self::Symbol(_) | Self::Open | Self::Close => 0,
        }
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Symbol(c) => write!(f, "{}", c),
            Self::Union => write!(f, "|"),
            Self::Concat => write!(f, "."),
            Self::Star => write!(f, "*"),
            Self::Plus => write!(f, "+"),
            Self::Optional => write!(f, "?"),
            Self::Open => write!(f, "("),
            Self::Close => write!(f, ")"),
        }
    }
}

/// A token together with the character offset it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lexeme {
    pub token: Token,
    pub offset: usize,
}

impl Lexeme {
    pub fn new(token: Token, offset: usize) -> Self {
        Self { token, offset }
    }
}

fn parse_token(input: &str) -> IResult<&str, Token> {
    alt((
        map(satisfy(|c| c.is_alphanumeric()), Token::Symbol),
        value(Token::Union, char('|')),
        value(Token::Star, char('*')),
        value(Token::Plus, char('+')),
        value(Token::Optional, char('?')),
        value(Token::Open, char('(')),
        value(Token::Close, char(')')),
    ))(input)
}

pub fn lex(pattern: &str) -> Result<Vec<Lexeme>, CompileError> {
    if pattern.trim().is_empty() {
        return Err(CompileError::MalformedPattern(Malformation::Empty));
    }
    let mut lexemes = Vec::new();
    let mut remainder = pattern;
    // every token is exactly one character wide
    while let Some(next) = remainder.chars().next() {
        match parse_token(remainder) {
            Ok((rest, token)) => {
                lexemes.push(Lexeme::new(token, lexemes.len()));
                remainder = rest;
            }
            Err(_) => {
                return Err(CompileError::MalformedPattern(
                    Malformation::UnexpectedCharacter(next, lexemes.len()),
                ))
            }
        }
    }
    Ok(lexemes)
}

/// Sorted, deduplicated symbols occurring in the pattern.
pub fn alphabet(lexemes: &[Lexeme]) -> Vec<char> {
    lexemes
        .iter()
        .filter_map(|lexeme| match lexeme.token {
            Token::Symbol(c) => Some(c),
            _ => None,
        })
        .sorted()
        .dedup()
        .collect()
}

pub fn render_tokens(lexemes: &[Lexeme]) -> String {
    lexemes.iter().map(|lexeme| lexeme.token).join("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_token() {
        assert_eq!(parse_token("ab"), Ok(("b", Token::Symbol('a'))));
        assert_eq!(parse_token("7"), Ok(("", Token::Symbol('7'))));
        assert_eq!(parse_token("|a"), Ok(("a", Token::Union)));
        assert_eq!(parse_token("?"), Ok(("", Token::Optional)));
        assert!(parse_token(".").is_err());
        assert!(parse_token(" ").is_err());
    }

    #[test]
    fn test_lex_offsets() {
        let lexemes = lex("(a|b)*").unwrap();
        assert_eq!(lexemes.len(), 6);
        assert_eq!(lexemes[0], Lexeme::new(Token::Open, 0));
        assert_eq!(lexemes[3], Lexeme::new(Token::Symbol('b'), 3));
        assert_eq!(lexemes[5], Lexeme::new(Token::Star, 5));
    }

    #[test]
    fn test_lex_rejects_empty() {
        assert_eq!(
            lex(""),
            Err(CompileError::MalformedPattern(Malformation::Empty))
        );
        assert_eq!(
            lex("   "),
            Err(CompileError::MalformedPattern(Malformation::Empty))
        );
    }

    #[test]
    fn test_lex_rejects_unknown_characters() {
        assert_eq!(
            lex("ab.c"),
            Err(CompileError::MalformedPattern(
                Malformation::UnexpectedCharacter('.', 2)
            ))
        );
        assert_eq!(
            lex("a b"),
            Err(CompileError::MalformedPattern(
                Malformation::UnexpectedCharacter(' ', 1)
            ))
        );
        assert_eq!(
            lex("[ab]"),
            Err(CompileError::MalformedPattern(
                Malformation::UnexpectedCharacter('[', 0)
            ))
        );
    }

    #[test]
    fn test_alphabet_sorted_and_deduplicated() {
        let lexemes = lex("(b|a)*abb1").unwrap();
        assert_eq!(alphabet(&lexemes), vec!['1', 'a', 'b']);
    }

    #[test]
    fn test_render_tokens() {
        assert_eq!(render_tokens(&lex("(a|b)*c").unwrap()), "(a|b)*c");
    }
}
