use itertools::Itertools;

use crate::{
    error::CompileError,
    lexer::{Lexeme, Token},
    utils::TokenClass,
};

fn needs_concat(left: &Token, right: &Token) -> bool {
    TokenClass::ENDS_OPERAND.intersects(left.class())
        && TokenClass::BEGINS_OPERAND.intersects(right.class())
}

/// Make concatenation explicit, e.g. `(a|b)*c` becomes `(a|b)*.c`.
///
/// An inserted marker borrows the offset of the token it precedes.
pub fn normalize(infix: &[Lexeme]) -> Vec<Lexeme> {
    let mut normalized = Vec::with_capacity(infix.len() * 2);
    if let Some(first) = infix.first() {
        normalized.push(*first);
    }
    for (left, right) in infix.iter().tuple_windows() {
        if needs_concat(&left.token, &right.token) {
            normalized.push(Lexeme::new(Token::Concat, right.offset));
        }
        normalized.push(*right);
    }
    normalized
}

/// Shunting-yard conversion of a normalized infix sequence. Operators of equal
/// precedence associate to the left.
pub fn to_postfix(infix: &[Lexeme]) -> Result<Vec<Lexeme>, CompileError> {
    let mut output: Vec<Lexeme> = Vec::with_capacity(infix.len());
    let mut operators: Vec<Lexeme> = Vec::new();

    for lexeme in infix {
        match lexeme.token {
            Token::Symbol(_) => output.push(*lexeme),
            Token::Open => operators.push(*lexeme),
            Token::Close => loop {
                match operators.pop() {
                    Some(Lexeme {
                        token: Token::Open, ..
                    }) => break,
                    Some(operator) => output.push(operator),
                    None => {
                        return Err(CompileError::MismatchedGrouping {
                            offset: lexeme.offset,
                        })
                    }
                }
            },
            operator => {
                while let Some(top) = operators.last() {
                    if top.token == Token::Open || top.token.precedence() < operator.precedence()
                    {
                        break;
                    }
                    output.extend(operators.pop());
                }
                operators.push(*lexeme);
            }
        }
    }

    while let Some(operator) = operators.pop() {
        if operator.token == Token::Open {
            return Err(CompileError::MismatchedGrouping {
                offset: operator.offset,
            });
        }
        output.push(operator);
    }
    Ok(output)
}
