//! Regular expression to DFA compiler.
//!
//! A pattern goes through four stages: implicit concatenation is made
//! explicit ([`parser::normalize`]), the infix form is reordered into postfix
//! ([`parser::to_postfix`]), Thompson's construction builds an NFA
//! ([`fsm::Nfa::from_postfix`]) and subset construction determinizes it
//! ([`dfa::Dfa::from_nfa`]). The resulting [`Dfa`] is immutable and can be
//! simulated any number of times with [`simulate`].
//!
//! Supported syntax: alphanumeric symbols, `|`, `*`, `+`, `?` and parentheses.

use log::debug;

pub mod dfa;
pub mod error;
pub mod fsm;
pub mod lexer;
pub mod matching;
pub mod parser;
pub mod utils;

pub use crate::dfa::Dfa;
pub use crate::error::{CompileError, Malformation};
pub use crate::fsm::Nfa;
pub use crate::matching::Matcher;

use crate::lexer::Lexeme;

/// Every intermediate product of a compilation.
#[derive(Debug, Clone)]
pub struct Stages {
    pub lexemes: Vec<Lexeme>,
    pub normalized: Vec<Lexeme>,
    pub postfix: Vec<Lexeme>,
    pub alphabet: Vec<char>,
    pub nfa: Nfa,
    pub dfa: Dfa,
}

pub fn compile_stages(pattern: &str) -> Result<Stages, CompileError> {
    let lexemes = lexer::lex(pattern)?;
    let normalized = parser::normalize(&lexemes);
    let postfix = parser::to_postfix(&normalized)?;
    debug!("postfix form of {:?}: {}", pattern, lexer::render_tokens(&postfix));
    let nfa = Nfa::from_postfix(&postfix)?;
    let alphabet = lexer::alphabet(&lexemes);
    let dfa = Dfa::from_nfa(&nfa, &alphabet);
    Ok(Stages {
        lexemes,
        normalized,
        postfix,
        alphabet,
        nfa,
        dfa,
    })
}

pub fn compile(pattern: &str) -> Result<Dfa, CompileError> {
    compile_stages(pattern).map(|stages| stages.dfa)
}

/// Runs `input` through `dfa`. Never fails: characters outside the
/// alphabet simply reject.
pub fn simulate(dfa: &Dfa, input: &str) -> bool {
    dfa.accepts(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn matches(pattern: &str, input: &str) -> bool {
        simulate(&compile(pattern).unwrap(), input)
    }

    #[test]
    fn test_single_symbol() {
        assert!(matches("a", "a"));
        assert!(!matches("a", "b"));
        assert!(!matches("a", ""));
    }

    #[test]
    fn test_star_and_plus() {
        assert!(matches("a*", ""));
        assert!(matches("a*", "aaaa"));
        assert!(!matches("a+", ""));
        assert!(matches("a+", "a"));
        assert!(matches("a+", "aaa"));
    }

    #[test]
    fn test_optional() {
        assert!(matches("ab?", "a"));
        assert!(matches("ab?", "ab"));
        assert!(!matches("ab?", "abb"));
    }

    #[test]
    fn test_union() {
        assert!(matches("a|b", "a"));
        assert!(matches("a|b", "b"));
        assert!(!matches("a|b", "c"));
        assert!(!matches("a|b", "ab"));
    }

    #[test]
    fn test_textbook_example() {
        assert!(matches("(a|b)*abb", "ababb"));
        assert!(matches("(a|b)*abb", "abb"));
        assert!(!matches("(a|b)*abb", "abab"));
        assert!(!matches("(a|b)*abb", ""));
    }

    #[test]
    fn test_digits_and_nesting() {
        assert!(matches("(0|1(01*0)*1)*", "11"));
        assert!(matches("(0|1(01*0)*1)*", "110"));
        assert!(!matches("(0|1(01*0)*1)*", "10"));
        assert!(matches("x(yz)+", "xyzyz"));
        assert!(!matches("x(yz)+", "x"));
    }

    #[test]
    fn test_compile_errors() {
        assert_eq!(
            compile("").unwrap_err(),
            CompileError::MalformedPattern(Malformation::Empty)
        );
        assert!(matches!(
            compile("(a"),
            Err(CompileError::MismatchedGrouping { .. })
        ));
        assert!(matches!(
            compile(")a"),
            Err(CompileError::MismatchedGrouping { .. })
        ));
        assert!(matches!(
            compile("a||b"),
            Err(CompileError::InvalidExpression { .. })
        ));
        assert!(matches!(
            compile("a-b"),
            Err(CompileError::MalformedPattern(
                Malformation::UnexpectedCharacter('-', 1)
            ))
        ));
    }

    #[test]
    fn test_out_of_alphabet_rejects() {
        let dfa = compile("a*").unwrap();
        assert!(!simulate(&dfa, "aab"));
        assert!(!simulate(&dfa, "z"));
    }

    #[test]
    fn test_stages() {
        let stages = compile_stages("(a|b)*abb").unwrap();
        assert_eq!(lexer::render_tokens(&stages.normalized), "(a|b)*.a.b.b");
        assert_eq!(lexer::render_tokens(&stages.postfix), "ab|*a.b.b.");
        assert_eq!(stages.alphabet, vec!['a', 'b']);
        assert_eq!(stages.dfa.alphabet(), stages.alphabet.as_slice());
    }

    fn patterns() -> impl Strategy<Value = String> {
        let leaf = prop::sample::select(vec!["a", "b", "c"]).prop_map(String::from);
        leaf.prop_recursive(4, 24, 2, |inner| {
            prop_oneof![
                (inner.clone(), inner.clone()).prop_map(|(l, r)| format!("{}{}", l, r)),
                (inner.clone(), inner.clone()).prop_map(|(l, r)| format!("({}|{})", l, r)),
                inner.clone().prop_map(|e| format!("({})*", e)),
                inner.clone().prop_map(|e| format!("({})+", e)),
                inner.prop_map(|e| format!("({})?", e)),
            ]
        })
    }

    proptest! {
        #[test]
        fn prop_transition_function_is_total(pattern in patterns()) {
            let dfa = compile(&pattern).unwrap();
            prop_assert!(dfa.is_total());
            for state in 0..dfa.state_count() {
                for symbol in dfa.alphabet() {
                    prop_assert!(dfa.next(state, *symbol).is_some());
                }
            }
        }

        #[test]
        fn prop_agrees_with_regex_crate(pattern in patterns(), input in "[abc]{0,8}") {
            let dfa = compile(&pattern).unwrap();
            let oracle = regex::Regex::new(&format!("^(?:{})$", pattern)).unwrap();
            let alphabet = lexer::alphabet(&lexer::lex(&pattern).unwrap());
            let readable = input.chars().all(|c| alphabet.contains(&c));
            prop_assert_eq!(simulate(&dfa, &input), readable && oracle.is_match(&input));
        }

        #[test]
        fn prop_compilation_is_repeatable(pattern in patterns(), input in "[abc]{0,8}") {
            let first = compile(&pattern).unwrap();
            let second = compile(&pattern).unwrap();
            prop_assert_eq!(simulate(&first, &input), simulate(&second, &input));
        }

        #[test]
        fn prop_dfa_agrees_with_nfa(pattern in patterns(), input in "[abc]{0,8}") {
            let stages = compile_stages(&pattern).unwrap();
            prop_assert_eq!(stages.dfa.accepts(&input), stages.nfa.accepts(&input));
        }

        #[test]
        fn prop_foreign_characters_reject(pattern in patterns(), prefix in "[abc]{0,4}", foreign in "[d-z0-9]") {
            let dfa = compile(&pattern).unwrap();
            let input = format!("{}{}", prefix, foreign);
            prop_assert!(!simulate(&dfa, &input));
        }
    }
}
