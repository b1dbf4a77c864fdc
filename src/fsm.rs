use std::collections::BTreeSet;

use itertools::Itertools;
use log::debug;

use crate::{
    error::CompileError,
    lexer::{Lexeme, Token},
};

/// Opaque handle into the NFA's state arena.
pub type State = usize;

/// A set of NFA states, compared by content regardless of insertion order.
pub type StateSet = BTreeSet<State>;

#[derive(Hash, Debug, PartialEq, Eq, Clone, Copy)]
pub enum Transition {
    Consuming(char),
    Epsilon,
}

#[derive(Hash, Debug, PartialEq, Eq, Clone, Copy)]
pub struct Edge {
    pub transition: Transition,
    pub end: State,
}

impl Edge {
    pub fn new(transition: Transition, end: State) -> Self {
        Self { transition, end }
    }
}

type Fragment = (State, State);

/// Thompson NFA. States live in an arena; `transitions[s]` lists the edges
/// leaving state `s`. The graph is immutable once built.
#[derive(Debug, Clone)]
pub struct Nfa {
    transitions: Vec<Vec<Edge>>,
    start: State,
    accept: State,
}

/// Scratch space for one Thompson construction.
#[derive(Debug, Default)]
struct Builder {
    transitions: Vec<Vec<Edge>>,
    stack: Vec<Fragment>,
}

impl Builder {
    fn gen_state(&mut self) -> State {
        self.transitions.push(Vec::new());
        self.transitions.len() - 1
    }

    fn fragment(&mut self) -> Fragment {
        (self.gen_state(), self.gen_state())
    }

    fn add_transition(&mut self, start: State, end: State, transition: Transition) {
        self.transitions[start].push(Edge::new(transition, end));
    }

    fn epsilon(&mut self, start: State, end: State) {
        self.add_transition(start, end, Transition::Epsilon)
    }

    fn pop(&mut self, lexeme: &Lexeme) -> Result<Fragment, CompileError> {
        self.stack
            .pop()
            .ok_or_else(|| CompileError::InvalidExpression {
                offset: lexeme.offset,
                reason: format!("'{}' is missing an operand", lexeme.token),
            })
    }

    fn pop_pair(&mut self, lexeme: &Lexeme) -> Result<(Fragment, Fragment), CompileError> {
        if self.stack.len() < 2 {
            return Err(CompileError::InvalidExpression {
                offset: lexeme.offset,
                reason: format!("'{}' needs two operands", lexeme.token),
            });
        }
        let right = self.pop(lexeme)?;
        let left = self.pop(lexeme)?;
        Ok((left, right))
    }

    fn symbol_transition(&mut self, symbol: char) -> Fragment {
        let (start, end) = self.fragment();
        self.add_transition(start, end, Transition::Consuming(symbol));
        (start, end)
    }

    fn concatenation(&mut self, left: Fragment, right: Fragment) -> Fragment {
        self.epsilon(left.1, right.0);
        (left.0, right.1)
    }

    fn alternation(&mut self, lower: Fragment, upper: Fragment) -> Fragment {
        let fragment = self.fragment();
        self.epsilon(fragment.0, lower.0);
        self.epsilon(fragment.0, upper.0);
        self.epsilon(lower.1, fragment.1);
        self.epsilon(upper.1, fragment.1);
        fragment
    }

    fn zero_or_more(&mut self, inner: Fragment) -> Fragment {
        let fragment = self.fragment();
        self.epsilon(fragment.0, inner.0);
        self.epsilon(fragment.0, fragment.1);
        self.epsilon(inner.1, inner.0);
        self.epsilon(inner.1, fragment.1);
        fragment
    }

    // the closure reuses `inner`, so only the star's two states are added
    fn one_or_more(&mut self, inner: Fragment) -> Fragment {
        let closure = self.zero_or_more(inner);
        self.concatenation(inner, closure)
    }

    fn zero_or_one(&mut self, inner: Fragment) -> Fragment {
        let fragment = self.fragment();
        self.epsilon(fragment.0, inner.0);
        self.epsilon(fragment.0, fragment.1);
        self.epsilon(inner.1, fragment.1);
        fragment
    }

    fn apply(&mut self, lexeme: &Lexeme) -> Result<(), CompileError> {
        let fragment = match lexeme.token {
            Token::Symbol(symbol) => self.symbol_transition(symbol),
            Token::Concat => {
                let (left, right) = self.pop_pair(lexeme)?;
                self.concatenation(left, right)
            }
            Token::Union => {
                let (left, right) = self.pop_pair(lexeme)?;
                self.alternation(left, right)
            }
            Token::Star => {
                let inner = self.pop(lexeme)?;
                self.zero_or_more(inner)
            }
            Token::Plus => {
                let inner = self.pop(lexeme)?;
                self.one_or_more(inner)
            }
            Token::Optional => {
                let inner = self.pop(lexeme)?;
                self.zero_or_one(inner)
            }
            Token::Open | Token::Close => {
                return Err(CompileError::InvalidExpression {
                    offset: lexeme.offset,
                    reason: "grouping marker in postfix sequence".to_string(),
                })
            }
        };
        self.stack.push(fragment);
        Ok(())
    }
}

impl Nfa {
    /// Thompson construction over a postfix token sequence.
    pub fn from_postfix(postfix: &[Lexeme]) -> Result<Nfa, CompileError> {
        let mut builder = Builder::default();
        for lexeme in postfix {
            builder.apply(lexeme)?;
        }
        let end_offset = postfix.last().map_or(0, |lexeme| lexeme.offset);
        match builder.stack.as_slice() {
            [(start, accept)] => {
                let nfa = Nfa {
                    start: *start,
                    accept: *accept,
                    transitions: builder.transitions,
                };
                debug!("built NFA with {} states", nfa.state_count());
                Ok(nfa)
            }
            [] => Err(CompileError::InvalidExpression {
                offset: end_offset,
                reason: "expression is empty".to_string(),
            }),
            fragments => Err(CompileError::InvalidExpression {
                offset: end_offset,
                reason: format!("{} fragments left unjoined", fragments.len()),
            }),
        }
    }

    pub fn start(&self) -> State {
        self.start
    }

    pub fn accept(&self) -> State {
        self.accept
    }

    pub fn state_count(&self) -> usize {
        self.transitions.len()
    }

    pub fn edges(&self, state: State) -> &[Edge] {
        self.transitions
            .get(state)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Smallest superset of `states` closed under epsilon edges.
    pub fn epsilon_closure(&self, states: &StateSet) -> StateSet {
        let mut closure = states.clone();
        let mut worklist: Vec<State> = states.iter().copied().collect();
        while let Some(state) = worklist.pop() {
            for edge in self.edges(state) {
                if edge.transition == Transition::Epsilon && closure.insert(edge.end) {
                    worklist.push(edge.end);
                }
            }
        }
        closure
    }

    /// States reachable from `states` by consuming `symbol` (no closure applied).
    pub fn step(&self, states: &StateSet, symbol: char) -> StateSet {
        states
            .iter()
            .flat_map(|state| self.edges(*state))
            .filter(|edge| edge.transition == Transition::Consuming(symbol))
            .map(|edge| edge.end)
            .collect()
    }

    /// Graphviz rendering for debugging.
    pub fn to_dot(&self) -> String {
        let mut out = String::new();
        for state in 0..self.state_count() {
            if state == self.accept {
                out += &format!("node_{}[label=\"{}\" shape=doublecircle]\n", state, state);
            } else if state == self.start {
                out += &format!("node_{}[label=\"{}\" fillcolor=green]\n", state, state);
            } else {
                out += &format!("node_{}[label=\"{}\"]\n", state, state);
            }
        }
        for (start, edges) in self.transitions.iter().enumerate() {
            for edge in edges {
                match edge.transition {
                    Transition::Epsilon => {
                        out += &format!("node_{} -> node_{}[style=dashed]\n", start, edge.end)
                    }
                    Transition::Consuming(symbol) => {
                        out += &format!(
                            "node_{} -> node_{}[label=\"{}\"]\n",
                            start, edge.end, symbol
                        )
                    }
                }
            }
        }
        format!(
            "digraph NFA {{\n  rankdir=\"LR\"\n  node [shape=circle style=filled fillcolor=\"#EEEEEE\"]\n{}}}\n",
            out.lines().map(|line| format!("  {}\n", line)).join("")
        )
    }
}
