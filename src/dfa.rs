use std::{
    collections::{BTreeMap, BTreeSet, HashMap, VecDeque},
    fmt::Display,
};

use itertools::Itertools;
use log::{debug, trace};

use crate::fsm::{Nfa, StateSet};

pub type DfaState = usize;

/// Total deterministic automaton produced by subset construction.
///
/// State `0` is always the start state. Every state has exactly one
/// transition per alphabet symbol; symbols leading nowhere route to a
/// non-accepting dead state that loops on itself.
#[derive(Debug, Clone)]
pub struct Dfa {
    transitions: Vec<BTreeMap<char, DfaState>>,
    subsets: Vec<StateSet>,
    accepting: BTreeSet<DfaState>,
    alphabet: Vec<char>,
    dead: Option<DfaState>,
}

/// Call-scoped bookkeeping for one determinization.
struct SubsetConstruction<'a> {
    nfa: &'a Nfa,
    ids: HashMap<StateSet, DfaState>,
    worklist: VecDeque<DfaState>,
    dfa: Dfa,
}

impl<'a> SubsetConstruction<'a> {
    fn id_of(&mut self, subset: StateSet) -> DfaState {
        if let Some(&id) = self.ids.get(&subset) {
            return id;
        }
        let id = self.dfa.subsets.len();
        if subset.is_empty() {
            self.dfa.dead = Some(id);
        }
        if subset.contains(&self.nfa.accept()) {
            self.dfa.accepting.insert(id);
        }
        trace!("DFA state {} = {:?}", id, subset);
        self.dfa.subsets.push(subset.clone());
        self.dfa.transitions.push(BTreeMap::new());
        self.ids.insert(subset, id);
        self.worklist.push_back(id);
        id
    }

    fn run(mut self) -> Dfa {
        let initial = self
            .nfa
            .epsilon_closure(&StateSet::from([self.nfa.start()]));
        self.id_of(initial);

        let alphabet = self.dfa.alphabet.clone();
        while let Some(current) = self.worklist.pop_front() {
            for &symbol in &alphabet {
                let target = self
                    .nfa
                    .epsilon_closure(&self.nfa.step(&self.dfa.subsets[current], symbol));
                let id = self.id_of(target);
                self.dfa.transitions[current].insert(symbol, id);
            }
        }
        self.dfa
    }
}

impl Dfa {
    /// Subset construction over `alphabet`. Symbols are visited in sorted
    /// order, so state numbering is deterministic for a given NFA.
    pub fn from_nfa(nfa: &Nfa, alphabet: &[char]) -> Dfa {
        let construction = SubsetConstruction {
            nfa,
            ids: HashMap::new(),
            worklist: VecDeque::new(),
            dfa: Dfa {
                transitions: Vec::new(),
                subsets: Vec::new(),
                accepting: BTreeSet::new(),
                alphabet: alphabet.iter().copied().sorted().dedup().collect(),
                dead: None,
            },
        };
        let dfa = construction.run();
        debug_assert!(dfa.is_total());
        debug!(
            "determinized into {} DFA states (dead state: {:?})",
            dfa.state_count(),
            dfa.dead
        );
        dfa
    }

    pub fn start(&self) -> DfaState {
        0
    }

    /// Successor of `state` on `symbol`, `None` when the symbol is outside the alphabet.
    pub fn next(&self, state: DfaState, symbol: char) -> Option<DfaState> {
        self.transitions
            .get(state)
            .and_then(|row| row.get(&symbol))
            .copied()
    }

    pub fn is_accepting(&self, state: DfaState) -> bool {
        self.accepting.contains(&state)
    }

    pub fn accepting(&self) -> &BTreeSet<DfaState> {
        &self.accepting
    }

    pub fn alphabet(&self) -> &[char] {
        &self.alphabet
    }

    /// Number of states, dead state included.
    pub fn state_count(&self) -> usize {
        self.transitions.len()
    }

    pub fn dead_state(&self) -> Option<DfaState> {
        self.dead
    }

    /// The NFA states a DFA state stands for.
    pub fn subset(&self, state: DfaState) -> Option<&StateSet> {
        self.subsets.get(state)
    }

    pub fn transitions(&self, state: DfaState) -> Option<&BTreeMap<char, DfaState>> {
        self.transitions.get(state)
    }

    pub fn is_total(&self) -> bool {
        self.transitions.iter().all(|row| {
            self.alphabet.iter().all(|symbol| {
                row.get(symbol)
                    .map_or(false, |target| *target < self.state_count())
            })
        })
    }

    pub fn to_dot(&self) -> String {
        let mut out = String::new();
        out += "  empty [label=\"\" shape=plaintext]\n";
        for state in 0..self.state_count() {
            let shape = if self.is_accepting(state) {
                "doublecircle"
            } else {
                "circle"
            };
            let label = if Some(state) == self.dead {
                "dead".to_string()
            } else {
                state.to_string()
            };
            out += &format!("  s{}[label=\"{}\" shape={}]\n", state, label, shape);
        }
        out += &format!("  empty -> s{}[label=\"start\"]\n", self.start());

        let mut edges: BTreeMap<(DfaState, DfaState), Vec<char>> = BTreeMap::new();
        for (from, row) in self.transitions.iter().enumerate() {
            for (symbol, to) in row {
                edges.entry((from, *to)).or_default().push(*symbol);
            }
        }
        for ((from, to), symbols) in edges {
            out += &format!(
                "  s{} -> s{}[label=\"{}\"]\n",
                from,
                to,
                symbols.iter().join(",")
            );
        }
        format!("digraph DFA {{\n  rankdir=LR\n{}}}\n", out)
    }
}

impl Display for Dfa {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let width = (self.state_count().max(1) - 1).to_string().len();
        write!(f, "{:width$} |", "", width = width + 2)?;
        for symbol in &self.alphabet {
            write!(f, " {:>width$}", symbol, width = width)?;
        }
        writeln!(f)?;
        for (state, row) in self.transitions.iter().enumerate() {
            write!(
                f,
                "{}{}{:>width$} |",
                if state == self.start() { '→' } else { ' ' },
                if self.is_accepting(state) { '*' } else { ' ' },
                state,
                width = width
            )?;
            for target in row.values() {
                write!(f, " {:>width$}", target, width = width)?;
            }
            if Some(state) == self.dead {
                write!(f, "  (dead)")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
