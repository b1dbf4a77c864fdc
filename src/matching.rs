use crate::{
    dfa::{Dfa, DfaState},
    fsm::{Nfa, StateSet},
};

/// Acceptance testing over a compiled automaton. Implementations never
/// mutate the automaton, so a single instance can be shared freely.
pub trait Matcher {
    type State;

    /// `true` iff the whole of `input` is in the language.
    fn accepts(&self, input: &str) -> bool;

    /// States visited while consuming `input`, starting with the start
    /// state. `None` when the run is cut short by a character the
    /// automaton cannot read.
    fn trace(&self, input: &str) -> Option<Vec<Self::State>>;
}

impl Matcher for Dfa {
    type State = DfaState;

    // characters outside the alphabet reject immediately
    fn accepts(&self, input: &str) -> bool {
        let mut current = self.start();
        for c in input.chars() {
            match self.next(current, c) {
                Some(next) => current = next,
                None => return false,
            }
        }
        self.is_accepting(current)
    }

    fn trace(&self, input: &str) -> Option<Vec<DfaState>> {
        let mut path = vec![self.start()];
        for c in input.chars() {
            let current = *path.last()?;
            path.push(self.next(current, c)?);
        }
        Some(path)
    }
}

impl Matcher for Nfa {
    type State = StateSet;

    fn accepts(&self, input: &str) -> bool {
        self.trace(input)
            .and_then(|path| path.last().map(|states| states.contains(&self.accept())))
            .unwrap_or(false)
    }

    fn trace(&self, input: &str) -> Option<Vec<StateSet>> {
        let mut path = vec![self.epsilon_closure(&StateSet::from([self.start()]))];
        for c in input.chars() {
            let current = path.last()?;
            let next = self.epsilon_closure(&self.step(current, c));
            if next.is_empty() {
                return None;
            }
            path.push(next);
        }
        Some(path)
    }
}
