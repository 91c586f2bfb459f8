use std::collections::{HashMap, HashSet};

use bit_set::BitSet;
use log::trace;
use subset_util::make_type_idx;

use crate::error::FaError;

// states are interned to indices so that a set of states is just a BitSet,
// which hashes and compares by content
#[derive(Debug, Clone)]
pub(crate) struct NfaState {
    pub(crate) name: String,
    // one target set per alphabet symbol, in alphabet order
    pub(crate) transitions: Vec<BitSet>,
    pub(crate) epsilon: BitSet,
}

make_type_idx!(NfaStateIdx, NfaState);

/// A nondeterministic finite automaton over string symbols, with
/// epsilon-transitions. Built with [`NfaBuilder`] and immutable afterwards.
#[derive(Debug, Clone)]
pub struct Nfa {
    pub(crate) states: Vec<NfaState>,
    pub(crate) names: HashMap<String, NfaStateIdx>,
    // first-seen order, epsilon never appears here
    pub(crate) alphabet: Vec<String>,
    pub(crate) accept_states: BitSet,
    // None only when there are no states at all
    pub(crate) initial_state: Option<NfaStateIdx>,
}

/// A set of states of one particular [`Nfa`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StateSet {
    members: BitSet,
}

impl StateSet {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn is_subset(&self, other: &StateSet) -> bool {
        self.members.is_subset(&other.members)
    }

    /// Member names in declaration order. `nfa` must be the automaton the set
    /// was taken from.
    pub fn names<'a>(&'a self, nfa: &'a Nfa) -> impl Iterator<Item = &'a str> + 'a {
        self.members.iter().map(move |i| nfa.states[i].name.as_str())
    }
}

impl Nfa {
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn states(&self) -> impl Iterator<Item = &str> {
        self.states.iter().map(|state| state.name.as_str())
    }

    pub fn alphabet(&self) -> &[String] {
        &self.alphabet
    }

    pub fn start(&self) -> Option<&str> {
        self.initial_state.map(|idx| self.states[idx].name.as_str())
    }

    pub fn is_final(&self, name: &str) -> bool {
        self.names
            .get(name)
            .is_some_and(|idx| self.accept_states.contains(idx.index()))
    }

    pub fn final_states(&self) -> impl Iterator<Item = &str> {
        self.accept_states
            .iter()
            .map(|i| self.states[i].name.as_str())
    }

    /// Direct targets of `state` on `symbol`. A symbol outside the alphabet
    /// has no targets.
    pub fn targets(&self, state: &str, symbol: &str) -> Result<StateSet, FaError> {
        let idx = self.lookup(state)?;
        let members = match self.symbol_index(symbol) {
            Some(symbol) => self.states[idx].transitions[symbol].clone(),
            None => self.empty_set(),
        };
        Ok(StateSet { members })
    }

    pub fn epsilon_targets(&self, state: &str) -> Result<StateSet, FaError> {
        let idx = self.lookup(state)?;
        Ok(StateSet {
            members: self.states[idx].epsilon.clone(),
        })
    }

    /// Every state reachable from `states` through zero or more
    /// epsilon-transitions.
    pub fn epsilon_closure<I, S>(&self, states: I) -> Result<StateSet, FaError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut members = self.empty_set();
        for name in states {
            members.insert(self.lookup(name.as_ref())?.index());
        }

        self.close(&mut members);
        Ok(StateSet { members })
    }

    /// Runs the automaton over `word` directly, tracking the closed set of
    /// active states.
    pub fn accepts<S: AsRef<str>>(&self, word: &[S]) -> bool {
        let Some(initial_state) = self.initial_state else {
            return false;
        };

        let mut current = self.empty_set();
        current.insert(initial_state.index());
        self.close(&mut current);

        for symbol in word {
            let Some(symbol) = self.symbol_index(symbol.as_ref()) else {
                return false;
            };
            current = self.delta(&current, symbol);
            self.close(&mut current);
            if current.is_empty() {
                return false;
            }
        }

        !current.is_disjoint(&self.accept_states)
    }

    pub(crate) fn lookup(&self, name: &str) -> Result<NfaStateIdx, FaError> {
        self.names
            .get(name)
            .copied()
            .ok_or_else(|| FaError::UnknownState(name.to_string()))
    }

    pub(crate) fn symbol_index(&self, symbol: &str) -> Option<usize> {
        self.alphabet.iter().position(|x| x == symbol)
    }

    // every set gets the same capacity so equal contents mean equal sets
    pub(crate) fn empty_set(&self) -> BitSet {
        BitSet::with_capacity(self.states.len())
    }

    // worklist closure; the set only grows, so epsilon cycles terminate
    pub(crate) fn close(&self, set: &mut BitSet) {
        let mut stack: Vec<usize> = set.iter().collect();

        while let Some(i) = stack.pop() {
            for next in self.states[i].epsilon.iter() {
                if set.insert(next) {
                    stack.push(next);
                }
            }
        }

        trace!("epsilon closure = {:?}", set);
    }

    // union of direct targets on one symbol, not closed
    pub(crate) fn delta(&self, set: &BitSet, symbol: usize) -> BitSet {
        let mut result = self.empty_set();

        for i in set.iter() {
            result.union_with(&self.states[i].transitions[symbol]);
        }

        result
    }
}

#[derive(Debug, Clone)]
struct PendingTransition {
    state: String,
    // None = epsilon
    symbol: Option<String>,
    target: String,
}

/// Collects states, symbols and transitions by name. Target states are
/// resolved in [`NfaBuilder::build`], so they may be declared after the
/// transitions that mention them.
#[derive(Debug, Clone, Default)]
pub struct NfaBuilder {
    states: Vec<String>,
    declared: HashSet<String>,
    alphabet: Vec<String>,
    transitions: Vec<PendingTransition>,
    finals: Vec<String>,
    start: Option<String>,
}

impl NfaBuilder {
    pub fn new() -> NfaBuilder {
        NfaBuilder::default()
    }

    /// Declares a state. Declaring the same name twice is a no-op.
    pub fn state(&mut self, name: impl Into<String>) -> &mut Self {
        let name = name.into();
        if self.declared.insert(name.clone()) {
            self.states.push(name);
        }
        self
    }

    /// Declares `name` and marks it final.
    pub fn final_state(&mut self, name: impl Into<String>) -> &mut Self {
        let name = name.into();
        self.state(name.clone());
        self.finals.push(name);
        self
    }

    /// Chooses the start state. It must be declared by the time the
    /// automaton is built; without a call the first declared state is used.
    pub fn start(&mut self, name: impl Into<String>) -> &mut Self {
        self.start = Some(name.into());
        self
    }

    /// Adds a symbol to the alphabet even if no transition uses it.
    pub fn symbol(&mut self, symbol: impl Into<String>) -> &mut Self {
        let symbol = symbol.into();
        if !self.alphabet.contains(&symbol) {
            self.alphabet.push(symbol);
        }
        self
    }

    pub fn transition(
        &mut self,
        state: impl Into<String>,
        symbol: impl Into<String>,
        target: impl Into<String>,
    ) -> &mut Self {
        let state = state.into();
        let symbol = symbol.into();
        self.state(state.clone());
        self.symbol(symbol.clone());
        self.transitions.push(PendingTransition {
            state,
            symbol: Some(symbol),
            target: target.into(),
        });
        self
    }

    pub fn epsilon(&mut self, state: impl Into<String>, target: impl Into<String>) -> &mut Self {
        let state = state.into();
        self.state(state.clone());
        self.transitions.push(PendingTransition {
            state,
            symbol: None,
            target: target.into(),
        });
        self
    }

    pub fn build(&self) -> Result<Nfa, FaError> {
        let capacity = self.states.len();
        let mut states: Vec<NfaState> = Vec::with_capacity(capacity);
        let mut names: HashMap<String, NfaStateIdx> = HashMap::with_capacity(capacity);

        for name in &self.states {
            let state = NfaState {
                name: name.clone(),
                transitions: vec![BitSet::with_capacity(capacity); self.alphabet.len()],
                epsilon: BitSet::with_capacity(capacity),
            };
            let idx = NfaStateIdx::from_push(&mut states, state);
            names.insert(name.clone(), idx);
        }

        for pending in &self.transitions {
            let Some(target) = names.get(&pending.target).copied() else {
                return Err(FaError::DanglingTransition {
                    state: pending.state.clone(),
                    symbol: pending.symbol.clone(),
                    target: pending.target.clone(),
                });
            };

            // the source was declared when the transition was added
            let state = &mut states[names[&pending.state]];
            match &pending.symbol {
                Some(symbol) => {
                    let symbol = self
                        .alphabet
                        .iter()
                        .position(|x| x == symbol)
                        .expect("transition symbols are added to the alphabet");
                    state.transitions[symbol].insert(target.index());
                }
                None => {
                    state.epsilon.insert(target.index());
                }
            }
        }

        let mut accept_states = BitSet::with_capacity(capacity);
        for name in &self.finals {
            accept_states.insert(names[name].index());
        }

        let initial_state = match &self.start {
            Some(name) => Some(
                names
                    .get(name)
                    .copied()
                    .ok_or_else(|| FaError::UnknownState(name.clone()))?,
            ),
            None if states.is_empty() => None,
            None => Some(NfaStateIdx::new(0)),
        };

        trace!(
            "built nfa: {} states, alphabet {:?}",
            states.len(),
            self.alphabet
        );

        Ok(Nfa {
            states,
            names,
            alphabet: self.alphabet.clone(),
            accept_states,
            initial_state,
        })
    }
}
