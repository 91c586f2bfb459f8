use std::{
    collections::{HashMap, VecDeque},
    fmt,
};

use bit_set::BitSet;
use log::debug;
use petgraph::graph::{DiGraph, NodeIndex};
use subset_util::make_type_idx;

use crate::{error::FaError, nfa::Nfa};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DfaState {
    name: String,
    // underlying NFA states, in NFA declaration order
    nfa_states: Vec<String>,
    accepting: bool,
    // one entry per alphabet symbol, None = no transition
    transitions: Vec<Option<DfaStateIdx>>,
}

make_type_idx!(DfaStateIdx, DfaState);

impl DfaState {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn nfa_states(&self) -> &[String] {
        &self.nfa_states
    }

    pub fn is_final(&self) -> bool {
        self.accepting
    }
}

impl fmt::Display for DfaState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {{{}}}", self.name, self.nfa_states.join(", "))?;
        if self.accepting {
            write!(f, " (final)")?;
        }
        Ok(())
    }
}

/// Result of subset construction. States are kept in discovery order, the
/// start state is always the first one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dfa {
    alphabet: Vec<String>,
    states: Vec<DfaState>,
    names: HashMap<String, DfaStateIdx>,
}

pub fn determinize(nfa: &Nfa) -> Result<Dfa, FaError> {
    Dfa::from_nfa(nfa)
}

impl Nfa {
    pub fn determinize(&self) -> Result<Dfa, FaError> {
        Dfa::from_nfa(self)
    }
}

// per-call bookkeeping, nothing here outlives one construction
struct SubsetConstruction<'a> {
    nfa: &'a Nfa,
    states: Vec<DfaState>,
    // configuration -> id
    subsets: HashMap<BitSet, DfaStateIdx>,
    work_queue: VecDeque<(DfaStateIdx, BitSet)>,
}

impl<'a> SubsetConstruction<'a> {
    fn new(nfa: &'a Nfa) -> SubsetConstruction<'a> {
        SubsetConstruction {
            nfa,
            states: Vec::new(),
            subsets: HashMap::new(),
            work_queue: VecDeque::new(),
        }
    }

    // id of a closed, nonempty configuration, assigning the next name when
    // it hasn't been seen before
    fn state_for(&mut self, configuration: BitSet) -> DfaStateIdx {
        if let Some(id) = self.subsets.get(&configuration) {
            return *id;
        }

        let nfa = self.nfa;
        let state = DfaState {
            name: format!("S{}", self.states.len()),
            nfa_states: configuration
                .iter()
                .map(|i| nfa.states[i].name.clone())
                .collect(),
            accepting: !configuration.is_disjoint(&nfa.accept_states),
            transitions: vec![None; nfa.alphabet.len()],
        };
        debug!("discovered {}", state);

        let id = DfaStateIdx::from_push(&mut self.states, state);
        self.subsets.insert(configuration.clone(), id);
        self.work_queue.push_back((id, configuration));
        id
    }

    fn run(mut self, initial_configuration: BitSet) -> Dfa {
        self.state_for(initial_configuration);

        while let Some((id, q)) = self.work_queue.pop_front() {
            for symbol in 0..self.nfa.alphabet.len() {
                let mut t = self.nfa.delta(&q, symbol);
                self.nfa.close(&mut t);
                if t.is_empty() {
                    continue;
                }

                let next = self.state_for(t);
                self.states[id].transitions[symbol] = Some(next);
            }
        }

        let names = self
            .states
            .iter()
            .enumerate()
            .map(|(i, state)| (state.name.clone(), DfaStateIdx::new(i)))
            .collect();

        Dfa {
            alphabet: self.nfa.alphabet.clone(),
            states: self.states,
            names,
        }
    }
}

impl Dfa {
    // creates a DFA from an NFA using subset construction
    pub fn from_nfa(nfa: &Nfa) -> Result<Dfa, FaError> {
        let initial_state = nfa.initial_state.ok_or(FaError::EmptyAutomaton)?;

        let mut initial_configuration = nfa.empty_set();
        initial_configuration.insert(initial_state.index());
        nfa.close(&mut initial_configuration);

        let dfa = SubsetConstruction::new(nfa).run(initial_configuration);
        debug!(
            "subset construction: {} nfa states -> {} dfa states",
            nfa.len(),
            dfa.len()
        );

        Ok(dfa)
    }

    pub fn alphabet(&self) -> &[String] {
        &self.alphabet
    }

    pub fn states(&self) -> &[DfaState] {
        &self.states
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn start(&self) -> &DfaState {
        &self.states[0]
    }

    pub fn state(&self, name: &str) -> Option<&DfaState> {
        self.names.get(name).map(|id| &self.states[*id])
    }

    pub fn final_states(&self) -> impl Iterator<Item = &DfaState> {
        self.states.iter().filter(|state| state.accepting)
    }

    /// Target of `state` on `symbol`, `None` when there is no transition or
    /// either name is unknown.
    pub fn transition(&self, state: &str, symbol: &str) -> Option<&str> {
        let id = *self.names.get(state)?;
        let symbol = self.alphabet.iter().position(|x| x == symbol)?;
        self.states[id].transitions[symbol].map(|next| self.states[next].name.as_str())
    }

    /// One `(symbol, target)` pair per alphabet symbol, in alphabet order.
    pub fn transitions<'a>(
        &'a self,
        state: &'a DfaState,
    ) -> impl Iterator<Item = (&'a str, Option<&'a str>)> + 'a {
        self.alphabet
            .iter()
            .zip(&state.transitions)
            .map(|(symbol, next)| {
                (
                    symbol.as_str(),
                    next.map(|next| self.states[next].name.as_str()),
                )
            })
    }

    pub fn accepts<S: AsRef<str>>(&self, word: &[S]) -> bool {
        let mut state = DfaStateIdx::new(0);

        for symbol in word {
            let Some(symbol) = self.alphabet.iter().position(|x| x == symbol.as_ref()) else {
                return false;
            };
            match self.states[state].transitions[symbol] {
                Some(next) => state = next,
                None => return false,
            }
        }

        self.states[state].accepting
    }

    // nodes are labelled with the state and its subset, edges with the symbol
    pub fn to_graph(&self) -> DiGraph<String, String> {
        let mut graph = DiGraph::new();
        let nodes: Vec<NodeIndex> = self
            .states
            .iter()
            .map(|state| graph.add_node(state.to_string()))
            .collect();

        for (i, state) in self.states.iter().enumerate() {
            for (symbol, next) in self.alphabet.iter().zip(&state.transitions) {
                if let Some(next) = next {
                    graph.add_edge(nodes[i], nodes[next.index()], symbol.clone());
                }
            }
        }

        graph
    }
}
