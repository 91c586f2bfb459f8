use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FaError {
    #[error(
        "malformed automaton: transition {state} --{}--> {target} targets an undeclared state",
        .symbol.as_deref().unwrap_or("epsilon")
    )]
    DanglingTransition {
        state: String,
        // None = epsilon transition
        symbol: Option<String>,
        target: String,
    },
    #[error("malformed automaton: unknown state `{0}`")]
    UnknownState(String),
    #[error("automaton has no states")]
    EmptyAutomaton,
}

impl FaError {
    // dangling targets and unknown states both mean the NFA is inconsistent
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            FaError::DanglingTransition { .. } | FaError::UnknownState(_)
        )
    }
}
