mod dfa;
mod error;
mod nfa;


pub use dfa::{determinize, Dfa, DfaState};
pub use error::FaError;
pub use nfa::{Nfa, NfaBuilder, StateSet};
