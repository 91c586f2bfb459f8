// transition tables as `;`-separated text:
//
//   ;F;;F          final markers, one per state column
//   ;q0;q1;q2      state names
//   a;q0,q1;;q2    one row per symbol, comma-separated targets per state
//   ε;;q2;         epsilon rows use the epsilon marker as their symbol
//
// the DFA is written back in the same layout

mod error;
mod reader;
mod writer;


pub use error::TableError;
pub use reader::{read_nfa, read_nfa_file};
pub use writer::{write_dfa, write_dfa_file};

pub const EPSILON: &str = "ε";
pub const FINAL_MARKER: &str = "F";
// separates targets inside a cell, so it can't also separate cells
pub const TARGET_SEPARATOR: char = ',';

#[derive(Debug, Clone)]
pub struct TableOptions {
    pub delimiter: u8,
    pub epsilon: String,
    // overrides the first state column as start state
    pub start: Option<String>,
}

impl Default for TableOptions {
    fn default() -> Self {
        TableOptions {
            delimiter: b';',
            epsilon: EPSILON.to_string(),
            start: None,
        }
    }
}
