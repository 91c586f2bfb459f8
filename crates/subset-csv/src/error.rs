use std::io;

use subset::FaError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("failed to read or write table: {0}")]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("delimiter {0:?} is already used to separate targets inside a cell")]
    DelimiterClash(char),
    #[error("table is missing the {0} row")]
    MissingRow(&'static str),
    #[error("line {line}: state column {column} has no name")]
    EmptyStateName { line: u64, column: usize },
    #[error("line {line}: column {column} is past the last state column")]
    ExtraCell { line: u64, column: usize },
    #[error("line {line}: targets listed without a symbol")]
    MissingSymbol { line: u64 },
    #[error(transparent)]
    Automaton(#[from] FaError),
}
