use std::{fs::File, io, path::Path};

use csv::{ReaderBuilder, StringRecord, Trim};
use log::{debug, trace};
use subset::{Nfa, NfaBuilder};

use crate::{error::TableError, TableOptions, FINAL_MARKER, TARGET_SEPARATOR};

fn line_of(record: &StringRecord) -> u64 {
    record.position().map(|p| p.line()).unwrap_or_default()
}

// state names from the second row; trailing blank cells are just trailing delimiters
fn state_names(record: &StringRecord) -> Result<Vec<String>, TableError> {
    let mut cells: Vec<&str> = record.iter().skip(1).collect();
    while cells.last().is_some_and(|cell| cell.is_empty()) {
        cells.pop();
    }

    cells
        .into_iter()
        .enumerate()
        .map(|(i, cell)| {
            if cell.is_empty() {
                Err(TableError::EmptyStateName {
                    line: line_of(record),
                    column: i + 2,
                })
            } else {
                Ok(cell.to_string())
            }
        })
        .collect()
}

// pairs every cell after the first with its state column
fn state_cells<'r>(
    record: &'r StringRecord,
    states: &'r [String],
) -> impl Iterator<Item = Result<(&'r str, &'r str), TableError>> + 'r {
    record
        .iter()
        .skip(1)
        .enumerate()
        .filter(|(_, cell)| !cell.is_empty())
        .map(move |(i, cell)| match states.get(i) {
            Some(state) => Ok((state.as_str(), cell)),
            None => Err(TableError::ExtraCell {
                line: line_of(record),
                column: i + 2,
            }),
        })
}

pub fn read_nfa<R: io::Read>(reader: R, options: &TableOptions) -> Result<Nfa, TableError> {
    if char::from(options.delimiter) == TARGET_SEPARATOR {
        return Err(TableError::DelimiterClash(TARGET_SEPARATOR));
    }

    let mut reader = ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);
    let mut records = reader.records();

    let markers = records
        .next()
        .ok_or(TableError::MissingRow("final-state marker"))??;
    let names = records.next().ok_or(TableError::MissingRow("state name"))??;
    let states = state_names(&names)?;

    let mut builder = NfaBuilder::new();
    for state in &states {
        builder.state(state.as_str());
    }

    for cell in state_cells(&markers, &states) {
        let (state, marker) = cell?;
        if marker == FINAL_MARKER {
            builder.final_state(state);
        }
    }

    for record in records {
        let record = record?;
        let symbol = record.get(0).unwrap_or_default();
        if symbol.is_empty() {
            if record.iter().any(|cell| !cell.is_empty()) {
                return Err(TableError::MissingSymbol {
                    line: line_of(&record),
                });
            }
            continue;
        }

        let epsilon = symbol == options.epsilon;
        if !epsilon {
            builder.symbol(symbol);
        }

        for cell in state_cells(&record, &states) {
            let (state, targets) = cell?;
            let targets = targets
                .split(TARGET_SEPARATOR)
                .map(str::trim)
                .filter(|t| !t.is_empty());
            for target in targets {
                trace!("{} --{}--> {}", state, symbol, target);
                if epsilon {
                    builder.epsilon(state, target);
                } else {
                    builder.transition(state, symbol, target);
                }
            }
        }
    }

    if let Some(start) = &options.start {
        builder.start(start.as_str());
    }

    let nfa = builder.build()?;
    debug!(
        "read nfa with {} states over {:?}, start {:?}",
        nfa.len(),
        nfa.alphabet(),
        nfa.start()
    );

    Ok(nfa)
}

pub fn read_nfa_file(path: impl AsRef<Path>, options: &TableOptions) -> Result<Nfa, TableError> {
    let file = File::open(path)?;
    read_nfa(file, options)
}
