use std::{fs::File, io, iter, path::Path};

use csv::{Terminator, WriterBuilder};
use log::debug;
use subset::Dfa;

use crate::{error::TableError, TableOptions, FINAL_MARKER};

pub fn write_dfa<W: io::Write>(
    writer: W,
    dfa: &Dfa,
    options: &TableOptions,
) -> Result<(), TableError> {
    let mut writer = WriterBuilder::new()
        .delimiter(options.delimiter)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(writer);
    let states = dfa.states();

    let markers = states
        .iter()
        .map(|state| if state.is_final() { FINAL_MARKER } else { "" });
    writer.write_record(iter::once("").chain(markers))?;

    let names = states.iter().map(|state| state.name());
    writer.write_record(iter::once("").chain(names))?;

    // targets of each state, one entry per symbol, blank = no transition
    let columns: Vec<Vec<&str>> = states
        .iter()
        .map(|state| {
            dfa.transitions(state)
                .map(|(_, next)| next.unwrap_or_default())
                .collect()
        })
        .collect();

    for (i, symbol) in dfa.alphabet().iter().enumerate() {
        let targets = columns.iter().map(|column| column[i]);
        writer.write_record(iter::once(symbol.as_str()).chain(targets))?;
    }

    writer.flush()?;
    debug!(
        "wrote dfa with {} states and {} symbols",
        states.len(),
        dfa.alphabet().len()
    );
    Ok(())
}

pub fn write_dfa_file(
    path: impl AsRef<Path>,
    dfa: &Dfa,
    options: &TableOptions,
) -> Result<(), TableError> {
    let file = File::create(path)?;
    write_dfa(file, dfa, options)
}
