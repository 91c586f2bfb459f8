use std::{fs, path::PathBuf};

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use log::{info, LevelFilter};
use petgraph::dot::Dot;
use subset_csv::{read_nfa_file, write_dfa_file, TableOptions, EPSILON, TARGET_SEPARATOR};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// transition table in the input layout
    Csv,
    /// graphviz digraph of the DFA
    Dot,
}

/// Turns an NFA transition table into an equivalent DFA by subset construction
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// NFA transition table to read
    #[arg(default_value = "input.csv")]
    input: PathBuf,

    /// where to write the DFA
    #[arg(default_value = "out.csv")]
    output: PathBuf,

    /// start state, defaults to the first state column
    #[arg(long)]
    start: Option<String>,

    /// symbol that marks epsilon rows
    #[arg(long, default_value = EPSILON)]
    epsilon: String,

    /// cell separator, must be ASCII and not a comma
    #[arg(long, default_value_t = ';')]
    delimiter: char,

    #[arg(long, value_enum, default_value_t = Format::Csv)]
    format: Format,

    /// log more, repeat for more detail
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn table_options(&self) -> Result<TableOptions> {
        if !self.delimiter.is_ascii() {
            bail!("delimiter {:?} is not an ASCII character", self.delimiter);
        }
        if self.delimiter == TARGET_SEPARATOR {
            bail!(
                "delimiter {:?} would clash with the target separator inside cells",
                self.delimiter
            );
        }

        Ok(TableOptions {
            delimiter: self.delimiter as u8,
            epsilon: self.epsilon.clone(),
            start: self.start.clone(),
        })
    }

    fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.log_level())
        .parse_default_env()
        .init();

    let options = args.table_options()?;
    let nfa = read_nfa_file(&args.input, &options)
        .with_context(|| format!("failed to read NFA from {}", args.input.display()))?;
    info!(
        "read {} states over {} symbols from {}",
        nfa.len(),
        nfa.alphabet().len(),
        args.input.display()
    );

    let dfa = nfa.determinize().context("failed to determinize")?;

    let written = match args.format {
        Format::Csv => write_dfa_file(&args.output, &dfa, &options),
        Format::Dot => {
            let graph = dfa.to_graph();
            fs::write(&args.output, Dot::new(&graph).to_string()).map_err(Into::into)
        }
    };
    written.with_context(|| format!("failed to write DFA to {}", args.output.display()))?;

    println!("Wrote {}, {} states", args.output.display(), dfa.len());
    Ok(())
}
