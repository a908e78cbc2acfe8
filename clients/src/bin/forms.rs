//! `weilrep-forms`: inspect quasimodular forms and lattice data from the command line.
//!
//! **Usage:**
//! ```text
//! weilrep-forms eisenstein [--precision <N>] [--derivatives <K>]
//! weilrep-forms lattice --gram "2,-1;-1,2"
//! weilrep-forms --format json lattice --gram "-2"
//! ```
//!
//! `eisenstein` prints the `K`-fold derivative of `E_2` together with its
//! almost-holomorphic completion. `lattice` prints the discriminant-group
//! cells of a Gram matrix.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use weilrep::eisenstein::eisenstein_e2;
use weilrep::{Cell, GramMatrix, WeilRep};

/// Inspect quasimodular forms and lattice data.
#[derive(Parser)]
#[command(name = "weilrep-forms", version, about = "Quasimodular form calculator")]
struct Cli {
    /// Output format.
    #[arg(long, global = true, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Minimum level of log events written to stderr.
    #[arg(long, global = true, default_value = "warn")]
    log_level: tracing::Level,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Derivatives of E2 and their completions
    Eisenstein {
        /// Precision of the q-expansions
        #[arg(long, default_value_t = 10)]
        precision: i64,

        /// Number of times the raising operator is applied
        #[arg(long, default_value_t = 0)]
        derivatives: usize,
    },

    /// Discriminant-group cells of a Gram matrix
    Lattice {
        /// Rows separated by ';', entries by ','
        #[arg(long, allow_hyphen_values = true)]
        gram: String,
    },
}

#[derive(Serialize)]
struct QuasiReport {
    weight: String,
    depth: usize,
    terms: Vec<String>,
    completion: Vec<String>,
}

#[derive(Serialize)]
struct LatticeReport<'a> {
    gram: &'a GramMatrix,
    determinant: i128,
    cells: &'a [Cell],
}

fn parse_gram(text: &str) -> Result<GramMatrix> {
    let rows = text
        .split(';')
        .map(|row| {
            row.split(',')
                .map(|entry| {
                    entry
                        .trim()
                        .parse::<i64>()
                        .with_context(|| format!("invalid Gram matrix entry {entry:?}"))
                })
                .collect::<Result<Vec<_>>>()
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(GramMatrix::new(rows)?)
}

fn eisenstein(format: Format, precision: i64, derivatives: usize) -> Result<()> {
    let mut f = eisenstein_e2(precision).context("building E2")?;
    for i in 0..derivatives {
        f = f
            .derivative()
            .with_context(|| format!("applying derivative {}", i + 1))?;
    }
    let completion = f.completion();
    match format {
        Format::Text => {
            println!("weight {}, depth {}", f.weight(), f.depth());
            println!("{completion}");
        }
        Format::Json => {
            let report = QuasiReport {
                weight: f.weight().to_string(),
                depth: f.depth(),
                terms: f.terms().iter().map(ToString::to_string).collect(),
                completion: completion.iter().map(ToString::to_string).collect(),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}

fn lattice(format: Format, gram: &str) -> Result<()> {
    let gram = parse_gram(gram)?;
    let w = WeilRep::new(gram).context("enumerating the discriminant group")?;
    match format {
        Format::Text => {
            println!("Gram matrix {}", w.gram_matrix());
            println!("{} cells", w.len());
            for cell in w.cells() {
                let vector: Vec<String> = cell.vector().iter().map(ToString::to_string).collect();
                println!("({})  offset {}", vector.join(", "), cell.offset());
            }
        }
        Format::Json => {
            let report = LatticeReport {
                gram: w.gram_matrix(),
                determinant: w.gram_matrix().determinant(),
                cells: w.cells(),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive(cli.log_level.into()))
        .init();

    match cli.command {
        Command::Eisenstein {
            precision,
            derivatives,
        } => eisenstein(cli.format, precision, derivatives),
        Command::Lattice { gram } => lattice(cli.format, &gram),
    }
}
