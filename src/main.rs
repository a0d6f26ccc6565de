use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use xtree::{Config, FormatConfig, JoinPolicy, Operation, Options};

#[derive(Debug, Parser)]
#[command(
    name = "xtree",
    version,
    about = "Run a tree transform over an XML (or CSV) document"
)]
struct Args {
    /// Transform to run
    #[arg(value_enum)]
    operation: OperationArg,
    /// Input file (defaults to stdin)
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,
    /// Output file (defaults to stdout)
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,
    /// Write XML output on a single line
    #[arg(long)]
    compact: bool,
    /// Maximum element nesting depth (0 means unlimited)
    #[arg(long, default_value_t = Config::default().max_depth)]
    max_depth: u16,
    /// Maximum input size in bytes (0 means unlimited)
    #[arg(long, default_value_t = Config::default().max_size)]
    max_size: usize,
    /// Fail orders-value when an order names an unknown product
    #[arg(long)]
    strict_join: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OperationArg {
    Hierarchy,
    PurchaseOrders,
    CustomersCsv,
    Concat,
    Contacts,
    Channels,
    SortCustomers,
    OrdersValue,
    Flatten,
}

impl From<OperationArg> for Operation {
    fn from(value: OperationArg) -> Self {
        match value {
            OperationArg::Hierarchy => Self::Hierarchy,
            OperationArg::PurchaseOrders => Self::PurchaseOrders,
            OperationArg::CustomersCsv => Self::CustomersFromCsv,
            OperationArg::Concat => Self::Concatenation,
            OperationArg::Contacts => Self::Contacts,
            OperationArg::Channels => Self::Channels,
            OperationArg::SortCustomers => Self::SortCustomers,
            OperationArg::OrdersValue => Self::OrdersValue,
            OperationArg::Flatten => Self::Flatten,
        }
    }
}

impl Args {
    fn options(&self) -> Options {
        Options {
            parser: Config::new(self.max_depth, self.max_size),
            format: if self.compact {
                FormatConfig::compact()
            } else {
                FormatConfig::default()
            },
            join: if self.strict_join {
                JoinPolicy::Strict
            } else {
                JoinPolicy::Inner
            },
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();

    if let Err(e) = run() {
        error!("{e:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = Args::parse();
    let operation = Operation::from(args.operation);
    debug!(%operation, input = ?args.input, "running transform");

    let input = read_input(&args.input)?;
    let output = operation
        .run_with(&input, &args.options())
        .with_context(|| format!("{operation} failed"))?;

    let mut rendered = output.to_string();
    if !rendered.is_empty() {
        rendered.push('\n');
    }
    write_output(&args.output, rendered.as_bytes())
}

fn read_input(path: &Option<PathBuf>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read input file {}", path.display())),
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read stdin")?;
            if buffer.trim().is_empty() {
                bail!("no input provided on stdin");
            }
            Ok(buffer)
        }
    }
}

fn write_output(path: &Option<PathBuf>, data: &[u8]) -> Result<()> {
    match path {
        Some(path) => std::fs::write(path, data)
            .with_context(|| format!("failed to write output file {}", path.display())),
        None => {
            let mut stdout = io::stdout();
            stdout.write_all(data).context("failed to write stdout")?;
            Ok(())
        }
    }
}
