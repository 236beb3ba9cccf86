use std::path::PathBuf;
use std::process;

use arrow::util::pretty::pretty_format_batches;
use clap::{Args, Parser, Subcommand, ValueEnum};
use rowcast::{
    ColumnOrder, ColumnStore, ColumnStoreConfig, ColumnarExporter, ExportOptions, IngestOptions,
    RaggedPolicy, Result, SourceIngestor, TextSource, TextSourceOptions,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "rowcast",
    version,
    about = "Load a text table into a typed column store and save it as an Arrow IPC file"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Ingest a table and write it as an Arrow IPC (Feather v2) file.
    Convert(ConvertArgs),
    /// Ingest a table and print its column structure.
    Describe(DescribeArgs),
}

#[derive(Args)]
struct SourceArgs {
    /// Text table whose first line is a leaf list such as `run/I:th_x/F:valid/O`.
    #[arg(value_name = "INPUT")]
    input: PathBuf,
    /// Table name to read (defaults to the input file stem).
    #[arg(long)]
    table: Option<String>,
    /// Cell delimiter (defaults to whitespace).
    #[arg(long)]
    delimiter: Option<char>,
    /// Refuse rows in which some column was not written.
    #[arg(long)]
    strict: bool,
    /// Stop after this many rows.
    #[arg(long, value_name = "N")]
    max_rows: Option<u64>,
}

#[derive(Args)]
struct ConvertArgs {
    #[command(flatten)]
    source: SourceArgs,
    /// Destination file.
    #[arg(long, short, value_name = "FILE")]
    output: PathBuf,
    /// Column order of the output schema.
    #[arg(long, value_enum, default_value_t = OrderArg::Lexicographic)]
    order: OrderArg,
    /// Export text columns instead of skipping them.
    #[arg(long)]
    include_text: bool,
    /// Fail instead of padding columns that hold fewer values than there are rows.
    #[arg(long)]
    reject_ragged: bool,
}

#[derive(Args)]
struct DescribeArgs {
    #[command(flatten)]
    source: SourceArgs,
    /// Also print the first N rows.
    #[arg(long, value_name = "N", default_value_t = 0)]
    head: usize,
}

#[derive(Clone, Copy, ValueEnum)]
enum OrderArg {
    Lexicographic,
    Declaration,
}

impl From<OrderArg> for ColumnOrder {
    fn from(order: OrderArg) -> Self {
        match order {
            OrderArg::Lexicographic => ColumnOrder::Lexicographic,
            OrderArg::Declaration => ColumnOrder::Declaration,
        }
    }
}

#[allow(clippy::print_stderr)]
fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli.command) {
        tracing::error!("{err}");
        eprintln!("error: {err}");
        process::exit(1);
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Convert(args) => convert(args),
        Command::Describe(args) => describe(args),
    }
}

fn load(args: &SourceArgs) -> Result<ColumnStore> {
    let options = TextSourceOptions {
        delimiter: args.delimiter,
        table_name: args.table.clone(),
        ..TextSourceOptions::default()
    };
    let source = TextSource::open(&args.input, options)?;
    let store_config = if args.strict {
        ColumnStoreConfig::strict()
    } else {
        ColumnStoreConfig::default()
    };
    let ingestor = SourceIngestor::new(IngestOptions {
        max_rows: args.max_rows,
        store_config,
        ..IngestOptions::default()
    });
    ingestor.ingest(&source, source.table_name())
}

#[allow(clippy::print_stdout)]
fn convert(args: ConvertArgs) -> Result<()> {
    let store = load(&args.source)?;
    println!("{store}");

    let options = ExportOptions {
        column_order: args.order.into(),
        ragged: if args.reject_ragged {
            RaggedPolicy::Reject
        } else {
            RaggedPolicy::PadWithNulls
        },
        include_text: args.include_text,
    };
    let summary = ColumnarExporter::with_options(&store, options).write_to_path(&args.output)?;
    println!(
        "Saved {} rows ({} columns) to {}",
        summary.rows,
        summary.columns.len(),
        args.output.display()
    );
    Ok(())
}

#[allow(clippy::print_stdout)]
fn describe(args: DescribeArgs) -> Result<()> {
    let store = load(&args.source)?;
    println!("{store}");

    if args.head > 0 {
        let batch = ColumnarExporter::new(&store).build_record_batch()?;
        let head = batch.slice(0, args.head.min(batch.num_rows()));
        println!("{}", pretty_format_batches(&[head])?);
    }
    Ok(())
}
