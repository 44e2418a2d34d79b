use std::fs::File;
use std::io::{self, BufWriter, LineWriter, Read, Write as _};
use std::path::{Path, PathBuf};

use aggregate_buckets::{
    extract_aggregates_with, AggregateBucket, ExtractOptions, SearchResponse, DEFAULT_MAX_DEPTH,
    LOG_TARGET,
};
use anyhow::Context;
use clap::Parser;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Layer;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// The search response to read the aggregations from.
    ///
    /// The standard input is read when no path is given.
    input: Option<PathBuf>,

    /// The input is the `aggregations` section of a response rather than the whole response.
    #[arg(long)]
    raw: bool,

    /// How many levels of wrapping aggregations are walked through while looking for buckets.
    #[arg(long, env = "AGGREGATES_MAX_DEPTH", default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Indent the JSON output.
    #[arg(long)]
    pretty: bool,

    /// Which logs are written to the standard error.
    ///
    /// A bare level applies to the extraction logs only, `search::aggregates=trace` shows
    /// every skipped entry along with the time spent extracting.
    #[arg(long, default_value = "warn")]
    log_filter: String,
}

impl Cli {
    fn options(&self) -> ExtractOptions {
        ExtractOptions::default().max_depth(self.max_depth)
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    setup_logs(&cli.log_filter)?;

    let input = read_input(cli.input.as_deref())?;
    let buckets = extract(&input, cli.raw, &cli.options())?;
    tracing::debug!(target: LOG_TARGET, count = buckets.len(), "extracted aggregations");

    let mut writer = BufWriter::new(io::stdout().lock());
    write_buckets(&mut writer, &buckets, cli.pretty)?;
    writer.flush().context("while flushing the standard output")?;

    Ok(())
}

/// Parses the `--log-filter` argument, a bare level only targets the extraction logs.
fn log_filter(filter: &str) -> anyhow::Result<Targets> {
    match filter.parse::<tracing::level_filters::LevelFilter>() {
        Ok(level) => Ok(Targets::new().with_target(LOG_TARGET, level)),
        Err(_) => filter.parse().context("invalid --log-filter"),
    }
}

fn setup_logs(filter: &str) -> anyhow::Result<()> {
    let filter = log_filter(filter)?;

    let subscriber = tracing_subscriber::registry().with(
        tracing_subscriber::fmt::layer()
            .with_writer(|| LineWriter::new(io::stderr()))
            // prints the time spent in the extraction spans
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(filter),
    );
    tracing::subscriber::set_global_default(subscriber).context("could not setup logging")?;

    Ok(())
}

fn read_input(path: Option<&Path>) -> anyhow::Result<Vec<u8>> {
    let mut input = Vec::new();
    match path {
        Some(path) => {
            let mut file = File::open(path)
                .with_context(|| format!("while opening {}", path.display()))?;
            file.read_to_end(&mut input)
                .with_context(|| format!("while reading {}", path.display()))?;
        }
        None => {
            io::stdin().lock().read_to_end(&mut input).context("while reading the standard input")?;
        }
    }
    Ok(input)
}

fn extract(input: &[u8], raw: bool, options: &ExtractOptions) -> anyhow::Result<Vec<AggregateBucket>> {
    if raw {
        extract_aggregates_with(input, options).context("while extracting the aggregations")
    } else {
        let response = SearchResponse::from_slice(input).context("while decoding the search response")?;
        response.aggregates(options).context("while extracting the aggregations")
    }
}

fn write_buckets(
    writer: &mut impl io::Write,
    buckets: &[AggregateBucket],
    pretty: bool,
) -> anyhow::Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut *writer, buckets)?;
    } else {
        serde_json::to_writer(&mut *writer, buckets)?;
    }
    writeln!(writer)?;
    Ok(())
}
