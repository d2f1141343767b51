use clap::Parser;
use poptree::chart::{self, DEFAULT_TITLE, DEFAULT_VALUE_COLUMN};
use poptree::pipeline::{self, PipelineConfig, Summary, DEFAULT_OUTPUT, DEFAULT_SOURCE};
use poptree::report::Format;
use poptree::TreemapSpec;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "poptree")]
#[command(author, version, about = "Render world population as a static treemap page")]
struct Args {
    /// CSV to chart: an http(s) URL or a local file
    #[arg(default_value = DEFAULT_SOURCE)]
    source: String,

    /// Output file (.html, or .json for the bare figure)
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Numeric column that sizes the cells
    #[arg(long, default_value = DEFAULT_VALUE_COLUMN)]
    value_column: String,

    /// Chart title
    #[arg(long, default_value = DEFAULT_TITLE)]
    title: String,

    /// Remove exact duplicate rows before charting (default: only count them)
    #[arg(long)]
    drop_duplicates: bool,

    /// Open the written page in the default browser
    #[arg(long)]
    open: bool,

    /// Show detailed cleaning and chart statistics
    #[arg(short, long)]
    verbose: bool,

    /// Only show errors and the final message
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    let args = Args::parse();

    let config = PipelineConfig {
        source: args.source.clone(),
        output: args.output.clone(),
        spec: TreemapSpec {
            values: args.value_column.clone(),
            title: args.title.clone(),
            ..TreemapSpec::default()
        },
        drop_duplicates: args.drop_duplicates,
        progress: !args.quiet,
    };

    if !args.quiet {
        eprintln!("\x1b[1mPoptree - Population Treemap\x1b[0m");
        eprintln!("{}", "─".repeat(70));
        eprintln!("Source: {}\n", config.source);
    }

    let summary = match pipeline::run(&config) {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("\x1b[31mError:\x1b[0m {}", e);
            std::process::exit(1);
        }
    };

    if !args.quiet {
        print_summary(&summary, &config, args.verbose);
    }

    let kind = match Format::from_path(&config.output) {
        Format::Html => "HTML",
        Format::Json => "JSON",
    };
    println!(
        "{} file '{}' has been created. You can now push this to GitHub Pages.",
        kind,
        config.output.display()
    );

    if args.open {
        if let Err(e) = open::that(&config.output) {
            eprintln!("Failed to open {}: {}", config.output.display(), e);
        }
    }
}

fn print_summary(summary: &Summary, config: &PipelineConfig, verbose: bool) {
    eprintln!(
        "Charted {} of {} rows, total {}: {}",
        summary.charted,
        summary.rows,
        config.spec.values,
        chart::format_thousands(summary.total)
    );

    if summary.duplicates > 0 {
        let action = if summary.duplicates_dropped { "dropped" } else { "kept" };
        eprintln!(
            "  \x1b[33m{} duplicate row(s) {}\x1b[0m",
            summary.duplicates, action
        );
    }

    if verbose {
        eprintln!("  Filled {} missing cell(s) from earlier rows", summary.filled);
        for (column, count) in &summary.unresolved {
            eprintln!(
                "  \x1b[90m{} leading missing value(s) in '{}' left empty\x1b[0m",
                count, column
            );
        }
        eprintln!("  Treemap nodes: {}", summary.nodes);
    }

    eprintln!("{}", "─".repeat(70));
}
