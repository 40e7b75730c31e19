//! salarypdf CLI - salary report PDF to CSV tool

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use salarypdf::convert::{FIRST_YEAR, LAST_YEAR};
use salarypdf::{
    inspect_page, inspect_report, to_json, CombineSummary, JsonFormat, LayoutOptions,
    ReportConverter, SalaryPdf, YearSummary,
};

type CliResult = Result<(), Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "salarypdf")]
#[command(version)]
#[command(about = "Convert yearly salary report PDFs to CSV and combine them", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert yearly report PDFs to CSV
    Convert {
        #[command(flatten)]
        data: DataArgs,

        #[command(flatten)]
        convert: ConvertArgs,
    },

    /// Combine yearly CSVs into one file
    Combine {
        #[command(flatten)]
        data: DataArgs,

        #[command(flatten)]
        combine: CombineArgs,
    },

    /// Convert, then combine
    Run {
        #[command(flatten)]
        data: DataArgs,

        #[command(flatten)]
        convert: ConvertArgs,

        #[command(flatten)]
        combine: CombineArgs,
    },

    /// Dump the inferred table layout of a report as JSON
    Inspect {
        /// Report PDF
        #[arg(value_name = "PDF")]
        input: PathBuf,

        /// Report year (selects the page layout)
        #[arg(long)]
        year: i32,

        /// Page to inspect (all pages if not specified)
        #[arg(long)]
        page: Option<u32>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show version information
    Version,
}

#[derive(Args)]
struct DataArgs {
    /// Data directory holding pdfs/ and csvs/
    #[arg(long, env = "SALARYPDF_DATA_DIR", default_value = "data", value_name = "DIR")]
    data_dir: PathBuf,
}

#[derive(Args)]
struct ConvertArgs {
    /// First year to convert
    #[arg(long, default_value_t = FIRST_YEAR)]
    from: i32,

    /// Last year to convert
    #[arg(long, default_value_t = LAST_YEAR)]
    to: i32,

    /// Skip pages whose table cannot be read instead of failing
    #[arg(long)]
    lenient: bool,

    /// Convert one year at a time
    #[arg(long)]
    sequential: bool,
}

#[derive(Args)]
struct CombineArgs {
    /// Combined CSV path (defaults to <DATA_DIR>/combined_csv.csv)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Write the combined CSV without a UTF-8 byte order mark
    #[arg(long)]
    no_bom: bool,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Convert { data, convert } => cmd_convert(&pipeline(&data, Some(&convert), None)),
        Commands::Combine { data, combine } => cmd_combine(&pipeline(&data, None, Some(&combine))),
        Commands::Run {
            data,
            convert,
            combine,
        } => cmd_run(&pipeline(&data, Some(&convert), Some(&combine))),
        Commands::Inspect {
            input,
            year,
            page,
            compact,
        } => cmd_inspect(&input, year, page, compact),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn pipeline(
    data: &DataArgs,
    convert: Option<&ConvertArgs>,
    combine: Option<&CombineArgs>,
) -> SalaryPdf {
    log::debug!("Data directory: {}", data.data_dir.display());
    let mut pipeline = SalaryPdf::new(&data.data_dir);

    if let Some(args) = convert {
        pipeline = pipeline.with_years(args.from..=args.to);
        if args.lenient {
            pipeline = pipeline.lenient();
        }
        if args.sequential {
            pipeline = pipeline.sequential();
        }
    }

    if let Some(args) = combine {
        if let Some(ref output) = args.output {
            pipeline = pipeline.with_output(output);
        }
        if args.no_bom {
            pipeline = pipeline.without_bom();
        }
    }

    pipeline
}

fn spinner(message: impl Into<String>) -> Result<ProgressBar, Box<dyn std::error::Error>> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(message.into());
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(pb)
}

fn convert_years(pipeline: &SalaryPdf) -> Result<Vec<YearSummary>, Box<dyn std::error::Error>> {
    let options = pipeline.convert_options();
    let pb = spinner(format!(
        "Converting {}..={}...",
        options.years.start(),
        options.years.end()
    ))?;

    let summaries = if options.parallel {
        pipeline.convert()
    } else {
        // One year at a time so the spinner can follow along.
        let converter = ReportConverter::new(options.clone());
        options
            .years
            .clone()
            .map(|year| {
                pb.set_message(format!("Converting {}...", year));
                converter.convert_year(year)
            })
            .collect()
    };

    match summaries {
        Ok(summaries) => {
            pb.finish_and_clear();
            Ok(summaries)
        }
        Err(e) => {
            pb.abandon();
            Err(e.into())
        }
    }
}

fn print_years(summaries: &[YearSummary]) {
    println!("{}", "Converted".green().bold());
    for (i, summary) in summaries.iter().enumerate() {
        let branch = if i + 1 == summaries.len() { "└─" } else { "├─" };
        let mut line = format!(
            "  {} {}: {} rows from {} pages -> {}",
            branch.dimmed(),
            summary.year.to_string().bold(),
            summary.rows,
            summary.pages,
            summary.output.display()
        );
        if !summary.skipped_pages.is_empty() {
            let skipped = format!("(skipped pages {:?})", summary.skipped_pages);
            line.push_str(&format!(" {}", skipped.yellow()));
        }
        println!("{}", line);
    }
}

fn print_combined(summary: &CombineSummary) {
    println!(
        "{} {} rows from {} files ({} columns)",
        "Combined".green().bold(),
        summary.rows,
        summary.files.len(),
        summary.columns.len()
    );
    println!("{} {}", "Saved to".green(), summary.output.display());
}

fn cmd_convert(pipeline: &SalaryPdf) -> CliResult {
    let summaries = convert_years(pipeline)?;
    print_years(&summaries);
    Ok(())
}

fn cmd_combine(pipeline: &SalaryPdf) -> CliResult {
    let pb = spinner("Combining CSVs...")?;
    let summary = pipeline.combine();
    pb.finish_and_clear();

    print_combined(&summary?);
    Ok(())
}

fn cmd_run(pipeline: &SalaryPdf) -> CliResult {
    cmd_convert(pipeline)?;
    println!();
    cmd_combine(pipeline)
}

fn cmd_inspect(input: &Path, year: i32, page: Option<u32>, compact: bool) -> CliResult {
    let options = LayoutOptions::default();
    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let json = match page {
        Some(page) => to_json(&inspect_page(input, year, page, &options)?, format)?,
        None => to_json(&inspect_report(input, year, &options)?, format)?,
    };
    println!("{}", json);

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "salarypdf".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Salary report PDF to CSV tool");
    println!();
    println!("License: MIT");
}
