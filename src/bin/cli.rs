use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::io;
use std::path::PathBuf;

use geo_nearest::config::Settings;
use geo_nearest::core::{ensure_non_empty, Matcher, SetRole, MAX_DISPLAY_PRECISION};
use geo_nearest::logging;
use geo_nearest::services::{
    render_matches, render_rejected, render_summary, run_prompt_loop, ColumnSelector, CsvSource,
    HeaderMode, PromptSession,
};

#[derive(Parser, Debug)]
#[command(name = "geo-nearest-cli")]
#[command(about = "Match every source coordinate to its nearest target coordinate by great-circle distance.", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Decimals shown for distances (defaults to the configured value)
    #[arg(long, global = true, value_parser = clap::value_parser!(u32).range(0..=MAX_DISPLAY_PRECISION as i64))]
    precision: Option<u32>,

    /// Log level, overrides configuration
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Configuration file (defaults to config/default.toml and config/local.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Read source and target points from two CSV files
    Csv {
        /// Path to the source .csv file
        #[arg(short, long)]
        source: PathBuf,

        /// Path to the target .csv file
        #[arg(short, long)]
        target: PathBuf,

        /// Latitude column of the source file (header name or zero-based index)
        #[arg(long)]
        source_lat: Option<ColumnSelector>,

        /// Longitude column of the source file
        #[arg(long)]
        source_lon: Option<ColumnSelector>,

        /// Latitude column of the target file
        #[arg(long)]
        target_lat: Option<ColumnSelector>,

        /// Longitude column of the target file
        #[arg(long)]
        target_lon: Option<ColumnSelector>,

        /// Field delimiter
        #[arg(short, long, default_value_t = ',')]
        delimiter: char,

        /// Treat the first row of both files as data (by default a first row
        /// with no coordinate-like cell is taken as a header)
        #[arg(long)]
        no_headers: bool,
    },

    /// Type coordinates at a prompt
    Interactive,
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let mut settings = match &cli.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    }
    .context("loading configuration")?;

    if let Some(level) = &cli.log_level {
        settings.logging.level = level.clone();
    }
    logging::init(&settings.logging);

    let precision = cli.precision.unwrap_or(settings.matching.display_precision);
    let matcher = Matcher::new();

    match cli.command {
        Command::Csv {
            source,
            target,
            source_lat,
            source_lon,
            target_lat,
            target_lon,
            delimiter,
            no_headers,
        } => {
            if !delimiter.is_ascii() {
                bail!("delimiter must be a single ASCII character, got '{}'", delimiter);
            }
            let delimiter = delimiter as u8;
            let header = if no_headers { HeaderMode::Absent } else { HeaderMode::Detect };

            let source_csv = CsvSource::open(&source, delimiter, header)
                .with_context(|| format!("reading {}", source.display()))?;
            let target_csv = CsvSource::open(&target, delimiter, header)
                .with_context(|| format!("reading {}", target.display()))?;

            let source_set = source_csv
                .ingest(source_lat.as_ref(), source_lon.as_ref())
                .with_context(|| format!("selecting columns of {}", source.display()))?;
            let target_set = target_csv
                .ingest(target_lat.as_ref(), target_lon.as_ref())
                .with_context(|| format!("selecting columns of {}", target.display()))?;

            // points are labelled with their line in the file
            let source_row =
                |position: usize| source_csv.line_number(source_set.origin(position).unwrap_or(position));
            let target_row =
                |position: usize| target_csv.line_number(target_set.origin(position).unwrap_or(position));
            let source_line = |row: usize| source_csv.line_number(row);
            let target_line = |row: usize| target_csv.line_number(row);

            eprint!("{}", render_rejected("source", &source_set.rejected, &source_line));
            eprint!("{}", render_rejected("target", &target_set.rejected, &target_line));

            ensure_non_empty(
                source_set.coordinates.as_slice(),
                target_set.coordinates.as_slice(),
            )?;

            let result = matcher.find_matches(
                source_set.coordinates.as_slice(),
                target_set.coordinates.as_slice(),
            );

            print!("{}", render_matches(&result.matches, precision, &source_row, &target_row));
            println!("{}", render_summary(&result, precision));
        }
        Command::Interactive => {
            let mut session = PromptSession::new(settings.matching.duplicate_policy);
            let stdin = io::stdin();
            let mut input = stdin.lock();
            let mut output = io::stdout();

            run_prompt_loop(&mut session, &mut input, &mut output).context("reading input")?;

            let entry = |index: usize| index + 1;
            for role in [SetRole::Source, SetRole::Target] {
                let name = role.to_string();
                eprint!("{}", render_rejected(&name, &session.rejected_in(role), &entry));
            }

            let source = session.set(SetRole::Source);
            let target = session.set(SetRole::Target);
            ensure_non_empty(source.as_slice(), target.as_slice())?;

            let result = session.run(&matcher);
            let position = |p: usize| p + 1;

            print!("{}", render_matches(&result.matches, precision, &position, &position));
            println!("{}", render_summary(&result, precision));
        }
    }

    Ok(())
}
