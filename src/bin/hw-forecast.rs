//! Command-line front end for the forecast pipeline.
//!
//! Usage:
//!   hw-forecast --input data.csv --time-col Month --value-col Sales --trend --seasonal
//!
//! Prints the forecast table and writes `result.csv`.

use clap::Parser;
use hw_forecast::assemble::{decode_csv, download_link, RESULT_FILENAME};
use hw_forecast::config::{ForecastConfig, DEFAULT_HORIZON};
use hw_forecast::engine::Pipeline;
use hw_forecast::io::CsvOptions;
use std::fs;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "hw-forecast", version, about = "Holt-Winters forecast for a monthly CSV series")]
struct Cli {
    /// CSV file with a header row
    #[arg(short, long)]
    input: PathBuf,

    /// Column holding the dates
    #[arg(long)]
    time_col: String,

    /// Column holding the values to forecast
    #[arg(long)]
    value_col: String,

    /// Months to forecast (1-100)
    #[arg(long, default_value_t = DEFAULT_HORIZON)]
    horizon: usize,

    /// Add an additive seasonal component (period 12)
    #[arg(long)]
    seasonal: bool,

    /// Add an additive trend component
    #[arg(long)]
    trend: bool,

    /// Field delimiter
    #[arg(long, default_value_t = ',')]
    delimiter: char,

    /// Where to write the exported table
    #[arg(short, long, default_value = RESULT_FILENAME)]
    output: PathBuf,

    /// Print the data URI download link
    #[arg(long)]
    link: bool,

    /// Read the written file back and verify it matches
    #[arg(long)]
    check: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if !cli.delimiter.is_ascii() {
        return Err(format!(
            "delimiter must be a single ASCII character, got '{}'",
            cli.delimiter
        )
        .into());
    }
    let csv_options = CsvOptions::default().with_delimiter(cli.delimiter as u8);

    let config = ForecastConfig::new(cli.horizon)?
        .with_trend(cli.trend)
        .with_seasonal(cli.seasonal);

    let bytes = fs::read(&cli.input)?;
    let output = Pipeline::new()
        .with_csv_options(csv_options)
        .run(&bytes, &cli.time_col, &cli.value_col, &config)?;

    print!("{}", output.table);

    fs::write(&cli.output, &output.csv)?;
    info!(path = %cli.output.display(), rows = output.table.len(), "wrote forecast table");

    if cli.link {
        println!("{}", download_link(&output.table)?);
    }

    if cli.check {
        let written = fs::read_to_string(&cli.output)?;
        let decoded = decode_csv(&written)?;
        if decoded != output.table {
            return Err(format!(
                "{} does not match the forecast table",
                cli.output.display()
            )
            .into());
        }
        info!(path = %cli.output.display(), "export round-trip verified");
    }

    Ok(())
}
