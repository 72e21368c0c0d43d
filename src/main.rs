mod cli;
mod logging;

use std::process::ExitCode;

use clap::Parser;

use cli::Cli;
use geotiff2envi::batch::{BatchOutcome, BatchRunner, RunError, write_report};
use geotiff2envi::config::{Config, ConfigError, Settings};

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(&cli) {
        Ok(outcome) => {
            print_summary(&outcome);
            if cli.strict && outcome.report.has_failures() {
                ExitCode::from(2)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            eprintln!("Error: {e}. Exiting.");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<BatchOutcome, RunError> {
    let config = build_config(cli)?;
    println!(
        "Converting GeoTIFF files from {} to {} ENVI files in {}",
        config.file_list().display(),
        config.output_dtype(),
        config.output_folder().display()
    );

    let outcome = BatchRunner::new(config).process()?;

    if let Some(report_path) = &cli.report {
        write_report(&outcome.report, report_path)?;
        println!("Report saved to: {}", report_path.display());
    }

    Ok(outcome)
}

// Defaults, then the JSON settings file, then individual flags.
fn build_config(cli: &Cli) -> Result<Config, ConfigError> {
    let mut config = Config::new(&cli.file_list_path, &cli.output_folder);

    if let Some(path) = &cli.config {
        config = config.with_settings(Settings::from_file(path)?);
    }
    if let Some(dtype) = cli.output_dtype {
        config = config.with_output_dtype(dtype);
    }
    if let Some(regex) = &cli.date_regex {
        config = config.with_date_regex(regex)?;
    }
    if let Some(format) = &cli.date_format {
        config = config.with_date_format(format)?;
    }
    if let Some(format) = &cli.time_format {
        config = config.with_time_format(format)?;
    }

    Ok(config)
}

fn print_summary(outcome: &BatchOutcome) {
    let report = &outcome.report;
    println!(
        "Converted {} of {} files",
        report.converted_count(),
        report.len()
    );
    println!("Output Files saved to: {}", outcome.file_list_path.display());
    println!("Time Vector saved to: {}", outcome.time_vector_path.display());

    if report.has_failures() {
        println!("{} file(s) had problems:", report.failures().count());
        for record in report.failures() {
            for reason in record.failure_reasons() {
                println!("  ✗ {}: {}", record.input.display(), reason);
            }
        }
    }
}
