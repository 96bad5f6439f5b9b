//! melb-regression - housing price regression from the command line
//!
//! Prints the fitted formula and the held-out mean absolute error; logs go to stderr.

mod cli;

use anyhow::{Context as _, Result};
use clap::Parser;
use cli::{Cli, Commands, DataArgs, PlotArgs};
use melb_regression::config::PipelineConfig;
use melb_regression::data::{load_csv, Table};
use melb_regression::pipeline::{fit_table, run_plots, PipelineError};
use melb_regression::{logging, stats};
use std::path::PathBuf;

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbosity())?;

    let config = match &cli.config {
        Some(path) => PipelineConfig::from_json_file(path)?,
        None => PipelineConfig::default(),
    };

    match cli.command.unwrap_or_default() {
        Commands::Fit {
            data,
            plot_args,
            plots,
        } => handle_fit(config, data, plot_args, plots),
        Commands::Plot { data, plot_args } => handle_plot(config, data, plot_args),
        Commands::Describe { input, head } => handle_describe(config, input, head),
    }
}

fn prepare(
    mut config: PipelineConfig,
    data: DataArgs,
    plot_args: PlotArgs,
) -> Result<(PipelineConfig, Vec<String>, Table)> {
    data.apply(&mut config);
    let columns = plot_args.apply(&mut config);
    config.validate()?;

    let table = load_csv(&config.input).map_err(PipelineError::Load)?;
    Ok((config, columns, table))
}

fn handle_fit(
    config: PipelineConfig,
    data: DataArgs,
    plot_args: PlotArgs,
    plots: bool,
) -> Result<()> {
    let (config, columns, table) = prepare(config, data, plot_args)?;

    let report = fit_table(&table, &config)
        .with_context(|| format!("regression on '{}' failed", config.input.display()))?;

    tracing::info!(
        training_rows = report.training_rows,
        testing_rows = report.testing_rows,
        "partitioned dataset"
    );
    println!("\nRegression Formula:\n{}\n", report.model.formula());
    println!("{}", report.evaluation);

    if plots {
        let batch = run_plots(&table, &config, &columns);
        tracing::info!(
            rendered = batch.rendered.len(),
            failed = batch.failures.len(),
            "plots finished"
        );
    }
    Ok(())
}

fn handle_plot(config: PipelineConfig, data: DataArgs, plot_args: PlotArgs) -> Result<()> {
    let (config, columns, table) = prepare(config, data, plot_args)?;
    let report = run_plots(&table, &config, &columns);

    for outcome in &report.rendered {
        println!("{}", outcome.path.display());
    }
    for failure in &report.failures {
        eprintln!("{}: {}", failure.job, failure.error);
    }
    Ok(())
}

fn handle_describe(config: PipelineConfig, input: Option<PathBuf>, head: usize) -> Result<()> {
    let input = input.unwrap_or(config.input);
    let table = load_csv(&input).map_err(PipelineError::Load)?;
    let summaries = stats::summarize(&table).context("summarizing columns")?;

    println!("Rows: {}  Columns: {}\n", table.height(), table.width());
    println!(
        "{:<16} {:<8} {:>8} {:>8} {:>14} {:>14} {:>14} {:>14} {:>14}",
        "column", "kind", "count", "missing", "mean", "std", "min", "median", "max"
    );
    for summary in &summaries {
        println!("{summary}");
    }
    if head > 0 {
        println!("\n{}", table.frame().head(Some(head)));
    }
    Ok(())
}
