use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use collinear_common::config::AppConfig;
use collinear_ml::{RegressionExperiment, RegressionMetric, Solver};
use collinear_telemetry::telemetry::{init_logging, LoggingOptions};

use crate::demo::{fuel_consumption, FEATURES, TARGET};
use crate::report::{render_json, render_table};

#[derive(Parser)]
#[command(version, name = "collinear", about = "Least squares regression under multicollinearity")]
struct Cli {
    /// Additional TOML configuration layered over the defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Log filter directives, e.g. `collinear_ml=debug`, applied over RUST_LOG and -v
    #[arg(long, global = true, value_name = "FILTER")]
    log_filter: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fit and evaluate a regression on a synthetic, collinear fuel-consumption dataset
    Demo(DemoArgs),
    /// Print the resolved configuration as JSON
    Config,
}

#[derive(Args)]
struct DemoArgs {
    /// Number of generated vehicles
    #[arg(long)]
    rows: Option<usize>,

    /// Standard deviation of the CO₂ noise
    #[arg(long)]
    noise: Option<f64>,

    /// Seed of the dataset generator
    #[arg(long)]
    data_seed: Option<u64>,

    /// Seed of the train/test partition
    #[arg(long)]
    seed: Option<i64>,

    /// Fraction of rows drawn into the training subset
    #[arg(long)]
    train_fraction: Option<f64>,

    /// Least squares solver: auto, svd or normal-equation
    #[arg(long)]
    solver: Option<Solver>,

    /// Held-out metric: r2, mse, rmse, mae or var
    #[arg(long)]
    metric: Option<RegressionMetric>,

    /// Fit the regression through the origin
    #[arg(long)]
    no_intercept: bool,

    /// Features to regress on (defaults to all four fuel columns)
    #[arg(long, value_delimiter = ',')]
    features: Vec<String>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

pub fn main(args: Vec<String>) -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse_from(args);

    init_logging(&LoggingOptions {
        filter: cli.log_filter.clone(),
        verbosity: cli.verbose,
    })?;

    let config = match &cli.config {
        Some(path) => AppConfig::load_with_file(path)?,
        None => AppConfig::load()?,
    };

    match cli.command {
        Command::Demo(args) => run_demo(config, args),
        Command::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
    }
}

fn run_demo(mut config: AppConfig, args: DemoArgs) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(rows) = args.rows {
        config.demo.rows = rows;
    }
    if let Some(noise) = args.noise {
        config.demo.noise = noise;
    }
    if let Some(seed) = args.data_seed {
        config.demo.seed = seed;
    }
    if let Some(seed) = args.seed {
        config.split.seed = seed;
    }
    if let Some(fraction) = args.train_fraction {
        config.split.train_fraction = fraction;
    }
    if args.no_intercept {
        config.fit.fit_intercept = false;
    }

    let dataset = fuel_consumption(&config.demo)?;
    let features = if args.features.is_empty() {
        FEATURES.iter().map(|f| f.to_string()).collect()
    } else {
        args.features
    };
    let mut experiment = RegressionExperiment::new(features, TARGET).with_config(&config)?;
    if let Some(solver) = args.solver {
        experiment = experiment.with_solver(solver);
    }
    if let Some(metric) = args.metric {
        experiment = experiment.with_metric(metric);
    }
    log::info!(
        "running demo on {} rows with seed {}",
        dataset.num_rows(),
        config.split.seed
    );
    let report = experiment.run(&dataset)?;

    if args.json {
        println!("{}", render_json(&report)?);
    } else {
        println!("{}", render_table(&report));
        let reversed = report.reversed_features().collect::<Vec<_>>();
        if !reversed.is_empty() {
            println!(
                "sign reversal: {} (coefficient sign differs from the marginal correlation with {})",
                reversed.join(", "),
                report.target
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_parse_demo_args() {
        let cli = Cli::try_parse_from([
            "collinear",
            "demo",
            "--solver",
            "normal-equation",
            "--metric",
            "rmse",
            "--features",
            "engine_size,fuel_city",
            "-v",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 1);
        let Command::Demo(args) = cli.command else {
            unreachable!("expected the demo command");
        };
        assert_eq!(args.solver, Some(Solver::NormalEquation));
        assert_eq!(args.metric, Some(RegressionMetric::Rmse));
        assert_eq!(args.features, vec!["engine_size", "fuel_city"]);
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_parse_log_filter() {
        let cli = Cli::try_parse_from(["collinear", "config", "--log-filter", "collinear_ml=debug"])
            .unwrap();
        assert_eq!(cli.log_filter.as_deref(), Some("collinear_ml=debug"));
        assert!(matches!(cli.command, Command::Config));

        let cli = Cli::try_parse_from(["collinear", "config"]).unwrap();
        assert_eq!(cli.log_filter, None);
    }
}
