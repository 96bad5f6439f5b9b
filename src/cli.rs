use clap::{ArgAction, Args, Parser, Subcommand};
use melb_regression::config::PipelineConfig;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "melb-regression",
    version,
    about = "Fit a price regression on housing data and report its mean absolute error"
)]
pub struct Cli {
    /// JSON configuration file. Command-line flags take precedence over it.
    #[arg(long, global = true, env = "MELB_REGRESSION_CONFIG")]
    pub config: Option<PathBuf>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    pub fn verbosity(&self) -> i8 {
        if self.quiet {
            -1
        } else {
            self.verbose.min(2) as i8
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Split the data, fit the regression and report MAE on the held-out rows (default)
    Fit {
        #[command(flatten)]
        data: DataArgs,

        #[command(flatten)]
        plot_args: PlotArgs,

        /// Also render histograms and scatter plots
        #[arg(long)]
        plots: bool,
    },
    /// Render histograms and scatter plots only
    Plot {
        #[command(flatten)]
        data: DataArgs,

        #[command(flatten)]
        plot_args: PlotArgs,
    },
    /// Print column types, summary statistics and the first rows
    Describe {
        /// Path to the CSV file
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Number of rows to preview
        #[arg(long, default_value_t = 5)]
        head: usize,
    },
}

impl Default for Commands {
    fn default() -> Self {
        Commands::Fit {
            data: DataArgs::default(),
            plot_args: PlotArgs::default(),
            plots: false,
        }
    }
}

#[derive(Args, Debug, Default, Clone)]
pub struct DataArgs {
    /// Path to the CSV file
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Column to predict
    #[arg(long)]
    pub target: Option<String>,

    /// First predictor column
    #[arg(long)]
    pub hypothesis: Option<String>,

    /// Second predictor column
    #[arg(long)]
    pub second_predictor: Option<String>,
}

impl DataArgs {
    pub fn apply(self, config: &mut PipelineConfig) {
        if let Some(input) = self.input {
            config.input = input;
        }
        if let Some(target) = self.target {
            config.target = target;
        }
        if let Some(hypothesis) = self.hypothesis {
            config.hypothesis = hypothesis;
        }
        if let Some(second) = self.second_predictor {
            config.second_predictor = second;
        }
    }
}

#[derive(Args, Debug, Default, Clone)]
pub struct PlotArgs {
    /// Output directory for histograms
    #[arg(long)]
    pub hist_dir: Option<PathBuf>,

    /// Output directory for scatter plots
    #[arg(long)]
    pub scatter_dir: Option<PathBuf>,

    /// Columns to plot (comma separated). Defaults to every numeric column.
    #[arg(long, value_delimiter = ',')]
    pub columns: Vec<String>,
}

impl PlotArgs {
    /// Apply the output directories and return the requested columns.
    pub fn apply(self, config: &mut PipelineConfig) -> Vec<String> {
        if let Some(dir) = self.hist_dir {
            config.plots.hist_dir = dir;
        }
        if let Some(dir) = self.scatter_dir {
            config.plots.scatter_dir = dir;
        }
        self.columns
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory as _;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_override_config() {
        let cli = Cli::parse_from([
            "melb-regression",
            "fit",
            "--input",
            "houses.csv",
            "--hypothesis",
            "Rooms",
            "--plots",
            "--columns",
            "Rooms,Price",
        ]);
        let Some(Commands::Fit {
            data,
            plot_args,
            plots,
        }) = cli.command
        else {
            panic!("expected fit command");
        };

        let mut config = PipelineConfig::default();
        data.apply(&mut config);
        let columns = plot_args.apply(&mut config);

        assert!(plots);
        assert_eq!(config.input, PathBuf::from("houses.csv"));
        assert_eq!(config.hypothesis, "Rooms");
        assert_eq!(config.target, "Price");
        assert_eq!(columns, vec!["Rooms", "Price"]);
    }

    #[test]
    fn quiet_lowers_verbosity() {
        let cli = Cli::parse_from(["melb-regression", "-q"]);
        assert_eq!(cli.verbosity(), -1);
        assert!(cli.command.is_none());
        let cli = Cli::parse_from(["melb-regression", "-vvv", "describe"]);
        assert_eq!(cli.verbosity(), 2);
    }
}
