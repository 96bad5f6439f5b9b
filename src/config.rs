//! Run configuration.
//!
//! Defaults reproduce the Melbourne housing setup; a JSON file can override
//! any subset of fields and command-line flags override the file.

use crate::charts::PlotSettings;
use crate::stats::{FitColumns, DEFAULT_SECOND_PREDICTOR};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    pub input: PathBuf,
    pub target: String,
    pub hypothesis: String,
    pub second_predictor: String,
    pub plots: PlotConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("Data/melb_data.csv"),
            target: "Price".to_owned(),
            hypothesis: "Distance".to_owned(),
            second_predictor: DEFAULT_SECOND_PREDICTOR.to_owned(),
            plots: PlotConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlotConfig {
    pub hist_dir: PathBuf,
    pub scatter_dir: PathBuf,
    pub width: u32,
    pub height: u32,
    pub bins: usize,
    pub marker_radius: u32,
}

impl Default for PlotConfig {
    fn default() -> Self {
        let settings = PlotSettings::default();
        Self {
            hist_dir: PathBuf::from("Plots/Hist"),
            scatter_dir: PathBuf::from("Plots/Scatter"),
            width: settings.width,
            height: settings.height,
            bins: settings.bins,
            marker_radius: settings.marker_radius,
        }
    }
}

impl PlotConfig {
    pub fn settings(&self) -> PlotSettings {
        PlotSettings {
            width: self.width,
            height: self.height,
            bins: self.bins,
            marker_radius: self.marker_radius,
        }
    }
}

impl PipelineConfig {
    /// Read a JSON config file. Missing fields keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn fit_columns(&self) -> FitColumns {
        FitColumns::new(&self.target, &self.hypothesis)
            .with_second_predictor(&self.second_predictor)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let columns = self.fit_columns();
        let [hypothesis, second] = columns.predictors();
        if hypothesis == second {
            return Err(ConfigError::Invalid(format!(
                "both predictors are '{hypothesis}'"
            )));
        }
        if columns.predictors().contains(&columns.target.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "target '{}' is also a predictor",
                columns.target
            )));
        }

        let plots = &self.plots;
        if plots.width == 0 || plots.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "plot size must be positive, got {}x{}",
                plots.width, plots.height
            )));
        }
        if plots.bins == 0 {
            return Err(ConfigError::Invalid("histogram bins must be positive".to_owned()));
        }
        if plots.marker_radius == 0 {
            return Err(ConfigError::Invalid("marker radius must be positive".to_owned()));
        }
        Ok(())
    }
}
