//! Charts module - exploratory histograms and scatter plots
//!
//! Every plot runs in its own failure boundary: [`render_batch`] renders the
//! requested plots on the rayon pool, logs each [`RenderError`] and carries
//! on with the remaining plots.

mod plotter;
mod renderer;

pub use plotter::{
    histogram_file_name, padded_range, paired_points, present_values, scatter_file_name,
    Histogram,
};
pub use renderer::StaticChartRenderer;

use crate::data::{Table, TableError};
use rayon::prelude::*;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("{0}")]
    Column(#[from] TableError),
    #[error("no plottable values in {what}")]
    NoData { what: String },
    #[error("drawing failed: {0}")]
    Drawing(String),
    #[error("pixel buffer does not match {width}x{height}")]
    Buffer { width: u32, height: u32 },
    #[error("cannot create output directory '{}': {source}", path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot write '{}': {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Image size and styling shared by every plot in a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlotSettings {
    pub width: u32,
    pub height: u32,
    pub bins: usize,
    pub marker_radius: u32,
}

impl Default for PlotSettings {
    fn default() -> Self {
        Self {
            width: 400,
            height: 400,
            bins: 50,
            marker_radius: 3,
        }
    }
}

/// A single plot to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlotJob {
    Histogram { column: String },
    Scatter { y: String, x: String },
}

impl fmt::Display for PlotJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlotJob::Histogram { column } => write!(f, "histogram of '{column}'"),
            PlotJob::Scatter { y, x } => write!(f, "scatter of '{y}' vs '{x}'"),
        }
    }
}

/// Plots to render and where to put them.
#[derive(Debug, Clone)]
pub struct PlotRequest {
    pub jobs: Vec<PlotJob>,
    pub hist_dir: PathBuf,
    pub scatter_dir: PathBuf,
}

impl PlotRequest {
    /// A histogram for every column and a scatter of `target` against every
    /// other column.
    pub fn for_columns(
        target: &str,
        columns: &[String],
        hist_dir: impl Into<PathBuf>,
        scatter_dir: impl Into<PathBuf>,
    ) -> Self {
        let histograms = columns.iter().map(|column| PlotJob::Histogram {
            column: column.clone(),
        });
        let scatters = columns
            .iter()
            .filter(|column| column.as_str() != target)
            .map(|x| PlotJob::Scatter {
                y: target.to_owned(),
                x: x.clone(),
            });

        Self {
            jobs: histograms.chain(scatters).collect(),
            hist_dir: hist_dir.into(),
            scatter_dir: scatter_dir.into(),
        }
    }
}

/// A plot that was written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlotOutcome {
    pub path: PathBuf,
    pub plotted: usize,
    pub missing: usize,
}

#[derive(Debug)]
pub struct PlotFailure {
    pub job: PlotJob,
    pub error: RenderError,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub rendered: Vec<PlotOutcome>,
    pub failures: Vec<PlotFailure>,
}

/// Histogram of `column`, written to `<out_dir>/<column>_hist.png`.
pub fn histogram(
    table: &Table,
    column: &str,
    out_dir: &Path,
    settings: &PlotSettings,
) -> Result<PlotOutcome, RenderError> {
    let (values, missing) = present_values(&table.numeric(column)?);
    tracing::info!(column, missing, "missing or infinite values dropped from histogram");

    let hist = Histogram::from_values(&values, settings.bins).ok_or_else(|| RenderError::NoData {
        what: format!("'{column}'"),
    })?;

    let path = prepare_output(out_dir, &histogram_file_name(column))?;
    StaticChartRenderer::new(*settings).render_histogram(column, &hist, &path)?;

    Ok(PlotOutcome {
        path,
        plotted: values.len(),
        missing,
    })
}

/// Scatter of `y` against `x`, written to `<out_dir>/<x>_scatter.png`.
pub fn scatter(
    table: &Table,
    y: &str,
    x: &str,
    out_dir: &Path,
    settings: &PlotSettings,
) -> Result<PlotOutcome, RenderError> {
    let (points, missing) = paired_points(&table.numeric(y)?, &table.numeric(x)?);
    tracing::info!(x, y, missing, "missing or infinite values dropped from scatter");

    if points.is_empty() {
        return Err(RenderError::NoData {
            what: format!("'{y}' vs '{x}'"),
        });
    }

    let path = prepare_output(out_dir, &scatter_file_name(x))?;
    StaticChartRenderer::new(*settings).render_scatter(y, x, &points, &path)?;

    Ok(PlotOutcome {
        path,
        plotted: points.len(),
        missing,
    })
}

/// Render every job in `request`. Failures are logged and collected; they
/// never stop the other jobs.
pub fn render_batch(table: &Table, request: &PlotRequest, settings: &PlotSettings) -> BatchReport {
    let results: Vec<(PlotJob, Result<PlotOutcome, RenderError>)> = request
        .jobs
        .par_iter()
        .map(|job| {
            let result = match job {
                PlotJob::Histogram { column } => {
                    histogram(table, column, &request.hist_dir, settings)
                }
                PlotJob::Scatter { y, x } => scatter(table, y, x, &request.scatter_dir, settings),
            };
            (job.clone(), result)
        })
        .collect();

    let mut report = BatchReport::default();
    for (job, result) in results {
        match result {
            Ok(outcome) => {
                tracing::info!(path = %outcome.path.display(), "wrote {job}");
                report.rendered.push(outcome);
            }
            Err(error) => {
                tracing::warn!(%error, "skipping {job}");
                report.failures.push(PlotFailure { job, error });
            }
        }
    }
    report
}

fn prepare_output(dir: &Path, file_name: &str) -> Result<PathBuf, RenderError> {
    std::fs::create_dir_all(dir).map_err(|source| RenderError::OutputDir {
        path: dir.to_path_buf(),
        source,
    })?;
    Ok(dir.join(file_name))
}
