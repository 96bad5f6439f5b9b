//! Load → partition → train → evaluate, plus the optional plot batch.

use crate::charts::{render_batch, BatchReport, PlotRequest};
use crate::config::PipelineConfig;
use crate::data::{load_csv, partition, LoaderError, Table};
use crate::stats::{evaluate, train, EvaluateError, Evaluation, Model, TrainError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("load stage failed: {0}")]
    Load(#[from] LoaderError),
    #[error("train stage failed: {0}")]
    Train(#[from] TrainError),
    #[error("evaluate stage failed: {0}")]
    Evaluate(#[from] EvaluateError),
}

/// Everything the fit path produced.
#[derive(Debug, Clone)]
pub struct FitReport {
    pub model: Model,
    pub evaluation: Evaluation,
    pub training_rows: usize,
    pub testing_rows: usize,
}

/// Load `config.input` and run the fit path on it.
pub fn run_fit(config: &PipelineConfig) -> Result<FitReport, PipelineError> {
    let table = load_csv(&config.input)?;
    fit_table(&table, config)
}

/// Run the fit path on an already loaded table.
pub fn fit_table(table: &Table, config: &PipelineConfig) -> Result<FitReport, PipelineError> {
    let parts = partition(table);
    let model = train(&parts.training, &config.fit_columns())?;
    let evaluation = evaluate(&model, &parts.testing)?;

    Ok(FitReport {
        model,
        evaluation,
        training_rows: parts.training.height(),
        testing_rows: parts.testing.height(),
    })
}

/// Render the configured plots for `columns`, or for every numeric column
/// when `columns` is empty.
pub fn run_plots(table: &Table, config: &PipelineConfig, columns: &[String]) -> BatchReport {
    let columns = if columns.is_empty() {
        table.numeric_columns()
    } else {
        columns.to_vec()
    };

    let request = PlotRequest::for_columns(
        &config.target,
        &columns,
        &config.plots.hist_dir,
        &config.plots.scatter_dir,
    );
    let report = render_batch(table, &request, &config.plots.settings());
    tracing::info!(
        rendered = report.rendered.len(),
        failed = report.failures.len(),
        "plot batch finished"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    fn scenario() -> Table {
        Table::new(
            DataFrame::new(vec![
                Column::new("Distance".into(), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]),
                Column::new(
                    "Landsize".into(),
                    vec![100.0, 120.0, 90.0, 150.0, 200.0, 80.0, 60.0, 300.0],
                ),
                Column::new(
                    "Price".into(),
                    vec![300.0, 320.0, 280.0, 400.0, 450.0, 260.0, 240.0, 500.0],
                ),
            ])
            .unwrap(),
        )
    }

    #[test]
    fn eight_row_scenario_trains_on_six_rows() {
        let report = fit_table(&scenario(), &PipelineConfig::default()).unwrap();
        assert_eq!(report.training_rows, 6);
        assert_eq!(report.testing_rows, 2);
        assert_eq!(report.model.observations(), 6);
        assert_eq!(report.evaluation.total_rows, 2);
        assert!(report.evaluation.mae >= 0.0);
        assert!(report.evaluation.to_string().starts_with("MAE = "));
    }

    #[test]
    fn pipeline_is_deterministic() {
        let config = PipelineConfig::default();
        let first = fit_table(&scenario(), &config).unwrap();
        let second = fit_table(&scenario(), &config).unwrap();
        assert_eq!(first.model.formula(), second.model.formula());
        assert!((first.evaluation.mae - second.evaluation.mae).abs() < 1e-9);
    }

    #[test]
    fn missing_target_fails_in_train_stage() {
        let mut config = PipelineConfig::default();
        config.target = "SalePrice".into();
        let err = fit_table(&scenario(), &config).unwrap_err();
        assert!(matches!(err, PipelineError::Train(TrainError::Column(_))));
        assert!(err.to_string().contains("SalePrice"));
    }

    #[test]
    fn missing_input_fails_in_load_stage() {
        let mut config = PipelineConfig::default();
        config.input = "no/such/melb_data.csv".into();
        let err = run_fit(&config).unwrap_err();
        assert!(matches!(err, PipelineError::Load(LoaderError::Io { .. })));
        assert!(err.to_string().starts_with("load stage failed"));
    }
}
