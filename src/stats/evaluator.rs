//! Mean absolute error of a fitted model on a held-out table.

use super::{Model, PredictionError};
use crate::data::{Table, TableError};
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EvaluateError {
    #[error("testing data: {0}")]
    Column(#[from] TableError),
}

/// Result of scoring a model on a testing table.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// Summed absolute error divided by `total_rows`.
    pub mae: f64,
    pub total_rows: usize,
    pub scored_rows: usize,
    pub missing_rows: usize,
    pub failed_rows: usize,
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MAE = {:.2}", self.mae)
    }
}

/// Score `model` on `table`.
///
/// Only rows with the target and every predictor present contribute, but the
/// summed error is divided by the total row count of `table`, so missing
/// values pull the metric towards zero. A row whose prediction fails is
/// logged and skipped.
pub fn evaluate(model: &Model, table: &Table) -> Result<Evaluation, EvaluateError> {
    let target = table.numeric(model.target())?;
    let predictors = model
        .predictor_names()
        .into_iter()
        .map(|name| table.numeric(name))
        .collect::<Result<Vec<_>, _>>()?;

    let total_rows = table.height();
    let mut total_error = 0.0;
    let mut scored_rows = 0usize;
    let mut missing_rows = 0usize;
    let mut failed_rows = 0usize;
    let mut row = Vec::with_capacity(predictors.len());

    for (i, observed) in target.iter().enumerate() {
        row.clear();
        row.extend(predictors.iter().map_while(|column| column[i]));

        let Some(observed) = observed else {
            missing_rows += 1;
            continue;
        };
        if row.len() != predictors.len() {
            missing_rows += 1;
            continue;
        }

        match model.predict(&row) {
            Ok(predicted) if observed.is_finite() => {
                total_error += (observed - predicted).abs();
                scored_rows += 1;
            }
            Ok(_) => {
                tracing::warn!(row = i, observed, "target is not finite, row skipped");
                failed_rows += 1;
            }
            Err(e) => {
                log_prediction_failure(i, &e);
                failed_rows += 1;
            }
        }
    }

    let mae = if total_rows == 0 {
        0.0
    } else {
        total_error / total_rows as f64
    };

    tracing::info!(
        mae,
        total_rows,
        scored_rows,
        missing_rows,
        failed_rows,
        "evaluated model"
    );

    Ok(Evaluation {
        mae,
        total_rows,
        scored_rows,
        missing_rows,
        failed_rows,
    })
}

fn log_prediction_failure(row: usize, error: &PredictionError) {
    tracing::warn!(row, %error, "prediction failed, row skipped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::Coefficient;
    use polars::prelude::*;

    fn model() -> Model {
        // Price = 100 + 10*Distance + 1*Landsize
        Model::new(
            "Price",
            100.0,
            vec![
                Coefficient { name: "Distance".into(), value: 10.0 },
                Coefficient { name: "Landsize".into(), value: 1.0 },
            ],
        )
    }

    fn table(distance: Vec<Option<f64>>, landsize: Vec<Option<f64>>, price: Vec<Option<f64>>) -> Table {
        Table::new(
            DataFrame::new(vec![
                Column::new("Distance".into(), distance),
                Column::new("Landsize".into(), landsize),
                Column::new("Price".into(), price),
            ])
            .unwrap(),
        )
    }

    #[test]
    fn mae_divides_by_total_rows() {
        // Every usable row has prediction 100 + 10 + 10 = 120.
        let mut distance = vec![Some(1.0); 10];
        let landsize = vec![Some(10.0); 10];
        let price: Vec<Option<f64>> = (0..10).map(|i| Some(120.0 + i as f64)).collect();
        for i in [2, 5, 8] {
            distance[i] = None;
        }

        let eval = evaluate(&model(), &table(distance, landsize, price)).unwrap();

        // Usable rows 0,1,3,4,6,7,9 have absolute errors equal to their index.
        let summed = 0.0 + 1.0 + 3.0 + 4.0 + 6.0 + 7.0 + 9.0;
        assert!((eval.mae - summed / 10.0).abs() < 1e-12);
        assert!((eval.mae - summed / 7.0).abs() > 1e-3);
        assert_eq!(eval.total_rows, 10);
        assert_eq!(eval.scored_rows, 7);
        assert_eq!(eval.missing_rows, 3);
        assert_eq!(eval.failed_rows, 0);
    }

    #[test]
    fn failed_predictions_are_skipped() {
        let eval = evaluate(
            &model(),
            &table(
                vec![Some(1.0), Some(f64::INFINITY)],
                vec![Some(10.0), Some(10.0)],
                vec![Some(130.0), Some(130.0)],
            ),
        )
        .unwrap();
        assert_eq!(eval.failed_rows, 1);
        assert_eq!(eval.scored_rows, 1);
        assert!((eval.mae - 5.0).abs() < 1e-12);
    }

    #[test]
    fn infinite_target_is_skipped() {
        let eval = evaluate(
            &model(),
            &table(
                vec![Some(1.0), Some(1.0)],
                vec![Some(10.0), Some(10.0)],
                vec![Some(f64::INFINITY), Some(124.0)],
            ),
        )
        .unwrap();
        assert_eq!(eval.failed_rows, 1);
        assert_eq!(eval.scored_rows, 1);
        assert!((eval.mae - 2.0).abs() < 1e-12);
    }

    #[test]
    fn empty_table_scores_zero() {
        let eval = evaluate(&model(), &table(vec![], vec![], vec![])).unwrap();
        assert_eq!(eval.mae, 0.0);
        assert_eq!(eval.to_string(), "MAE = 0.00");
    }

    #[test]
    fn missing_column_fails() {
        let t = Table::new(
            DataFrame::new(vec![Column::new("Price".into(), vec![1.0])]).unwrap(),
        );
        assert!(matches!(
            evaluate(&model(), &t),
            Err(EvaluateError::Column(TableError::ColumnNotFound { .. }))
        ));
    }

    #[test]
    fn display_uses_two_decimals() {
        let eval = Evaluation {
            mae: 1234.5678,
            total_rows: 1,
            scored_rows: 1,
            missing_rows: 0,
            failed_rows: 0,
        };
        assert_eq!(eval.to_string(), "MAE = 1234.57");
    }
}
