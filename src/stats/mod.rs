//! Stats module - regression fit, evaluation and column summaries

mod evaluator;
mod model;
mod summary;

pub use evaluator::{evaluate, EvaluateError, Evaluation};
pub use model::{
    train, Coefficient, FitColumns, Model, ModelBuilder, Observation, PredictionError, TrainError,
    DEFAULT_SECOND_PREDICTOR, PREDICTORS,
};
pub use summary::{summarize, summarize_column, ColumnSummary};
