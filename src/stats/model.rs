//! Linear regression of a target on two predictors.
//!
//! Observations are fed into a [`ModelBuilder`]; [`ModelBuilder::fit`] solves
//! ordinary least squares with `linfa-linear` and yields an immutable [`Model`].

use crate::data::{Table, TableError};
use linfa::prelude::*;
use linfa_linear::LinearRegression;
use ndarray::{Array1, Array2};
use std::fmt;
use thiserror::Error;

/// Number of predictors in the regression.
pub const PREDICTORS: usize = 2;

/// Default second predictor column.
pub const DEFAULT_SECOND_PREDICTOR: &str = "Landsize";

#[derive(Error, Debug)]
pub enum TrainError {
    #[error("training data: {0}")]
    Column(#[from] TableError),
    #[error("no usable rows to fit '{target}': every row is missing the target or a predictor, or holds a non-finite value")]
    InsufficientData { target: String },
    #[error("least-squares fit failed: {0}")]
    Solver(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PredictionError {
    #[error("expected {expected} predictor values, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
    #[error("predictor '{name}' is not finite ({value})")]
    NonFinite { name: String, value: f64 },
}

/// Names of the target column and the two predictor columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FitColumns {
    pub target: String,
    pub hypothesis: String,
    pub second_predictor: String,
}

impl FitColumns {
    /// Columns with the default second predictor.
    pub fn new(target: impl Into<String>, hypothesis: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            hypothesis: hypothesis.into(),
            second_predictor: DEFAULT_SECOND_PREDICTOR.to_owned(),
        }
    }

    pub fn with_second_predictor(mut self, name: impl Into<String>) -> Self {
        self.second_predictor = name.into();
        self
    }

    /// Predictor names in coefficient order.
    pub fn predictors(&self) -> [&str; PREDICTORS] {
        [self.hypothesis.as_str(), self.second_predictor.as_str()]
    }
}

/// One `(target, predictors)` pair fed to the builder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub target: f64,
    pub predictors: [f64; PREDICTORS],
}

impl Observation {
    pub fn new(target: f64, predictors: [f64; PREDICTORS]) -> Self {
        Self { target, predictors }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Coefficient {
    pub name: String,
    pub value: f64,
}

/// Fitted regression: intercept, one coefficient per predictor and a formula.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    target: String,
    intercept: f64,
    coefficients: Vec<Coefficient>,
    formula: String,
    r_squared: Option<f64>,
    observations: usize,
}

impl Model {
    pub fn new(target: impl Into<String>, intercept: f64, coefficients: Vec<Coefficient>) -> Self {
        let target = target.into();
        let formula = format_formula(&target, intercept, &coefficients);
        Self {
            target,
            intercept,
            coefficients,
            formula,
            r_squared: None,
            observations: 0,
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    pub fn coefficients(&self) -> &[Coefficient] {
        &self.coefficients
    }

    pub fn predictor_names(&self) -> Vec<&str> {
        self.coefficients.iter().map(|c| c.name.as_str()).collect()
    }

    /// Human-readable formula, e.g. `Price = 1.0000 + 2.0000*Distance + 0.5000*Landsize`.
    pub fn formula(&self) -> &str {
        &self.formula
    }

    /// Coefficient of determination on the training observations.
    pub fn r_squared(&self) -> Option<f64> {
        self.r_squared
    }

    /// Number of observations the fit consumed.
    pub fn observations(&self) -> usize {
        self.observations
    }

    /// Predicted target for one row of predictor values, in coefficient order.
    pub fn predict(&self, predictors: &[f64]) -> Result<f64, PredictionError> {
        if predictors.len() != self.coefficients.len() {
            return Err(PredictionError::DimensionMismatch {
                expected: self.coefficients.len(),
                got: predictors.len(),
            });
        }

        let mut y = self.intercept;
        for (coefficient, &value) in self.coefficients.iter().zip(predictors) {
            if !value.is_finite() {
                return Err(PredictionError::NonFinite {
                    name: coefficient.name.clone(),
                    value,
                });
            }
            y += coefficient.value * value;
        }
        Ok(y)
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.formula)
    }
}

fn format_formula(target: &str, intercept: f64, coefficients: &[Coefficient]) -> String {
    let mut formula = format!("{target} = {intercept:.4}");
    for c in coefficients {
        formula.push_str(&format!(" + {:.4}*{}", c.value, c.name));
    }
    formula
}

/// Accumulates observations until the single fit computation.
#[derive(Debug, Clone)]
pub struct ModelBuilder {
    target: String,
    predictors: [String; PREDICTORS],
    targets: Vec<f64>,
    records: Vec<f64>,
}

impl ModelBuilder {
    pub fn new(columns: &FitColumns) -> Self {
        Self {
            target: columns.target.clone(),
            predictors: [columns.hypothesis.clone(), columns.second_predictor.clone()],
            targets: Vec::new(),
            records: Vec::new(),
        }
    }

    pub fn observe(&mut self, observation: Observation) {
        self.targets.push(observation.target);
        self.records.extend_from_slice(&observation.predictors);
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Solve least squares over everything observed so far.
    pub fn fit(self) -> Result<Model, TrainError> {
        if self.targets.is_empty() {
            return Err(TrainError::InsufficientData {
                target: self.target,
            });
        }

        let n = self.targets.len();
        let records = Array2::from_shape_vec((n, PREDICTORS), self.records)
            .map_err(|e| TrainError::Solver(e.to_string()))?;
        let dataset = Dataset::new(records, Array1::from_vec(self.targets));

        let fitted = LinearRegression::default()
            .fit(&dataset)
            .map_err(|e| TrainError::Solver(e.to_string()))?;

        let prediction: Array1<f64> = fitted.predict(&dataset);
        let r_squared = prediction.r2(&dataset).ok().filter(|r2| r2.is_finite());

        let coefficients = self
            .predictors
            .into_iter()
            .zip(fitted.params().iter())
            .map(|(name, &value)| Coefficient { name, value })
            .collect();

        let mut model = Model::new(self.target, fitted.intercept(), coefficients);
        model.r_squared = r_squared;
        model.observations = n;
        Ok(model)
    }
}

/// Fit `target ≈ b0 + c1*hypothesis + c2*second_predictor` on `table`.
///
/// Rows missing any of the three values, or holding an infinite one, are
/// skipped entirely.
pub fn train(table: &Table, columns: &FitColumns) -> Result<Model, TrainError> {
    let target = table.numeric(&columns.target)?;
    let hypothesis = table.numeric(&columns.hypothesis)?;
    let second = table.numeric(&columns.second_predictor)?;

    let mut builder = ModelBuilder::new(columns);
    let mut skipped = 0usize;
    for ((y, h), s) in target.iter().zip(&hypothesis).zip(&second) {
        match (y, h, s) {
            (Some(y), Some(h), Some(s)) if [y, h, s].iter().all(|v| v.is_finite()) => {
                builder.observe(Observation::new(*y, [*h, *s]))
            }
            _ => skipped += 1,
        }
    }
    tracing::debug!(
        target = %columns.target,
        used = builder.len(),
        skipped,
        "collected training observations"
    );

    let model = builder.fit()?;
    tracing::info!(
        formula = %model.formula(),
        r_squared = ?model.r_squared(),
        observations = model.observations(),
        "fitted regression"
    );
    Ok(model)
}
