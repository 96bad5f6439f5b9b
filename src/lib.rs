//! Melbourne housing price regression.
//!
//! Loads a CSV into a column-oriented [`data::Table`], splits it positionally
//! into training and testing partitions, fits `price ≈ b0 + b1*distance +
//! b2*landsize` by least squares and reports the mean absolute error on the
//! held-out rows. Histograms and scatter plots can be rendered for
//! exploratory inspection.

pub mod charts;
pub mod config;
pub mod data;
pub mod logging;
pub mod pipeline;
pub mod stats;
