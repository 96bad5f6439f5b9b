//! Chart Plotter Module
//! Prepares plot data: missing-value filtering, histogram binning and axis ranges.
//! Infinite values cannot be placed on an axis and are dropped with the missing ones.

use std::ops::Range;

/// Equal-width histogram over the range of the plotted values.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub lo: f64,
    pub bin_width: f64,
    pub counts: Vec<u32>,
}

impl Histogram {
    /// Bin `values` into `bins` equal-width bins. `None` when there is nothing to bin.
    pub fn from_values(values: &[f64], bins: usize) -> Option<Self> {
        if values.is_empty() || bins == 0 {
            return None;
        }

        let (min, max) = extent(values.iter().copied())?;
        if !min.is_finite() || !max.is_finite() {
            return None;
        }
        // A constant column still gets a visible bar
        let (lo, hi) = if max > min {
            (min, max)
        } else {
            (min - 0.5, max + 0.5)
        };
        let bin_width = (hi - lo) / bins as f64;
        if !bin_width.is_finite() {
            return None;
        }

        let mut counts = vec![0u32; bins];
        for &v in values {
            let idx = (((v - lo) / bin_width).floor() as usize).min(bins - 1);
            counts[idx] += 1;
        }

        Some(Self {
            lo,
            bin_width,
            counts,
        })
    }

    pub fn hi(&self) -> f64 {
        self.lo + self.bin_width * self.counts.len() as f64
    }

    pub fn max_count(&self) -> u32 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    /// `(lower edge, upper edge, count)` per bin.
    pub fn bins(&self) -> impl Iterator<Item = (f64, f64, u32)> + '_ {
        self.counts.iter().enumerate().map(move |(i, &count)| {
            let lower = self.lo + i as f64 * self.bin_width;
            (lower, lower + self.bin_width, count)
        })
    }
}

/// Finite values and the number of missing or infinite ones.
pub fn present_values(values: &[Option<f64>]) -> (Vec<f64>, usize) {
    let present: Vec<f64> = values
        .iter()
        .flatten()
        .copied()
        .filter(|v| v.is_finite())
        .collect();
    let missing = values.len() - present.len();
    (present, missing)
}

/// `(x, y)` pairs where both values are present and finite, and the number of dropped rows.
pub fn paired_points(y: &[Option<f64>], x: &[Option<f64>]) -> (Vec<(f64, f64)>, usize) {
    let mut dropped = 0;
    let points = x
        .iter()
        .zip(y)
        .filter_map(|pair| match pair {
            (Some(x), Some(y)) if x.is_finite() && y.is_finite() => Some((*x, *y)),
            _ => {
                dropped += 1;
                None
            }
        })
        .collect();
    (points, dropped)
}

/// Axis range covering `values` with 5% padding on both sides.
pub fn padded_range(values: impl Iterator<Item = f64>) -> Range<f64> {
    let Some((min, max)) = extent(values.filter(|v| v.is_finite())) else {
        return 0.0..1.0;
    };
    if max > min {
        let pad = (max - min) * 0.05;
        (min - pad)..(max + pad)
    } else {
        let pad = if min == 0.0 { 1.0 } else { min.abs() * 0.05 };
        (min - pad)..(max + pad)
    }
}

fn extent(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

/// `<column>_hist.png`
pub fn histogram_file_name(column: &str) -> String {
    format!("{}_hist.png", file_stem(column))
}

/// `<x column>_scatter.png`
pub fn scatter_file_name(x_column: &str) -> String {
    format!("{}_scatter.png", file_stem(x_column))
}

fn file_stem(column: &str) -> String {
    column.replace(['/', '\\'], "_")
}
