//! Static Chart Renderer
//! Draws histograms and scatter plots with plotters into an RGB buffer and
//! encodes the buffer to PNG with `image`.

use super::plotter::{padded_range, Histogram};
use super::{PlotSettings, RenderError};
use image::RgbImage;
use plotters::prelude::*;
use std::fmt;
use std::path::Path;

// Colors
const BAR: RGBColor = RGBColor(91, 155, 213);
const POINT: RGBColor = RGBColor(237, 125, 49);
const GRID: RGBColor = RGBColor(225, 225, 225);

const FONT: &str = "sans-serif";

pub struct StaticChartRenderer {
    settings: PlotSettings,
}

impl StaticChartRenderer {
    pub fn new(settings: PlotSettings) -> Self {
        Self { settings }
    }

    /// Render `hist` as a bar chart and save it to `path`.
    pub fn render_histogram(
        &self,
        column: &str,
        hist: &Histogram,
        path: &Path,
    ) -> Result<(), RenderError> {
        let mut buffer = self.blank_buffer();
        Self::draw_histogram(&mut buffer, self.size(), column, hist)?;
        self.encode(buffer, path)
    }

    /// Render `points` as an XY scatter with a light grid and save it to `path`.
    pub fn render_scatter(
        &self,
        y_label: &str,
        x_label: &str,
        points: &[(f64, f64)],
        path: &Path,
    ) -> Result<(), RenderError> {
        let mut buffer = self.blank_buffer();
        Self::draw_scatter(
            &mut buffer,
            self.size(),
            y_label,
            x_label,
            points,
            self.settings.marker_radius,
        )?;
        self.encode(buffer, path)
    }

    fn size(&self) -> (u32, u32) {
        (self.settings.width, self.settings.height)
    }

    fn blank_buffer(&self) -> Vec<u8> {
        vec![255u8; self.settings.width as usize * self.settings.height as usize * 3]
    }

    fn draw_histogram(
        buffer: &mut [u8],
        size: (u32, u32),
        column: &str,
        hist: &Histogram,
    ) -> Result<(), RenderError> {
        let root = BitMapBackend::with_buffer(buffer, size).into_drawing_area();
        root.fill(&WHITE).map_err(drawing)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(format!("{column} Histogram"), (FONT, 18).into_font())
            .margin(10)
            .x_label_area_size(35)
            .y_label_area_size(45)
            .build_cartesian_2d(hist.lo..hist.hi(), 0u32..hist.max_count() + 1)
            .map_err(drawing)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .light_line_style(GRID)
            .x_desc(column)
            .y_desc("Count")
            .draw()
            .map_err(drawing)?;

        chart
            .draw_series(hist.bins().filter(|&(_, _, count)| count > 0).map(
                |(lower, upper, count)| {
                    Rectangle::new([(lower, 0u32), (upper, count)], BAR.filled())
                },
            ))
            .map_err(drawing)?;

        root.present().map_err(drawing)?;
        Ok(())
    }

    fn draw_scatter(
        buffer: &mut [u8],
        size: (u32, u32),
        y_label: &str,
        x_label: &str,
        points: &[(f64, f64)],
        radius: u32,
    ) -> Result<(), RenderError> {
        let root = BitMapBackend::with_buffer(buffer, size).into_drawing_area();
        root.fill(&WHITE).map_err(drawing)?;

        let x_range = padded_range(points.iter().map(|p| p.0));
        let y_range = padded_range(points.iter().map(|p| p.1));

        let mut chart = ChartBuilder::on(&root)
            .caption(format!("{y_label} vs {x_label}"), (FONT, 18).into_font())
            .margin(10)
            .x_label_area_size(35)
            .y_label_area_size(55)
            .build_cartesian_2d(x_range, y_range)
            .map_err(drawing)?;

        chart
            .configure_mesh()
            .light_line_style(GRID)
            .x_desc(x_label)
            .y_desc(y_label)
            .draw()
            .map_err(drawing)?;

        chart
            .draw_series(
                points
                    .iter()
                    .map(|&(x, y)| Circle::new((x, y), radius, POINT.filled())),
            )
            .map_err(drawing)?;

        root.present().map_err(drawing)?;
        Ok(())
    }

    fn encode(&self, buffer: Vec<u8>, path: &Path) -> Result<(), RenderError> {
        let (width, height) = self.size();
        let image = RgbImage::from_raw(width, height, buffer)
            .ok_or(RenderError::Buffer { width, height })?;
        image.save(path).map_err(|source| RenderError::Encode {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn drawing<E: fmt::Display>(e: E) -> RenderError {
    RenderError::Drawing(e.to_string())
}
