//! PNG figure for one input file.
//!
//! A figure is a single line plot of the raw `(x, y)` data, optionally
//! overlaid with the fitted curve evaluated at the same `x` values. The title
//! is the input path; axis labels, ranges and the legend come from
//! `PlotStyle`.

use std::error::Error;
use std::path::Path;

use plotters::prelude::*;

use crate::domain::PlotStyle;
use crate::error::{AppError, EXIT_IO};
use crate::plot::TextSafeBackend;

const DATA_COLOR: RGBColor = RGBColor(31, 119, 180);
const FIT_COLOR: RGBColor = RGBColor(255, 127, 14);

/// A render-only description of one figure.
///
/// All series and bounds are computed before `render_png` so drawing stays
/// separate from data prep.
pub struct Figure<'a> {
    pub title: &'a str,
    pub data: &'a [(f64, f64)],
    pub fit: Option<&'a [(f64, f64)]>,
    pub style: &'a PlotStyle,
}

impl Figure<'_> {
    /// `(x_range, y_range)`, honoring fixed ranges from the style.
    pub fn bounds(&self) -> ((f64, f64), (f64, f64)) {
        let fit = self.fit.unwrap_or(&[]);
        let all = || self.data.iter().chain(fit.iter());

        let x = self
            .style
            .x_range
            .unwrap_or_else(|| padded_extent(all().map(|p| p.0)));
        let y = self
            .style
            .y_range
            .unwrap_or_else(|| padded_extent(all().map(|p| p.1)));
        (x, y)
    }
}

/// Render `figure` to `path`, replacing any existing file.
pub fn render_png(path: &Path, figure: &Figure) -> Result<(), AppError> {
    draw(path, figure).map_err(|e| {
        AppError::new(EXIT_IO, format!("Failed to write plot '{}': {e}", path.display()))
    })
}

fn draw(path: &Path, figure: &Figure) -> Result<(), Box<dyn Error>> {
    let style = figure.style;
    let backend = BitMapBackend::new(path, (style.width, style.height));
    let root = TextSafeBackend::new(backend).into_drawing_area();
    root.fill(&WHITE)?;

    let ((x0, x1), (y0, y1)) = figure.bounds();
    let mut chart = ChartBuilder::on(&root)
        .caption(figure.title, ("sans-serif", 20))
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x0..x1, y0..y1)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_desc(style.x_label.as_str())
        .y_desc(style.y_label.as_str())
        .draw()?;

    chart
        .draw_series(LineSeries::new(figure.data.iter().copied(), &DATA_COLOR))?
        .label("Data")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], DATA_COLOR));

    if let Some(fit) = figure.fit {
        chart
            .draw_series(LineSeries::new(fit.iter().copied(), &FIT_COLOR))?
            .label("Line of best fit")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], FIT_COLOR));
    }

    if style.legend {
        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
    }

    root.present()?;
    Ok(())
}

/// Min/max of the finite values, widened so a flat series still has a range.
fn padded_extent(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));

    if !lo.is_finite() {
        return (0.0, 1.0);
    }
    if hi > lo {
        let pad = (hi - lo) * 0.05;
        return (lo - pad, hi + pad);
    }
    let pad = if lo == 0.0 { 0.5 } else { lo.abs() * 0.05 };
    (lo - pad, hi + pad)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extent_pads_range() {
        let (lo, hi) = padded_extent([0.0, 10.0].into_iter());
        assert!((lo + 0.5).abs() < 1e-12);
        assert!((hi - 10.5).abs() < 1e-12);
    }

    #[test]
    fn extent_handles_flat_and_empty_series() {
        assert_eq!(padded_extent([0.0, 0.0].into_iter()), (-0.5, 0.5));
        let (lo, hi) = padded_extent([4.0].into_iter());
        assert!((lo - 3.8).abs() < 1e-12 && (hi - 4.2).abs() < 1e-12);
        assert_eq!(padded_extent(std::iter::empty()), (0.0, 1.0));
        assert_eq!(padded_extent([f64::NAN].into_iter()), (0.0, 1.0));
    }

    #[test]
    fn fixed_ranges_override_data() {
        let style = PlotStyle {
            x_range: Some((0.0, 200.0)),
            y_range: Some((0.0, 1.0)),
            ..PlotStyle::default()
        };
        let data = [(1.0, 5.0), (2.0, 6.0)];
        let figure = Figure {
            title: "t",
            data: &data,
            fit: None,
            style: &style,
        };
        assert_eq!(figure.bounds(), ((0.0, 200.0), (0.0, 1.0)));
    }

    #[test]
    fn bounds_include_fit_curve() {
        let style = PlotStyle::default();
        let data = [(0.0, 0.0), (1.0, 1.0)];
        let fit = [(0.0, -1.0), (1.0, 3.0)];
        let figure = Figure {
            title: "t",
            data: &data,
            fit: Some(&fit),
            style: &style,
        };
        let (_, (y0, y1)) = figure.bounds();
        assert!(y0 < -1.0 && y1 > 3.0);
    }

    #[test]
    fn writes_png_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plot_output.png");
        let style = PlotStyle::default();
        let data = [(0.0, 3.0), (1.0, 5.0), (2.0, 7.0)];
        let figure = Figure {
            title: "plot.csv",
            data: &data,
            fit: Some(&data),
            style: &style,
        };
        render_png(&path, &figure).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"\x89PNG"));
    }
}
