//! The chart rasterizer: renders a selected (X, Y) column pair of a
//! dataset to a fixed-aspect PNG using one of three visual encodings.
//!
//! The scene is assembled as SVG on a 2:1 canvas (the dashboard's 8×4
//! figure) and rasterized through [`png::svg_to_png`].  The resulting
//! [`ChartArtifact`] carries a lookup key unique per
//! (kind, X, Y, dataset) so a re-render with identical parameters
//! replaces the previous artifact in the session.

pub mod axes;
pub mod canvas;
pub mod png;

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::model::{ChartArtifact, Dataset};
use axes::Axis;
use canvas::{Canvas, TextAnchor};

/// Canvas size in abstract pixels (8×4 units at 80 px per unit).
const FIG_WIDTH: f64 = 640.0;
const FIG_HEIGHT: f64 = 320.0;
/// Supersampling factor applied when encoding the PNG.
const RASTER_SCALE: f32 = 2.0;

const TITLE_SIZE: f64 = 15.0;
const LABEL_SIZE: f64 = 13.0;
const TICK_SIZE: f64 = 11.0;
const SERIES_COLOR: &str = "#1f77b4";
const AXIS_COLOR: &str = "#444444";

/// The closed set of supported visual encodings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChartKind {
    /// Y against X as a polyline.
    Line,
    /// One discrete bar per row.
    Bar,
    /// Filled region under the line.
    Area,
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ChartKind::Line => "Line",
            ChartKind::Bar => "Bar",
            ChartKind::Area => "Area",
        })
    }
}

impl FromStr for ChartKind {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "line" => Ok(ChartKind::Line),
            "bar" => Ok(ChartKind::Bar),
            "area" => Ok(ChartKind::Area),
            other => Err(ChartError::UnknownKind(other.to_owned())),
        }
    }
}

/// Why a chart could not be rendered.
///
/// Column problems are input errors in the dashboard's taxonomy (skip
/// this one chart, keep going); SVG/PNG problems are rendering errors
/// (abort this generation, surface no partial artifact).
#[derive(Debug, Error)]
pub enum ChartError {
    /// Unsupported chart kind string.
    #[error("unknown chart kind '{0}', expected line, bar, or area")]
    UnknownKind(String),
    /// The dataset has no column with the requested name.
    #[error("dataset {dataset} has no column named {column}")]
    UnknownColumn { dataset: String, column: String },
    /// The Y column contains values with no numeric form.
    #[error("column {column} is not numeric and cannot be plotted on the Y axis")]
    NonNumericY { column: String },
    /// The SVG scene could not be parsed back for rasterization.
    #[error("SVG assembly failed: {0}")]
    Svg(String),
    /// Pixmap allocation or PNG encoding failed.
    #[error("PNG encoding failed: {0}")]
    Png(String),
}

/// Builds the chart title: `"{kind} of {Y} vs {X}"`.
pub fn chart_title(kind: ChartKind, y: &str, x: &str) -> String {
    format!("{kind} of {y} vs {x}")
}

/// Builds the artifact lookup key: `"{kind} ({Y} vs {X}) for {dataset}"`.
pub fn artifact_key(kind: ChartKind, y: &str, x: &str, dataset: &str) -> String {
    format!("{kind} ({y} vs {x}) for {dataset}")
}

/// Renders a chart of `y` against `x` from `dataset`.
pub fn render_chart(
    dataset: &Dataset,
    x: &str,
    y: &str,
    kind: ChartKind,
) -> Result<ChartArtifact, ChartError> {
    let series = Series::extract(dataset, x, y)?;
    let svg = draw(&series, x, y, kind);
    let (bytes, width_px, height_px) = png::svg_to_png(&svg, RASTER_SCALE)?;

    Ok(ChartArtifact::new(
        artifact_key(kind, y, x, dataset.name()),
        chart_title(kind, y, x),
        bytes,
        width_px,
        height_px,
    ))
}

/// The plottable pairs extracted from a dataset.
struct Series {
    /// X positions: the numeric values themselves, or sequential
    /// category indices.
    xs: Vec<f64>,
    ys: Vec<f64>,
    /// Tick labels for a categorical X axis; `None` when X is numeric.
    categories: Option<Vec<String>>,
}

impl Series {
    fn extract(dataset: &Dataset, x: &str, y: &str) -> Result<Self, ChartError> {
        let x_col = dataset.column(x).ok_or_else(|| ChartError::UnknownColumn {
            dataset: dataset.name().to_owned(),
            column: x.to_owned(),
        })?;
        let y_col = dataset.column(y).ok_or_else(|| ChartError::UnknownColumn {
            dataset: dataset.name().to_owned(),
            column: y.to_owned(),
        })?;

        let numeric_x = x_col
            .values()
            .iter()
            .all(|v| v.is_null() || v.as_f64().is_some());

        let mut xs = Vec::new();
        let mut ys = Vec::new();
        let mut categories = Vec::new();
        let rows = x_col.values().len().min(y_col.values().len());
        for row in 0..rows {
            let xv = &x_col.values()[row];
            let yv = &y_col.values()[row];
            if xv.is_null() || yv.is_null() {
                continue;
            }
            let y_num = yv.as_f64().ok_or_else(|| ChartError::NonNumericY {
                column: y.to_owned(),
            })?;
            if numeric_x {
                // Checked non-null numeric above.
                xs.push(xv.as_f64().unwrap_or_default());
            } else {
                xs.push(categories.len() as f64);
                categories.push(xv.to_string());
            }
            ys.push(y_num);
        }

        Ok(Self {
            xs,
            ys,
            categories: if numeric_x { None } else { Some(categories) },
        })
    }

    fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }
}

fn draw(series: &Series, x_name: &str, y_name: &str, kind: ChartKind) -> String {
    let mut canvas = Canvas::new(FIG_WIDTH, FIG_HEIGHT);

    let x_axis = match &series.categories {
        Some(labels) => Axis::categorical(labels).with_label(x_name),
        None => {
            let (min, max) = min_max(&series.xs);
            Axis::auto_linear(min, max, 7).with_label(x_name)
        }
    };
    let y_axis = {
        let (mut min, mut max) = min_max(&series.ys);
        // Bars and filled areas are anchored at zero.
        if matches!(kind, ChartKind::Bar | ChartKind::Area) {
            min = min.min(0.0);
            max = max.max(0.0);
        }
        Axis::auto_linear(min, max, 6).with_label(y_name)
    };

    let area = PlotArea::fit(&canvas, &x_axis, &y_axis);
    let title = chart_title(kind, y_name, x_name);
    canvas.text(
        area.left + area.width / 2.0,
        area.top - 10.0,
        &title,
        TITLE_SIZE,
        TextAnchor::Middle,
    );

    draw_axes(&mut canvas, &area, &x_axis, &y_axis);

    if !series.is_empty() {
        let points: Vec<(f64, f64)> = series
            .xs
            .iter()
            .zip(series.ys.iter())
            .map(|(&x, &y)| {
                (
                    x_axis.data_to_pixel(x, area.left, area.right()),
                    y_axis.data_to_pixel(y, area.bottom(), area.top),
                )
            })
            .collect();
        let baseline = y_axis.data_to_pixel(0.0, area.bottom(), area.top);

        match kind {
            ChartKind::Line => {
                canvas.polyline(&points, SERIES_COLOR, 1.5);
            }
            ChartKind::Area => {
                let mut region = points.clone();
                region.push((points[points.len() - 1].0, baseline));
                region.push((points[0].0, baseline));
                canvas.polygon(&region, SERIES_COLOR, 0.5);
                canvas.polyline(&points, SERIES_COLOR, 1.5);
            }
            ChartKind::Bar => {
                let slot = bar_slot(&points, area.width);
                let bar_w = slot * 0.8;
                for &(px, py) in &points {
                    let (top, bottom) = if py <= baseline {
                        (py, baseline)
                    } else {
                        (baseline, py)
                    };
                    canvas.rect(px - bar_w / 2.0, top, bar_w, bottom - top, SERIES_COLOR, 1.0);
                }
            }
        }
    }

    canvas.finish_svg()
}

/// The rectangle charts are drawn into, sized from the tick labels.
struct PlotArea {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
    rotate_x_labels: bool,
}

impl PlotArea {
    fn right(&self) -> f64 {
        self.left + self.width
    }

    fn bottom(&self) -> f64 {
        self.top + self.height
    }

    fn fit(canvas: &Canvas, x_axis: &Axis, y_axis: &Axis) -> Self {
        let max_y_tick = y_axis
            .ticks()
            .iter()
            .map(|(_, l)| canvas.measure_text(l, TICK_SIZE))
            .fold(0.0_f64, f64::max);
        let left = 15.0 + max_y_tick + 8.0 + LABEL_SIZE + 6.0;
        let right = 15.0;
        let top = TITLE_SIZE + 20.0;

        let plot_width = canvas.width() - left - right;
        let total_label_width: f64 = x_axis
            .ticks()
            .iter()
            .map(|(_, l)| canvas.measure_text(l, TICK_SIZE) + 6.0)
            .sum();
        let rotate_x_labels = total_label_width > plot_width;

        let max_x_tick = x_axis
            .ticks()
            .iter()
            .map(|(_, l)| canvas.measure_text(l, TICK_SIZE))
            .fold(0.0_f64, f64::max);
        let tick_band = if rotate_x_labels {
            // Rotated labels extend diagonally below the axis.
            max_x_tick * 0.75 + 10.0
        } else {
            TICK_SIZE + 8.0
        };
        let bottom = 12.0 + tick_band + LABEL_SIZE + 6.0;

        Self {
            left,
            top,
            width: plot_width.max(50.0),
            height: (canvas.height() - top - bottom).max(50.0),
            rotate_x_labels,
        }
    }
}

fn draw_axes(canvas: &mut Canvas, area: &PlotArea, x_axis: &Axis, y_axis: &Axis) {
    canvas.line(area.left, area.top, area.left, area.bottom(), AXIS_COLOR, 1.0);
    canvas.line(
        area.left,
        area.bottom(),
        area.right(),
        area.bottom(),
        AXIS_COLOR,
        1.0,
    );

    for (pos, label) in y_axis.ticks() {
        let py = y_axis.data_to_pixel(*pos, area.bottom(), area.top);
        canvas.line(area.left - 4.0, py, area.left, py, AXIS_COLOR, 1.0);
        canvas.text(area.left - 8.0, py + TICK_SIZE * 0.35, label, TICK_SIZE, TextAnchor::End);
    }

    for (pos, label) in x_axis.ticks() {
        let px = x_axis.data_to_pixel(*pos, area.left, area.right());
        canvas.line(px, area.bottom(), px, area.bottom() + 4.0, AXIS_COLOR, 1.0);
        if area.rotate_x_labels {
            canvas.text_rotated(
                px,
                area.bottom() + TICK_SIZE + 2.0,
                label,
                TICK_SIZE,
                TextAnchor::End,
                -45.0,
            );
        } else {
            canvas.text(
                px,
                area.bottom() + TICK_SIZE + 4.0,
                label,
                TICK_SIZE,
                TextAnchor::Middle,
            );
        }
    }

    canvas.text(
        area.left + area.width / 2.0,
        canvas.height() - 8.0,
        x_axis.label(),
        LABEL_SIZE,
        TextAnchor::Middle,
    );
    canvas.text_rotated(
        14.0,
        area.top + area.height / 2.0,
        y_axis.label(),
        LABEL_SIZE,
        TextAnchor::Middle,
        -90.0,
    );
}

fn bar_slot(points: &[(f64, f64)], plot_width: f64) -> f64 {
    let mut xs: Vec<f64> = points.iter().map(|p| p.0).collect();
    xs.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let min_gap = xs
        .windows(2)
        .map(|w| w[1] - w[0])
        .filter(|gap| *gap > f64::EPSILON)
        .fold(f64::INFINITY, f64::min);
    if min_gap.is_finite() {
        min_gap
    } else {
        plot_width / points.len().max(1) as f64
    }
}

fn min_max(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 1.0);
    }
    values.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
        (lo.min(v), hi.max(v))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Dataset, Value};

    const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];

    fn sample_dataset() -> Dataset {
        Dataset::new("prod.csv")
            .with_column(
                "field",
                vec![
                    Value::Text("Ghawar".into()),
                    Value::Text("Burgan".into()),
                    Value::Text("Safaniya".into()),
                ],
            )
            .with_column(
                "production",
                vec![Value::Int(500), Value::Int(300), Value::Int(420)],
            )
    }

    #[test]
    fn title_and_key_formats() {
        assert_eq!(
            chart_title(ChartKind::Line, "production", "field"),
            "Line of production vs field"
        );
        assert_eq!(
            artifact_key(ChartKind::Area, "production", "field", "prod.csv"),
            "Area (production vs field) for prod.csv"
        );
    }

    #[test]
    fn kinds_parse_case_insensitively() {
        assert_eq!("LINE".parse::<ChartKind>().unwrap(), ChartKind::Line);
        assert_eq!("area".parse::<ChartKind>().unwrap(), ChartKind::Area);
        assert!("pie".parse::<ChartKind>().is_err());
    }

    #[test]
    fn renders_all_kinds_to_png() {
        let ds = sample_dataset();
        for kind in [ChartKind::Line, ChartKind::Bar, ChartKind::Area] {
            let artifact = render_chart(&ds, "field", "production", kind).unwrap();
            assert_eq!(&artifact.png()[..8], &PNG_MAGIC);
            assert_eq!(artifact.title(), chart_title(kind, "production", "field"));
            assert!(artifact.width_px() > artifact.height_px());
        }
    }

    #[test]
    fn keys_differ_per_kind_but_repeat_per_parameters() {
        let ds = sample_dataset();
        let a = render_chart(&ds, "field", "production", ChartKind::Line).unwrap();
        let b = render_chart(&ds, "field", "production", ChartKind::Bar).unwrap();
        let c = render_chart(&ds, "field", "production", ChartKind::Line).unwrap();
        assert_ne!(a.key(), b.key());
        assert_eq!(a.key(), c.key());
    }

    #[test]
    fn unknown_column_is_an_input_error() {
        let ds = sample_dataset();
        let err = render_chart(&ds, "field", "missing", ChartKind::Line).unwrap_err();
        assert!(matches!(err, ChartError::UnknownColumn { .. }));
    }

    #[test]
    fn text_y_column_is_rejected() {
        let ds = sample_dataset();
        let err = render_chart(&ds, "production", "field", ChartKind::Bar).unwrap_err();
        assert!(matches!(err, ChartError::NonNumericY { .. }));
    }

    #[test]
    fn zero_row_dataset_still_renders_axes() {
        let ds = Dataset::new("empty.csv")
            .with_column("x", vec![])
            .with_column("y", vec![]);
        let artifact = render_chart(&ds, "x", "y", ChartKind::Line).unwrap();
        assert_eq!(&artifact.png()[..8], &PNG_MAGIC);
    }

    #[test]
    fn numeric_x_uses_linear_axis() {
        let ds = Dataset::new("ts.csv")
            .with_column("year", vec![Value::Int(2020), Value::Int(2021), Value::Int(2022)])
            .with_column("output", vec![Value::Float(1.5), Value::Float(2.0), Value::Float(1.8)]);
        let series = Series::extract(&ds, "year", "output").unwrap();
        assert!(series.categories.is_none());
        assert_eq!(series.xs, vec![2020.0, 2021.0, 2022.0]);
    }

    #[test]
    fn rows_with_missing_cells_are_skipped() {
        let ds = Dataset::new("gaps.csv")
            .with_column("x", vec![Value::Int(1), Value::Null, Value::Int(3)])
            .with_column("y", vec![Value::Int(10), Value::Int(20), Value::Null]);
        let series = Series::extract(&ds, "x", "y").unwrap();
        assert_eq!(series.xs, vec![1.0]);
        assert_eq!(series.ys, vec![10.0]);
    }
}
