//! Data structures describing datasets, derived artifacts, and the logical
//! content of a report.
//!
//! The types in this module form a rendering-agnostic model: the report
//! assembler turns a [`Block`] sequence into `genpdf` elements, but the
//! sequence itself can be built and inspected without touching the PDF
//! stack, which keeps the assembly contract easy to test.

use std::fmt;

/// A single scalar cell value.
///
/// Columns may mix variants freely.  Frequency counting and table
/// rendering both go through the [`Display`][fmt::Display] form, so two
/// values are considered equal when their stringified representations
/// match.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// Signed integer.
    Int(i64),
    /// Floating point number.
    Float(f64),
    /// Boolean flag.
    Bool(bool),
    /// Free-form text.
    Text(String),
    /// Missing cell.
    Null,
}

impl Value {
    /// Returns the numeric form of the value, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            Value::Bool(v) => Some(if *v { 1.0 } else { 0.0 }),
            Value::Text(_) | Value::Null => None,
        }
    }

    /// Returns `true` for missing cells.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Text(v) => f.write_str(v),
            Value::Null => Ok(()),
        }
    }
}

/// A named, ordered sequence of values.
#[derive(Clone, Debug, PartialEq)]
pub struct Column {
    name: String,
    values: Vec<Value>,
}

impl Column {
    /// Creates a column from a name and its values.
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Returns the column name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the column values in row order.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Appends a value to the column.
    pub fn push(&mut self, value: Value) {
        self.values.push(value);
    }
}

/// An uploaded dataset: ordered named columns identified by a display name
/// (the source filename).
///
/// Datasets live for the duration of a session and are never persisted.
#[derive(Clone, Debug, PartialEq)]
pub struct Dataset {
    name: String,
    columns: Vec<Column>,
}

impl Dataset {
    /// Creates an empty dataset with the given display name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    /// Returns the display name (typically the source filename).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the columns in their original order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Looks up a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    /// Number of rows (length of the longest column).
    pub fn row_count(&self) -> usize {
        self.columns
            .iter()
            .map(|c| c.values().len())
            .max()
            .unwrap_or(0)
    }

    /// Returns `true` when the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    /// Appends a column and returns the updated dataset.
    pub fn with_column(mut self, name: impl Into<String>, values: Vec<Value>) -> Self {
        self.columns.push(Column::new(name, values));
        self
    }

    /// Appends a column in place.
    pub fn push_column(&mut self, column: Column) {
        self.columns.push(column);
    }
}

/// Per-column frequency summary: up to five `(value, count)` pairs in
/// descending count order, ties broken by first occurrence.
///
/// Derived on demand by [`crate::summary::summarize_dataset`]; never
/// persisted.
#[derive(Clone, Debug, PartialEq)]
pub struct ColumnSummary {
    column: String,
    top_values: Vec<(String, usize)>,
}

impl ColumnSummary {
    /// Creates a summary for `column` from already-ranked pairs.
    pub fn new(column: impl Into<String>, top_values: Vec<(String, usize)>) -> Self {
        Self {
            column: column.into(),
            top_values,
        }
    }

    /// Returns the summarized column name.
    pub fn column(&self) -> &str {
        &self.column
    }

    /// Returns the ranked `(value, count)` pairs.
    pub fn top_values(&self) -> &[(String, usize)] {
        &self.top_values
    }

    /// Joins the ranked values with `", "` for table cells.
    pub fn joined_values(&self) -> String {
        self.top_values
            .iter()
            .map(|(value, _)| value.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A rendered chart ready for embedding: title, lookup key, and the PNG
/// bytes with their pixel dimensions.
///
/// Artifacts are immutable after creation.  The key is unique per
/// (kind, X, Y, dataset) combination so that re-rendering with identical
/// parameters replaces the previous artifact instead of duplicating it.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartArtifact {
    key: String,
    title: String,
    png: Vec<u8>,
    width_px: u32,
    height_px: u32,
}

impl ChartArtifact {
    /// Creates an artifact from its parts.
    pub fn new(
        key: impl Into<String>,
        title: impl Into<String>,
        png: Vec<u8>,
        width_px: u32,
        height_px: u32,
    ) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            png,
            width_px,
            height_px,
        }
    }

    /// Returns the lookup key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the chart title shown above the image.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the encoded PNG bytes.
    pub fn png(&self) -> &[u8] {
        &self.png
    }

    /// Returns the raster width in pixels.
    pub fn width_px(&self) -> u32 {
        self.width_px
    }

    /// Returns the raster height in pixels.
    pub fn height_px(&self) -> u32 {
        self.height_px
    }
}

/// Heading prominence within the report.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeadingLevel {
    /// The centered document title.
    Title,
    /// A top-level section ("Data Summaries", "Visualizations").
    Section,
    /// A per-dataset subsection.
    Subsection,
    /// A centered chart title directly above its image.
    ChartTitle,
}

/// One structural unit of the assembled report.
#[derive(Clone, Debug, PartialEq)]
pub enum Block {
    /// A heading at the given level.
    Heading(HeadingLevel, String),
    /// A two-column summary table: `(column name, joined top-5 values)`
    /// rows, header implicit.
    Table(SummaryTable),
    /// A chart image with its caption title.
    Image(ImageBlock),
    /// Plain body text.
    Paragraph(String),
    /// Explicit page break.
    PageBreak,
}

impl Block {
    /// Convenience helper for a heading block.
    pub fn heading(level: HeadingLevel, text: impl Into<String>) -> Self {
        Self::Heading(level, text.into())
    }

    /// Convenience helper for a paragraph block.
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::Paragraph(text.into())
    }
}

/// The two-column body of a dataset summary table.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SummaryTable {
    rows: Vec<(String, String)>,
}

impl SummaryTable {
    /// Creates a table from `(column name, joined values)` rows.
    pub fn new(rows: Vec<(String, String)>) -> Self {
        Self { rows }
    }

    /// Returns the body rows (the header row is implicit).
    pub fn rows(&self) -> &[(String, String)] {
        &self.rows
    }
}

/// Image content plus the title used for its `Figure:` caption.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageBlock {
    title: String,
    png: Vec<u8>,
}

impl ImageBlock {
    /// Creates an image block from a chart artifact.
    pub fn from_artifact(artifact: &ChartArtifact) -> Self {
        Self {
            title: artifact.title().to_owned(),
            png: artifact.png().to_vec(),
        }
    }

    /// Returns the chart title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the encoded image bytes.
    pub fn png(&self) -> &[u8] {
        &self.png
    }
}
