//! CSV ingestion: turns uploaded files into [`Dataset`] values.
//!
//! Failures here are *input errors* in the dashboard's taxonomy: they are
//! reported for the one offending file and the caller continues with the
//! remaining uploads.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use log::warn;
use thiserror::Error;

use crate::model::{Column, Dataset, Value};

/// Why a single uploaded file could not be turned into a dataset.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be opened or read.
    #[error("failed to read {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: io::Error,
    },
    /// The file has no content at all.
    #[error("the file {name} is empty")]
    Empty { name: String },
    /// The file parsed to a header row with no column names.
    #[error("the file {name} has no columns")]
    NoColumns { name: String },
    /// The CSV structure is malformed (e.g. ragged rows).
    #[error("parsing error in {name}: {source}")]
    Malformed {
        name: String,
        #[source]
        source: csv::Error,
    },
}

/// Loads a dataset from a CSV file on disk.
///
/// The dataset's display name is the file name component of `path`.
pub fn load_dataset(path: &Path) -> Result<Dataset, LoadError> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let file = File::open(path).map_err(|source| LoadError::Io {
        name: name.clone(),
        source,
    })?;
    let len = file
        .metadata()
        .map_err(|source| LoadError::Io {
            name: name.clone(),
            source,
        })?
        .len();
    if len == 0 {
        return Err(LoadError::Empty { name });
    }

    read_dataset(&name, BufReader::new(file))
}

/// Parses CSV content from any reader into a dataset named `name`.
pub fn read_dataset(name: &str, reader: impl Read) -> Result<Dataset, LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|source| LoadError::Malformed {
            name: name.to_owned(),
            source,
        })?
        .clone();
    if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
        return Err(LoadError::NoColumns {
            name: name.to_owned(),
        });
    }

    let mut columns: Vec<Column> = headers
        .iter()
        .map(|h| Column::new(h.trim(), Vec::new()))
        .collect();

    for record in rdr.records() {
        let record = record.map_err(|source| LoadError::Malformed {
            name: name.to_owned(),
            source,
        })?;
        for (index, column) in columns.iter_mut().enumerate() {
            let field = record.get(index).unwrap_or("");
            column.push(infer_value(field));
        }
    }

    let mut dataset = Dataset::new(name);
    for column in columns {
        dataset.push_column(column);
    }
    if dataset.is_empty() {
        warn!("the file {name} loaded but has no data");
    }
    Ok(dataset)
}

/// Infers the scalar type of one CSV field.
///
/// Tries integer, then float, then boolean; anything else is text, and an
/// empty field is a missing cell.
fn infer_value(field: &str) -> Value {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    if let Ok(v) = trimmed.parse::<i64>() {
        return Value::Int(v);
    }
    if let Ok(v) = trimmed.parse::<f64>() {
        return Value::Float(v);
    }
    if trimmed.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if trimmed.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }
    Value::Text(trimmed.to_owned())
}
