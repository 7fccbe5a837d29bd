//! Elevation CSV loading.
//!
//! The source is a CSV with a header naming at least `id` and `elev_m`; `name`, `lat` and `lon`
//! columns are tolerated and ignored. Some exports arrive with every line break written as the
//! two characters `\n`, which are unescaped before the rows are read.

use crate::error::ElevationError;
use serde::Deserialize;
use std::borrow::Cow;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::info;

const ESCAPED_NEWLINE: &str = "\\n";
const REQUIRED_COLUMNS: [&str; 2] = ["id", "elev_m"];

#[derive(Debug, Deserialize)]
struct ElevationRow {
    id: String,
    #[serde(default)]
    elev_m: Option<f64>,
}

/// Node id to elevation in metres, built once per run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeightMap {
    heights: HashMap<String, f64>,
    rows: usize,
}

impl HeightMap {
    /// Elevation for `id`, or `0.0` when the id has no row.
    pub fn height(&self, id: &str) -> f64 {
        self.heights.get(id).copied().unwrap_or(0.0)
    }

    pub fn get(&self, id: &str) -> Option<f64> {
        self.heights.get(id).copied()
    }

    /// Number of data rows parsed, including rows that repeated an id.
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.heights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }
}

impl FromIterator<(String, f64)> for HeightMap {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        let mut map = HeightMap::default();
        for (id, height) in iter {
            map.heights.insert(id, height);
            map.rows += 1;
        }
        map
    }
}

pub fn load(path: &Path) -> Result<HeightMap, ElevationError> {
    if !path.exists() {
        return Err(ElevationError::NotFound(path.to_path_buf()));
    }
    let raw = fs::read_to_string(path).map_err(|source| ElevationError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let heights = parse(&raw)?;
    info!(rows = heights.rows(), path = %path.display(), "loaded elevation rows");
    Ok(heights)
}

pub fn parse(source: &str) -> Result<HeightMap, ElevationError> {
    let text = unescape_newlines(source);
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|header| header == column) {
            return Err(ElevationError::MissingColumn(column));
        }
    }

    let mut heights = HeightMap::default();
    for row in reader.deserialize::<ElevationRow>() {
        let row = row?;
        heights.heights.insert(row.id, row.elev_m.unwrap_or(0.0));
        heights.rows += 1;
    }

    if heights.rows == 0 {
        return Err(ElevationError::EmptyData);
    }
    Ok(heights)
}

/// Unescapes `\n` sequences, but only when the text has no real line break of its own.
fn unescape_newlines(raw: &str) -> Cow<'_, str> {
    if raw.contains(ESCAPED_NEWLINE) && !raw.replace(ESCAPED_NEWLINE, "").contains('\n') {
        Cow::Owned(raw.replace(ESCAPED_NEWLINE, "\n"))
    } else {
        Cow::Borrowed(raw)
    }
}
