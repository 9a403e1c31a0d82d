use std::collections::HashSet;
use std::path::Path;

use csv::ReaderBuilder;
use sweep_types::{LoadError, LoadResult};

/// Read a tab separated two-column style table into ordered `(key, value)`
/// rows.
///
/// The first column is the key. `value_column` must name one of the other
/// header columns; extra columns are ignored. Rows keep file order and keys
/// must be unique.
pub fn read_keyed_table<P: AsRef<Path>>(
    file_path: P,
    value_column: &str,
) -> LoadResult<Vec<(String, String)>> {
    let path = file_path.as_ref();
    let display = path.display().to_string();
    tracing::info!("Loading table from: {}", path.display());

    if !path.exists() {
        return Err(LoadError::FileNotFound { path: display });
    }

    let mut rdr = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .from_path(path)
        .map_err(|e| malformed(&display, &e))?;

    let headers = rdr.headers().map_err(|e| malformed(&display, &e))?.clone();
    tracing::debug!("Table headers: {:?}", headers);

    let value_idx = headers
        .iter()
        .skip(1)
        .position(|h| h == value_column)
        .map(|i| i + 1)
        .ok_or_else(|| LoadError::MissingColumn {
            path: display.clone(),
            column: value_column.to_string(),
        })?;

    let mut seen = HashSet::new();
    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(|e| malformed(&display, &e))?;
        let key = record.get(0).unwrap_or_default().to_string();
        let value = record.get(value_idx).unwrap_or_default().to_string();

        if !seen.insert(key.clone()) {
            return Err(LoadError::DuplicateKey { path: display, key });
        }
        rows.push((key, value));
    }

    tracing::info!("Loaded {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// Create the results folder (and parents) if it does not exist yet.
pub fn prepare_output_dir<P: AsRef<Path>>(dir: P) -> std::io::Result<()> {
    let dir = dir.as_ref();
    if !dir.exists() {
        tracing::info!("Creating output directory {}", dir.display());
        std::fs::create_dir_all(dir)?;
    }
    Ok(())
}

fn malformed(path: &str, err: &csv::Error) -> LoadError {
    LoadError::Malformed {
        path: path.to_string(),
        line: err.position().map(|p| p.line()).unwrap_or(0),
        message: err.to_string(),
    }
}
