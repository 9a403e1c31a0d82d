//! Sweep parameter table.

use std::path::Path;

use serde::{Deserialize, Serialize};
use sweep_types::LoadResult;

use crate::loaders::read_keyed_table;

/// Header of the column holding comma separated sweep values.
pub const SWEEP_VALUES_COLUMN: &str = "sweep_values";

/// Mapping from parameter name to the ordered values to sweep.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterTable {
    entries: Vec<(String, Vec<String>)>,
}

impl ParameterTable {
    /// Load a `parameter\tsweep_values` file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> LoadResult<Self> {
        let rows = read_keyed_table(path, SWEEP_VALUES_COLUMN)?;
        Ok(Self::from_rows(rows))
    }

    /// Build from raw `(name, "v1,v2,...")` rows. Values are split on `,`
    /// verbatim: no trimming, sorting or de-duplication.
    pub fn from_rows<I, K, V>(rows: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        let entries = rows
            .into_iter()
            .map(|(name, raw)| {
                let values = raw.as_ref().split(',').map(str::to_string).collect();
                (name.into(), values)
            })
            .collect();
        Self { entries }
    }

    /// Values for `name`, without any side effects.
    pub fn lookup(&self, name: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, values)| values.as_slice())
    }

    /// Values for `name`. An absent parameter is not an error: a warning is
    /// emitted and a single empty string is returned, which then flows into
    /// the generated commands as a literal value.
    pub fn get_param(&self, name: &str) -> Vec<String> {
        match self.lookup(name) {
            Some(values) => values.to_vec(),
            None => {
                tracing::warn!("Warning! No parameter detected of name: {}", name);
                vec![String::new()]
            }
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Parameter names in file order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
