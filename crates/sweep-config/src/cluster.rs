//! Scheduler resource configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use sweep_types::{LoadError, LoadResult};

use crate::loaders::read_keyed_table;

/// Header of the column holding each variable's value.
pub const ASSIGN_COLUMN: &str = "assign";

/// Resources requested for every job of a sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterConfig {
    /// Queue that schedules and runs the jobs.
    pub queue: String,
    /// GPUs requested per job.
    pub num_gpus: String,
    /// How many of those GPUs may run concurrent jobs.
    pub num_gpus_shared: String,
    /// Requested run time per job, in the scheduler's format.
    pub walltime: String,
}

impl ClusterConfig {
    pub fn new(
        queue: impl Into<String>,
        num_gpus: impl Into<String>,
        num_gpus_shared: impl Into<String>,
        walltime: impl Into<String>,
    ) -> Self {
        Self {
            queue: queue.into(),
            num_gpus: num_gpus.into(),
            num_gpus_shared: num_gpus_shared.into(),
            walltime: walltime.into(),
        }
    }

    /// Load a `variable\tassign` file. All four variables are required.
    pub fn from_path<P: AsRef<Path>>(path: P) -> LoadResult<Self> {
        let path = path.as_ref();
        let rows = read_keyed_table(path, ASSIGN_COLUMN)?;
        Self::from_rows(&path.display().to_string(), rows)
    }

    fn from_rows(source: &str, rows: Vec<(String, String)>) -> LoadResult<Self> {
        let take = |name: &str| {
            rows.iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.clone())
                .ok_or_else(|| LoadError::MissingVariable {
                    path: source.to_string(),
                    name: name.to_string(),
                })
        };

        let config = Self {
            queue: take("queue")?,
            num_gpus: take("num_gpus")?,
            num_gpus_shared: take("num_gpus_shared")?,
            walltime: take("walltime")?,
        };

        for (key, _) in &rows {
            if !matches!(
                key.as_str(),
                "queue" | "num_gpus" | "num_gpus_shared" | "walltime"
            ) {
                tracing::debug!("Ignoring unrecognised cluster variable: {}", key);
            }
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn loads_all_variables() {
        let file = write_config(
            "variable\tassign\nqueue\tgpu\nnum_gpus\t2\nnum_gpus_shared\t1\nwalltime\t10:00\n",
        );
        let config = ClusterConfig::from_path(file.path()).unwrap();
        assert_eq!(config, ClusterConfig::new("gpu", "2", "1", "10:00"));
    }

    #[test]
    fn extra_variables_are_ignored() {
        let file = write_config(
            "variable\tassign\nqueue\tcpu\nnum_gpus\t0\nnum_gpus_shared\t0\nwalltime\t1:00\nmemory\t8G\n",
        );
        let config = ClusterConfig::from_path(file.path()).unwrap();
        assert_eq!(config.queue, "cpu");
    }

    #[test]
    fn missing_variable_is_fatal() {
        let file = write_config("variable\tassign\nqueue\tgpu\nnum_gpus\t2\nwalltime\t10:00\n");
        let err = ClusterConfig::from_path(file.path()).unwrap_err();
        match err {
            LoadError::MissingVariable { name, .. } => assert_eq!(name, "num_gpus_shared"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn serde_round_trip() {
        let config = ClusterConfig::new("gpu", "2", "0", "24:00");
        let json = serde_json::to_string(&config).unwrap();
        let back: ClusterConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }
}
