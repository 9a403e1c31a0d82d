//! Sweep settings and the job plan built from them.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sweep_config::ParameterTable;
use sweep_types::{Algorithm, Dataset, Dimension, JobCommand, WEIGHTS_PARAM};
use uuid::Uuid;

use crate::grid::{expand_grid, grid_size, Axis, Combination};

/// Unique sweep identifier.
pub type SweepId = Uuid;

pub const DEFAULT_PYTHON_PATH: &str = "~/.conda/envs/tybalt-gpu/bin/python";
pub const DEFAULT_SCRIPT: &str = "scripts/vae_pancancer.py";
pub const DEFAULT_PARAM_FOLDER: &str = "param_sweep";
pub const DEFAULT_CONDA_ENV: &str = "tybalt-gpu";

/// Value of the `weights` parameter that adds `--untied_weights`.
pub const UNTIED_WEIGHTS: &str = "untied";

/// Everything about a sweep that does not come from the parameter table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepSettings {
    pub dataset: Dataset,
    pub algorithm: Algorithm,

    /// Interpreter placed first in every command.
    pub python_path: String,

    /// Training script. Ignored for algorithms that force their own script.
    pub script: String,

    /// Folder that receives one result file per job.
    pub param_folder: PathBuf,

    /// Run on this machine instead of submitting to the scheduler. Local
    /// commands are not wrapped in environment activation.
    pub local: bool,

    /// Conda environment activated ahead of scheduled commands.
    pub conda_env: String,
}

impl Default for SweepSettings {
    fn default() -> Self {
        Self {
            dataset: Dataset::default(),
            algorithm: Algorithm::default(),
            python_path: DEFAULT_PYTHON_PATH.to_string(),
            script: DEFAULT_SCRIPT.to_string(),
            param_folder: PathBuf::from(DEFAULT_PARAM_FOLDER),
            local: false,
            conda_env: DEFAULT_CONDA_ENV.to_string(),
        }
    }
}

impl SweepSettings {
    pub fn new(dataset: Dataset, algorithm: Algorithm) -> Self {
        Self {
            dataset,
            algorithm,
            ..Self::default()
        }
    }

    pub fn with_python_path(mut self, path: impl Into<String>) -> Self {
        self.python_path = path.into();
        self
    }

    pub fn with_script(mut self, script: impl Into<String>) -> Self {
        self.script = script.into();
        self
    }

    pub fn with_param_folder(mut self, folder: impl Into<PathBuf>) -> Self {
        self.param_folder = folder.into();
        self
    }

    pub fn with_local(mut self, local: bool) -> Self {
        self.local = local;
        self
    }

    pub fn with_conda_env(mut self, env: impl Into<String>) -> Self {
        self.conda_env = env.into();
        self
    }

    /// Script actually invoked by the jobs.
    pub fn effective_script(&self) -> &str {
        self.algorithm
            .script_override()
            .unwrap_or(self.script.as_str())
    }

    /// Environment activation tokens, empty for local runs.
    pub fn activation_prefix(&self) -> Vec<String> {
        if self.local {
            return Vec::new();
        }
        vec![
            "source".to_string(),
            "activate".to_string(),
            self.conda_env.clone(),
            "&&".to_string(),
        ]
    }

    /// Result path for one combination, inside `param_folder`.
    pub fn output_path(&self, combo: &Combination) -> PathBuf {
        self.param_folder
            .join(output_filename(combo, self.dataset))
    }

    fn command(&self, combo: &Combination, output: &Path, untied_weights: bool) -> JobCommand {
        let mut tokens = self.activation_prefix();
        tokens.push(self.python_path.clone());
        tokens.push(self.effective_script().to_string());
        tokens.push("--dataset".to_string());
        tokens.push(self.dataset.to_string());
        for (dim, value) in combo {
            tokens.push(dim.flag());
            tokens.push(value.clone());
        }
        tokens.push("--output_filename".to_string());
        tokens.push(output.to_string_lossy().into_owned());
        tokens.push("--scale".to_string());
        if untied_weights {
            tokens.push("--untied_weights".to_string());
        }
        JobCommand::new(tokens)
    }
}

/// `paramsweep_{v1}{s1}_{v2}{s2}_..._{dataset}.tsv`
pub fn output_filename(combo: &Combination, dataset: Dataset) -> String {
    let mut parts: Vec<String> = combo
        .iter()
        .map(|(dim, value)| format!("{value}{}", dim.filename_suffix()))
        .collect();
    parts.push(dataset.to_string());
    format!("paramsweep_{}.tsv", parts.join("_"))
}

/// One training job of a sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepJob {
    pub sweep_id: SweepId,

    /// Position in submission order (0-indexed).
    pub job_number: usize,

    pub parameters: Combination,
    pub output_filename: PathBuf,
    pub command: JobCommand,
}

impl SweepJob {
    /// Swept value for `dim`, if this job's algorithm sweeps it.
    pub fn value(&self, dim: Dimension) -> Option<&str> {
        self.parameters
            .iter()
            .find(|(d, _)| *d == dim)
            .map(|(_, v)| v.as_str())
    }
}

/// Fully built, ordered list of jobs for one sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepPlan {
    pub id: SweepId,
    pub settings: SweepSettings,
    pub jobs: Vec<SweepJob>,

    /// Parameters the algorithm needed but the table did not define. Each
    /// was replaced by an empty string in the generated commands.
    pub missing_parameters: Vec<String>,
}

impl SweepPlan {
    /// Build every job for `settings.algorithm` from the parameter table.
    pub fn build(params: &ParameterTable, settings: SweepSettings) -> Self {
        let id = Uuid::new_v4();
        let algorithm = settings.algorithm;
        let mut missing_parameters = Vec::new();

        // Every recognised name goes through the extractor, so an absent row
        // warns even when this algorithm does not sweep it.
        let mut extracted: HashMap<&str, Vec<String>> = Dimension::ALL
            .iter()
            .map(|dim| dim.param_name())
            .chain([WEIGHTS_PARAM])
            .map(|name| (name, params.get_param(name)))
            .collect();
        let mut take = |name: &'static str| {
            if !params.contains(name) {
                missing_parameters.push(name.to_string());
            }
            extracted
                .remove(name)
                .unwrap_or_else(|| vec![String::new()])
        };

        let axes: Vec<Axis> = algorithm
            .dimensions()
            .iter()
            .map(|dim| (*dim, take(dim.param_name())))
            .collect();

        let untied_weights = algorithm.uses_weights()
            && take(WEIGHTS_PARAM)
                .first()
                .is_some_and(|w| w == UNTIED_WEIGHTS);

        tracing::debug!(
            sweep = %id,
            "Expanding {} grid of {:?} points",
            algorithm,
            grid_size(&axes)
        );

        let jobs: Vec<SweepJob> = expand_grid(&axes)
            .into_iter()
            .enumerate()
            .map(|(job_number, parameters)| {
                let output_filename = settings.output_path(&parameters);
                let command = settings.command(&parameters, &output_filename, untied_weights);
                SweepJob {
                    sweep_id: id,
                    job_number,
                    parameters,
                    output_filename,
                    command,
                }
            })
            .collect();

        tracing::info!(
            sweep = %id,
            algorithm = %algorithm,
            dataset = %settings.dataset,
            "Built {} jobs",
            jobs.len()
        );

        Self {
            id,
            settings,
            jobs,
            missing_parameters,
        }
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn commands(&self) -> impl Iterator<Item = &JobCommand> {
        self.jobs.iter().map(|job| &job.command)
    }

    /// Serialize the jobs as JSON lines, one object per job.
    pub fn to_json_lines(&self) -> serde_json::Result<String> {
        let mut out = String::new();
        for job in &self.jobs {
            out.push_str(&serde_json::to_string(job)?);
            out.push('\n');
        }
        Ok(out)
    }
}
