//! # sweep-cli
//!
//! Command-line front end: parses flags, loads the parameter and cluster
//! tables, builds the sweep plan and submits it.

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use sweep_builder::{
    SweepId, SweepPlan, SweepSettings, DEFAULT_CONDA_ENV, DEFAULT_PARAM_FOLDER,
    DEFAULT_PYTHON_PATH, DEFAULT_SCRIPT,
};
use sweep_config::{prepare_output_dir, ClusterConfig, ParameterTable};
use sweep_submit::{submit_all, DryRunSubmitter, JobSubmitter, LsfHelper, DEFAULT_BSUB_PROGRAM};
use sweep_types::{Algorithm, Dataset};

pub const DEFAULT_CONFIG_FILE: &str = "../config/pmacs_config.tsv";

#[derive(Parser, Debug, Clone)]
#[command(
    name = "paramsweep",
    version,
    about = "Generate and submit one training job per hyperparameter combination",
    long_about = None
)]
pub struct Args {
    /// Tab separated parameter file (`parameter`, `sweep_values`).
    #[arg(short = 'p', long = "parameter_file")]
    pub parameter_file: PathBuf,

    /// Dataset to train on.
    #[arg(short = 'x', long, value_enum, default_value_t = Dataset::Tcga)]
    pub dataset: Dataset,

    /// Tab separated cluster configuration (`variable`, `assign`).
    #[arg(
        short = 'c',
        long = "config_file",
        env = "PARAMSWEEP_CONFIG_FILE",
        default_value = DEFAULT_CONFIG_FILE
    )]
    pub config_file: PathBuf,

    /// Which model family to sweep.
    #[arg(short = 'a', long, value_enum, default_value_t = Algorithm::Tybalt)]
    pub algorithm: Algorithm,

    /// Interpreter used inside every job.
    #[arg(short = 's', long = "python_path", default_value = DEFAULT_PYTHON_PATH)]
    pub python_path: String,

    /// Folder receiving one result file per job; created if missing.
    #[arg(short = 'd', long = "param_folder", default_value = DEFAULT_PARAM_FOLDER)]
    pub param_folder: PathBuf,

    /// Training script each job runs (adage always uses its own script).
    #[arg(short = 't', long, default_value = DEFAULT_SCRIPT)]
    pub script: String,

    /// Run jobs on this machine instead of submitting them.
    #[arg(short = 'l', long)]
    pub local: bool,

    /// Conda environment activated ahead of scheduled jobs.
    #[arg(long = "conda_env", default_value = DEFAULT_CONDA_ENV)]
    pub conda_env: String,

    /// Scheduler submission program.
    #[arg(long = "bsub_program", env = "PARAMSWEEP_BSUB", default_value = DEFAULT_BSUB_PROGRAM)]
    pub bsub_program: String,

    /// Print the jobs as JSON lines instead of submitting them.
    #[arg(long = "dry_run")]
    pub dry_run: bool,
}

impl Args {
    pub fn settings(&self) -> SweepSettings {
        SweepSettings::new(self.dataset, self.algorithm)
            .with_python_path(self.python_path.clone())
            .with_script(self.script.clone())
            .with_param_folder(self.param_folder.clone())
            .with_local(self.local)
            .with_conda_env(self.conda_env.clone())
    }
}

/// Outcome of a finished sweep submission.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub sweep_id: SweepId,
    pub jobs_submitted: usize,
    pub missing_parameters: Vec<String>,
}

/// Create the results folder, load both tables and build every job.
pub fn prepare(args: &Args) -> anyhow::Result<(SweepPlan, ClusterConfig)> {
    prepare_output_dir(&args.param_folder).with_context(|| {
        format!(
            "creating output directory {}",
            args.param_folder.display()
        )
    })?;

    let params = ParameterTable::from_path(&args.parameter_file).with_context(|| {
        format!(
            "loading parameter file {}",
            args.parameter_file.display()
        )
    })?;
    let resources = ClusterConfig::from_path(&args.config_file)
        .with_context(|| format!("loading config file {}", args.config_file.display()))?;

    let plan = SweepPlan::build(&params, args.settings());
    Ok((plan, resources))
}

/// Submit every job of `plan` through `submitter`, stopping at the first
/// failure.
pub fn execute<S: JobSubmitter + ?Sized>(
    plan: &SweepPlan,
    resources: &ClusterConfig,
    submitter: &mut S,
) -> anyhow::Result<RunSummary> {
    let jobs_submitted = submit_all(submitter, plan, resources)
        .with_context(|| format!("submitting sweep {}", plan.id))?;

    if !plan.missing_parameters.is_empty() {
        tracing::warn!(
            sweep = %plan.id,
            "Jobs were built with empty values for missing parameters: {}",
            plan.missing_parameters.join(", ")
        );
    }

    Ok(RunSummary {
        sweep_id: plan.id,
        jobs_submitted,
        missing_parameters: plan.missing_parameters.clone(),
    })
}

/// Full pipeline for parsed arguments.
pub fn run(args: &Args) -> anyhow::Result<RunSummary> {
    let (plan, resources) = prepare(args)?;

    if args.dry_run {
        let mut dry = DryRunSubmitter::new();
        let summary = execute(&plan, &resources, &mut dry)?;
        print!("{}", plan.to_json_lines().context("serializing jobs")?);
        return Ok(summary);
    }

    let mut helper = LsfHelper::new().with_bsub_program(args.bsub_program.clone());
    execute(&plan, &resources, &mut helper)
}
