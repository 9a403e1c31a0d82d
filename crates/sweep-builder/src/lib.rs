//! # sweep-builder
//!
//! Turns a parameter table and sweep settings into an ordered plan of
//! training jobs: one job per point of the Cartesian product of the
//! algorithm's swept dimensions, each with its result path and full command.

mod grid;
mod plan;

pub use grid::{expand_grid, grid_size, Axis, Combination};
pub use plan::{
    output_filename, SweepId, SweepJob, SweepPlan, SweepSettings, DEFAULT_CONDA_ENV,
    DEFAULT_PARAM_FOLDER, DEFAULT_PYTHON_PATH, DEFAULT_SCRIPT, UNTIED_WEIGHTS,
};
