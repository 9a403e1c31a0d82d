//! # sweep-config
//!
//! Loading of the two tab separated inputs of a sweep: the parameter table
//! (`parameter`, `sweep_values`) and the cluster resource table (`variable`,
//! `assign`).

pub mod cluster;
pub mod loaders;
pub mod parameters;

pub use cluster::{ClusterConfig, ASSIGN_COLUMN};
pub use loaders::{prepare_output_dir, read_keyed_table};
pub use parameters::{ParameterTable, SWEEP_VALUES_COLUMN};
