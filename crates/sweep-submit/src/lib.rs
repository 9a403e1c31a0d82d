//! # sweep-submit
//!
//! Submission backends for built sweep jobs: the LSF cluster helper (which
//! also covers local execution) and an in-memory dry-run recorder.

mod dry_run;
mod lsf;
mod submitter;

pub use dry_run::{DryRunSubmitter, Submission};
pub use lsf::{bsub_argv, gpu_request, LsfHelper, DEFAULT_BSUB_PROGRAM};
pub use submitter::{submit_all, JobSubmitter};
