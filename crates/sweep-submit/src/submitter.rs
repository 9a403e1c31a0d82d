//! Submission abstraction shared by every backend.

use sweep_builder::SweepPlan;
use sweep_config::ClusterConfig;
use sweep_types::{JobCommand, SubmitResult};

/// Hands a built command to something that runs it.
///
/// Implementations either execute the command on this machine or describe it
/// to a batch scheduler (see [`crate::LsfHelper`]). Submission is
/// one-way: nothing about the job's outcome comes back.
pub trait JobSubmitter {
    /// Submit one command with the sweep's resource request. `local` asks
    /// for immediate execution instead of scheduling.
    fn submit(
        &mut self,
        command: &JobCommand,
        resources: &ClusterConfig,
        local: bool,
    ) -> SubmitResult<()>;

    /// Human-readable backend name.
    fn name(&self) -> &str;
}

impl<S: JobSubmitter + ?Sized> JobSubmitter for Box<S> {
    fn submit(
        &mut self,
        command: &JobCommand,
        resources: &ClusterConfig,
        local: bool,
    ) -> SubmitResult<()> {
        (**self).submit(command, resources, local)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Submit every job of `plan` in order. The first failure stops the sweep
/// and is returned; jobs already handed off are not recalled.
pub fn submit_all<S: JobSubmitter + ?Sized>(
    submitter: &mut S,
    plan: &SweepPlan,
    resources: &ClusterConfig,
) -> SubmitResult<usize> {
    let total = plan.len();
    let local = plan.settings.local;
    tracing::info!(
        sweep = %plan.id,
        backend = submitter.name(),
        "Submitting {} jobs to queue {} (local: {})",
        total,
        resources.queue,
        local
    );

    for job in &plan.jobs {
        tracing::debug!(
            sweep = %plan.id,
            "[{:>3}/{:>3}] {}",
            job.job_number + 1,
            total,
            job.command
        );
        if let Err(err) = submitter.submit(&job.command, resources, local) {
            tracing::error!(
                sweep = %plan.id,
                "Submission of job {} failed, aborting remaining {}: {}",
                job.job_number,
                total - job.job_number - 1,
                err
            );
            return Err(err);
        }
    }

    tracing::info!(sweep = %plan.id, "Submitted {} jobs", total);
    Ok(total)
}
