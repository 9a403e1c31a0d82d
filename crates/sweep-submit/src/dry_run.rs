//! Dry-run backend.
//!
//! Records every submission instead of running it. Used for `--dry_run`
//! previews and for exercising the pipeline in tests.

use serde::{Deserialize, Serialize};
use sweep_config::ClusterConfig;
use sweep_types::{JobCommand, SubmitResult};

use crate::submitter::JobSubmitter;

/// One recorded call to [`JobSubmitter::submit`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub command: JobCommand,
    pub resources: ClusterConfig,
    pub local: bool,
}

#[derive(Debug, Default)]
pub struct DryRunSubmitter {
    submissions: Vec<Submission>,
}

impl DryRunSubmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submissions(&self) -> &[Submission] {
        &self.submissions
    }

    pub fn into_submissions(self) -> Vec<Submission> {
        self.submissions
    }
}

impl JobSubmitter for DryRunSubmitter {
    fn submit(
        &mut self,
        command: &JobCommand,
        resources: &ClusterConfig,
        local: bool,
    ) -> SubmitResult<()> {
        tracing::info!(
            queue = %resources.queue,
            local,
            "[dry run] {}",
            command
        );
        self.submissions.push(Submission {
            command: command.clone(),
            resources: resources.clone(),
            local,
        });
        Ok(())
    }

    fn name(&self) -> &str {
        "dry-run"
    }
}
