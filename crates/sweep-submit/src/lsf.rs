//! LSF cluster helper: runs commands locally or submits them with `bsub`.

use std::path::PathBuf;
use std::process::Command;

use sweep_config::ClusterConfig;
use sweep_types::{JobCommand, SubmitError, SubmitResult};

use crate::submitter::JobSubmitter;

pub const DEFAULT_BSUB_PROGRAM: &str = "bsub";

/// Submits to an LSF scheduler, or runs the command in-process when asked
/// for a local run.
#[derive(Debug, Clone)]
pub struct LsfHelper {
    bsub_program: String,
}

impl Default for LsfHelper {
    fn default() -> Self {
        Self::new()
    }
}

impl LsfHelper {
    pub fn new() -> Self {
        Self {
            bsub_program: DEFAULT_BSUB_PROGRAM.to_string(),
        }
    }

    /// Use a different scheduler front-end binary (a wrapper script, or a
    /// full path when `bsub` is not on `PATH`).
    pub fn with_bsub_program(mut self, program: impl Into<String>) -> Self {
        self.bsub_program = program.into();
        self
    }

    /// Run `command` to completion on this machine. A training failure is
    /// logged, not returned: only failing to launch counts as a submission
    /// error.
    fn run_local(&self, command: &JobCommand) -> SubmitResult<()> {
        let program = command.program().ok_or(SubmitError::EmptyCommand)?;
        let executable = expand_home(program);
        tracing::info!("Running locally: {}", command);

        let status = Command::new(&executable)
            .args(command.args())
            .status()
            .map_err(|e| SubmitError::Spawn {
                program: executable.display().to_string(),
                message: e.to_string(),
            })?;

        if !status.success() {
            tracing::warn!("Local job exited with {}: {}", status, command);
        }
        Ok(())
    }

    fn submit_remote(&self, command: &JobCommand, resources: &ClusterConfig) -> SubmitResult<()> {
        if command.is_empty() {
            return Err(SubmitError::EmptyCommand);
        }
        let argv = bsub_argv(command, resources);
        tracing::debug!("{} {}", self.bsub_program, argv.join(" "));

        let output = Command::new(&self.bsub_program)
            .args(&argv)
            .output()
            .map_err(|e| SubmitError::Spawn {
                program: self.bsub_program.clone(),
                message: e.to_string(),
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !stdout.trim().is_empty() {
            tracing::info!("{}", stdout.trim());
        }
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::error!("{} rejected job: {}", self.bsub_program, stderr.trim());
            return Err(SubmitError::Rejected {
                program: self.bsub_program.clone(),
                status: output.status.to_string(),
            });
        }
        Ok(())
    }
}

impl JobSubmitter for LsfHelper {
    fn submit(
        &mut self,
        command: &JobCommand,
        resources: &ClusterConfig,
        local: bool,
    ) -> SubmitResult<()> {
        if local {
            self.run_local(command)
        } else {
            self.submit_remote(command, resources)
        }
    }

    fn name(&self) -> &str {
        "lsf"
    }
}

/// Arguments passed to `bsub` (scheduler program excluded): queue, walltime,
/// an optional GPU request, then the job command itself.
pub fn bsub_argv(command: &JobCommand, resources: &ClusterConfig) -> Vec<String> {
    let mut argv = vec![
        "-q".to_string(),
        resources.queue.clone(),
        "-W".to_string(),
        resources.walltime.clone(),
    ];
    if let Some(request) = gpu_request(resources) {
        argv.push("-gpu".to_string());
        argv.push(request);
    }
    argv.extend(command.tokens().iter().cloned());
    argv
}

/// `-gpu` resource string, or `None` when no GPUs are requested.
pub fn gpu_request(resources: &ClusterConfig) -> Option<String> {
    let num_gpus = resources.num_gpus.trim();
    if num_gpus.is_empty() || num_gpus.parse::<u32>() == Ok(0) {
        return None;
    }
    let shared = resources
        .num_gpus_shared
        .trim()
        .parse::<u32>()
        .is_ok_and(|n| n > 0);
    let (mode, exclusive) = if shared {
        ("shared", "no")
    } else {
        ("exclusive_process", "yes")
    };
    Some(format!("num={num_gpus}:mode={mode}:j_exclusive={exclusive}"))
}

fn expand_home(program: &str) -> PathBuf {
    match (program.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(program),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(tokens: &[&str]) -> JobCommand {
        JobCommand::new(tokens.iter().map(|t| t.to_string()).collect())
    }

    #[test]
    fn bsub_argv_with_exclusive_gpus() {
        let resources = ClusterConfig::new("gpu", "2", "0", "10:00");
        let argv = bsub_argv(&command(&["python", "train.py", "--scale"]), &resources);
        assert_eq!(
            argv,
            vec![
                "-q",
                "gpu",
                "-W",
                "10:00",
                "-gpu",
                "num=2:mode=exclusive_process:j_exclusive=yes",
                "python",
                "train.py",
                "--scale",
            ]
        );
    }

    #[test]
    fn shared_gpus_switch_mode() {
        let resources = ClusterConfig::new("gpu", "2", "1", "10:00");
        assert_eq!(
            gpu_request(&resources).as_deref(),
            Some("num=2:mode=shared:j_exclusive=no")
        );
    }

    #[test]
    fn cpu_queue_has_no_gpu_request() {
        let resources = ClusterConfig::new("normal", "0", "0", "2:00");
        let argv = bsub_argv(&command(&["python", "train.py"]), &resources);
        assert!(!argv.contains(&"-gpu".to_string()));
        assert_eq!(argv.len(), 6);
    }

    #[test]
    fn activation_tokens_are_forwarded_verbatim() {
        let resources = ClusterConfig::new("gpu", "1", "0", "1:00");
        let argv = bsub_argv(
            &command(&["source", "activate", "tybalt-gpu", "&&", "python", "train.py"]),
            &resources,
        );
        assert_eq!(&argv[6..10], &["source", "activate", "tybalt-gpu", "&&"]);
    }

    #[test]
    fn home_prefix_is_expanded() {
        let expanded = expand_home("~/.conda/envs/tybalt-gpu/bin/python");
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expanded, home.join(".conda/envs/tybalt-gpu/bin/python"));
        }
        assert_eq!(expand_home("/usr/bin/python"), PathBuf::from("/usr/bin/python"));
    }

    #[test]
    fn empty_command_is_rejected() {
        let mut helper = LsfHelper::new();
        let resources = ClusterConfig::new("gpu", "1", "0", "1:00");
        let empty = JobCommand::new(Vec::new());
        assert!(matches!(
            helper.submit(&empty, &resources, true),
            Err(SubmitError::EmptyCommand)
        ));
        assert!(matches!(
            helper.submit(&empty, &resources, false),
            Err(SubmitError::EmptyCommand)
        ));
    }

    #[cfg(unix)]
    #[test]
    fn local_run_ignores_job_exit_status() {
        let mut helper = LsfHelper::new();
        let resources = ClusterConfig::new("gpu", "1", "0", "1:00");
        assert!(helper.submit(&command(&["true"]), &resources, true).is_ok());
        assert!(helper.submit(&command(&["false"]), &resources, true).is_ok());
    }

    #[test]
    fn local_launch_failure_is_an_error() {
        let mut helper = LsfHelper::new();
        let resources = ClusterConfig::new("gpu", "1", "0", "1:00");
        let err = helper
            .submit(&command(&["/nonexistent/paramsweep-python"]), &resources, true)
            .unwrap_err();
        assert!(matches!(err, SubmitError::Spawn { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn remote_submission_uses_configured_program() {
        let resources = ClusterConfig::new("gpu", "1", "0", "1:00");
        let mut accepting = LsfHelper::new().with_bsub_program("true");
        assert!(accepting
            .submit(&command(&["python", "train.py"]), &resources, false)
            .is_ok());

        let mut rejecting = LsfHelper::new().with_bsub_program("false");
        let err = rejecting
            .submit(&command(&["python", "train.py"]), &resources, false)
            .unwrap_err();
        match err {
            SubmitError::Rejected { program, .. } => assert_eq!(program, "false"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_scheduler_binary_is_an_error() {
        let resources = ClusterConfig::new("gpu", "1", "0", "1:00");
        let mut helper = LsfHelper::new().with_bsub_program("/nonexistent/bsub");
        let err = helper
            .submit(&command(&["python", "train.py"]), &resources, false)
            .unwrap_err();
        assert!(matches!(err, SubmitError::Spawn { .. }));
    }
}
