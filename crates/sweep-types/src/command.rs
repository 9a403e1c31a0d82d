use serde::{Deserialize, Serialize};
use std::fmt;

/// An invocable shell command: program first, then its arguments.
///
/// The token list may open with environment-activation tokens
/// (`source activate <env> &&`), in which case it is only meaningful when run
/// through a shell, as the scheduler does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobCommand(Vec<String>);

impl JobCommand {
    pub fn new(tokens: Vec<String>) -> Self {
        Self(tokens)
    }

    pub fn tokens(&self) -> &[String] {
        &self.0
    }

    /// First token, if any.
    pub fn program(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    /// Everything after the program.
    pub fn args(&self) -> &[String] {
        self.0.get(1..).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.0.iter().any(|t| t == token)
    }

    /// Value that follows `flag`, e.g. `value_of("--batch_size")`.
    pub fn value_of(&self, flag: &str) -> Option<&str> {
        self.0
            .iter()
            .position(|t| t == flag)
            .and_then(|i| self.0.get(i + 1))
            .map(String::as_str)
    }
}

impl fmt::Display for JobCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> JobCommand {
        JobCommand::new(
            ["python", "train.py", "--epochs", "10", "--scale"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        )
    }

    #[test]
    fn program_and_args() {
        let cmd = sample();
        assert_eq!(cmd.program(), Some("python"));
        assert_eq!(cmd.args().len(), 4);
        assert_eq!(cmd.to_string(), "python train.py --epochs 10 --scale");
    }

    #[test]
    fn flag_lookup() {
        let cmd = sample();
        assert_eq!(cmd.value_of("--epochs"), Some("10"));
        assert_eq!(cmd.value_of("--scale"), None);
        assert!(cmd.contains("--scale"));
        assert!(!cmd.contains("--untied_weights"));
    }

    #[test]
    fn empty_command() {
        let cmd = JobCommand::new(Vec::new());
        assert!(cmd.is_empty());
        assert_eq!(cmd.program(), None);
        assert!(cmd.args().is_empty());
    }

    #[test]
    fn serializes_as_plain_array() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert_eq!(json, r#"["python","train.py","--epochs","10","--scale"]"#);
    }
}
