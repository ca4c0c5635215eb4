use serde::{Deserialize, Serialize};
use std::fmt;

/// How a spawned script finished. Exit code 0 is success; anything else,
/// including termination by signal (no code), is a script-reported failure.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunOutcome {
    Succeeded,
    Failed { exit_code: Option<i32> },
}

impl RunOutcome {
    pub fn from_exit_code(code: Option<i32>) -> Self {
        match code {
            Some(0) => RunOutcome::Succeeded,
            other => RunOutcome::Failed { exit_code: other },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RunOutcome::Succeeded)
    }

    pub fn exit_code(&self) -> Option<i32> {
        match self {
            RunOutcome::Succeeded => Some(0),
            RunOutcome::Failed { exit_code } => *exit_code,
        }
    }
}

impl From<std::process::ExitStatus> for RunOutcome {
    fn from(status: std::process::ExitStatus) -> Self {
        Self::from_exit_code(status.code())
    }
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunOutcome::Succeeded => write!(f, "success"),
            RunOutcome::Failed { exit_code: Some(code) } => write!(f, "failure (exit {})", code),
            RunOutcome::Failed { exit_code: None } => write!(f, "failure (terminated)"),
        }
    }
}
