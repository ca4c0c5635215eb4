use script_core::config::Interpreters;
use script_core::error::LaunchError;
use script_core::invocation::Invocation;
use script_core::request::ScriptRequest;
use script_core::Launcher;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Whether the OS accepted the elevation request. Says nothing about how the
/// script itself ends; its output goes to a separate console window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElevationResult {
    pub accepted: bool,
    pub message: String,
}

impl ElevationResult {
    fn accepted(message: String) -> Self {
        Self {
            accepted: true,
            message,
        }
    }

    fn failed(message: String) -> Self {
        Self {
            accepted: false,
            message,
        }
    }
}

/// pkexec exit code when the user dismisses the prompt.
#[cfg(not(windows))]
const PKEXEC_DISMISSED: i32 = 126;

/// pkexec exit code when authorization fails.
#[cfg(not(windows))]
const PKEXEC_NOT_AUTHORIZED: i32 = 127;

/// Launches scripts through the OS elevation prompt. On Windows this is
/// `Start-Process -Verb RunAs` (UAC); elsewhere the invocation is handed to
/// `pkexec`, and any non-zero exit of the helper counts as a refused request.
pub struct ElevatedLauncher {
    interpreters: Interpreters,
    facility: String,
}

impl ElevatedLauncher {
    pub fn new(interpreters: Interpreters) -> Self {
        let facility = if cfg!(windows) {
            interpreters.powershell.clone()
        } else {
            "pkexec".to_string()
        };
        Self {
            interpreters,
            facility,
        }
    }

    /// Use a different elevation helper program.
    pub fn with_facility(mut self, facility: impl Into<String>) -> Self {
        self.facility = facility.into();
        self
    }

    /// Request elevation. Setup errors are returned before the prompt is
    /// shown; everything after that is folded into [`ElevationResult`].
    pub async fn request(&self, request: &ScriptRequest) -> Result<ElevationResult, LaunchError> {
        let invocation = Invocation::for_request(request, &self.interpreters)?;
        if !request.path.is_file() {
            return Err(LaunchError::ScriptNotFound(request.path.display().to_string()));
        }

        info!(
            "Attempting to {} as Administrator: {}",
            request.mode,
            request.script_name()
        );

        let result = self.invoke_facility(&invocation).await;
        if result.accepted {
            info!("{}", result.message);
        } else {
            warn!("Failed to run script as Administrator: {}", result.message);
        }
        Ok(result)
    }

    #[cfg(windows)]
    async fn invoke_facility(&self, invocation: &Invocation) -> ElevationResult {
        const CREATE_NO_WINDOW: u32 = 0x0800_0000;

        let mut script = format!(
            "Start-Process -FilePath '{}' -Verb RunAs",
            ps_quote(&invocation.program)
        );
        if !invocation.args.is_empty() {
            script.push_str(&format!(
                " -ArgumentList '{}'",
                ps_quote(&invocation.argument_string())
            ));
        }
        debug!("Elevation request: {}", script);

        let output = Command::new(&self.facility)
            .args(["-NoProfile", "-NonInteractive", "-Command", &script])
            .stdin(Stdio::null())
            .creation_flags(CREATE_NO_WINDOW)
            .output()
            .await;

        match output {
            Ok(o) if o.status.success() => ElevationResult::accepted(
                "Output will appear in a separate console window".to_string(),
            ),
            Ok(o) => {
                let stderr = String::from_utf8_lossy(&o.stderr);
                ElevationResult::failed(format!("elevation request declined or failed: {}", stderr.trim()))
            }
            Err(e) => ElevationResult::failed(format!("{}: {}", self.facility, e)),
        }
    }

    #[cfg(not(windows))]
    async fn invoke_facility(&self, invocation: &Invocation) -> ElevationResult {
        debug!("Elevation request: {} {}", self.facility, invocation.command_line());

        // pkexec returns when the target exits; its status is all we get back.
        let output = Command::new(&self.facility)
            .arg(&invocation.program)
            .args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await;

        match output {
            Ok(o) if o.status.success() => {
                ElevationResult::accepted(format!("Elevated run via {} finished", self.facility))
            }
            Ok(o) => {
                let reason = match o.status.code() {
                    Some(PKEXEC_DISMISSED) => "elevation prompt was dismissed".to_string(),
                    Some(PKEXEC_NOT_AUTHORIZED) => "not authorized to run as administrator".to_string(),
                    Some(code) => format!("elevated process exited with code {}", code),
                    None => "elevated process was terminated by a signal".to_string(),
                };
                let stderr = String::from_utf8_lossy(&o.stderr);
                let detail = stderr.trim();
                if detail.is_empty() {
                    ElevationResult::failed(reason)
                } else {
                    ElevationResult::failed(format!("{}: {}", reason, detail))
                }
            }
            Err(e) => ElevationResult::failed(format!("{}: {}", self.facility, e)),
        }
    }
}

#[async_trait::async_trait]
impl Launcher for ElevatedLauncher {
    type Handle = ElevationResult;

    fn name(&self) -> &str {
        "elevated"
    }

    async fn launch(&self, request: &ScriptRequest) -> Result<ElevationResult, LaunchError> {
        self.request(request).await
    }
}

#[cfg(windows)]
fn ps_quote(s: &str) -> String {
    s.replace('\'', "''")
}

#[cfg(test)]
mod tests {
    use super::*;
    use script_core::request::{Elevation, RunMode};

    fn launcher() -> ElevatedLauncher {
        ElevatedLauncher::new(Interpreters::default())
    }

    #[tokio::test]
    async fn test_exe_undo_rejected() {
        let req = ScriptRequest::new("/s/tool.exe", RunMode::Undo, Elevation::Elevated);
        let err = launcher().request(&req).await.unwrap_err();
        assert!(matches!(err, LaunchError::UndoUnsupported(_)));
    }

    #[tokio::test]
    async fn test_unsupported_type_rejected() {
        let req = ScriptRequest::run("/s/notes.md").elevated();
        let err = launcher().launch(&req).await.unwrap_err();
        assert!(matches!(err, LaunchError::UnsupportedType(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_missing_facility_reports_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.py");
        std::fs::write(&path, "print(1)\n").unwrap();

        let result = launcher()
            .with_facility("/nonexistent/elevate-helper")
            .request(&ScriptRequest::run(&path).elevated())
            .await
            .unwrap();
        assert!(!result.accepted);
        assert!(result.message.contains("/nonexistent/elevate-helper"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_declined_prompt_reports_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.py");
        std::fs::write(&path, "print(1)\n").unwrap();

        for (code, reason) in [(126, "dismissed"), (127, "not authorized"), (3, "code 3")] {
            // `sh <helper> <script>` stands in for `pkexec <python> <script>`.
            let helper = dir.path().join(format!("helper{code}.sh"));
            std::fs::write(&helper, format!("echo refused >&2\nexit {code}\n")).unwrap();
            let interpreters = Interpreters {
                python: helper.display().to_string(),
                ..Interpreters::default()
            };

            let result = ElevatedLauncher::new(interpreters)
                .with_facility("sh")
                .request(&ScriptRequest::run(&path).elevated())
                .await
                .unwrap();
            assert!(!result.accepted, "exit {code} must not be accepted");
            assert!(result.message.contains(reason), "{}", result.message);
            assert!(result.message.contains("refused"), "{}", result.message);
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_accepted_when_facility_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.py");
        std::fs::write(&path, "print(1)\n").unwrap();

        let result = launcher()
            .with_facility("true")
            .request(&ScriptRequest::undo(&path).elevated())
            .await
            .unwrap();
        assert!(result.accepted);
    }
}
