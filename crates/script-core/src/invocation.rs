use crate::config::Interpreters;
use crate::error::LaunchError;
use crate::kind::{dotted_extension, ScriptKind};
use crate::request::{RunMode, ScriptRequest};
use std::path::Path;

/// Concrete argument vector for one script invocation.
///
/// Scripts opt into undo by accepting the kind's undo argument:
/// `-Undo` for PowerShell, `--undo` for Python and `undo` for batch files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub kind: ScriptKind,
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn build(
        kind: ScriptKind,
        path: &Path,
        mode: RunMode,
        interpreters: &Interpreters,
    ) -> Result<Self, LaunchError> {
        let script = path.to_string_lossy().into_owned();
        let undo = mode.is_undo();

        let (program, mut args, undo_arg) = match kind {
            ScriptKind::PowerShell => (
                interpreters.powershell.clone(),
                vec![
                    "-ExecutionPolicy".to_string(),
                    "Bypass".to_string(),
                    "-File".to_string(),
                    script,
                ],
                "-Undo",
            ),
            ScriptKind::Python => (interpreters.python.clone(), vec![script], "--undo"),
            ScriptKind::Batch => (
                interpreters.cmd.clone(),
                vec!["/C".to_string(), script],
                "undo",
            ),
            ScriptKind::Executable => {
                if undo {
                    return Err(LaunchError::UndoUnsupported("EXE".to_string()));
                }
                (script, Vec::new(), "")
            }
        };

        if undo {
            args.push(undo_arg.to_string());
        }

        Ok(Self {
            kind,
            program,
            args,
        })
    }

    /// Resolve the script kind from the request path and build its invocation.
    pub fn for_request(request: &ScriptRequest, interpreters: &Interpreters) -> Result<Self, LaunchError> {
        let kind = ScriptKind::from_path(&request.path)
            .ok_or_else(|| LaunchError::UnsupportedType(dotted_extension(&request.path)))?;
        Self::build(kind, &request.path, request.mode, interpreters)
    }

    /// Arguments joined into one string for facilities that take a single
    /// parameter string (the elevation prompt).
    pub fn argument_string(&self) -> String {
        self.args
            .iter()
            .map(|a| quote_arg(a))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Program and arguments as one line, for logs.
    pub fn command_line(&self) -> String {
        let program = quote_arg(&self.program);
        if self.args.is_empty() {
            program
        } else {
            format!("{} {}", program, self.argument_string())
        }
    }
}

fn quote_arg(arg: &str) -> String {
    if arg.is_empty() || arg.contains(char::is_whitespace) {
        format!("\"{}\"", arg.replace('"', "\\\""))
    } else {
        arg.to_string()
    }
}
