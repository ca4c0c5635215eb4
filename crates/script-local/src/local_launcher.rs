use crate::output::{spawn_output_pump, OutputEvent};
use script_core::config::Interpreters;
use script_core::error::LaunchError;
use script_core::invocation::Invocation;
use script_core::outcome::RunOutcome;
use script_core::request::ScriptRequest;
use script_core::Launcher;
use std::io::{BufRead, BufReader, PipeReader};
use std::process::Stdio;
use tokio::process::{Child, Command};
use tokio::sync::mpsc;
use tracing::{debug, info};

#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

/// Runs scripts as child processes of the host, with stdout and stderr
/// merged into one pipe the caller reads.
pub struct LocalLauncher {
    interpreters: Interpreters,
}

impl LocalLauncher {
    pub fn new(interpreters: Interpreters) -> Self {
        Self { interpreters }
    }

    /// Build and spawn the invocation. Returns as soon as the process exists.
    pub fn spawn(&self, request: &ScriptRequest) -> Result<ScriptProcess, LaunchError> {
        let invocation = Invocation::for_request(request, &self.interpreters)?;
        if !request.path.is_file() {
            return Err(LaunchError::ScriptNotFound(request.path.display().to_string()));
        }

        debug!("Local exec: {}", invocation.command_line());

        let (child, reader) = spawn_merged(&invocation.program, &invocation.args)
            .map_err(|e| LaunchError::Spawn(format!("{}: {}", invocation.program, e)))?;

        info!(
            "{} {} (PID {})",
            request.mode.verb(),
            request.script_name(),
            child.id().map(|p| p.to_string()).unwrap_or_else(|| "?".into())
        );

        Ok(ScriptProcess {
            request: request.clone(),
            invocation,
            child,
            output: Some(reader),
        })
    }
}

/// Spawn `program` with stdout and stderr sharing one pipe and no console
/// window. Returns the child and the read end of the pipe.
pub(crate) fn spawn_merged(program: &str, args: &[String]) -> std::io::Result<(Child, PipeReader)> {
    // One pipe for both streams keeps the child's write order.
    let (reader, writer) = std::io::pipe()?;
    let writer_err = writer.try_clone()?;

    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(writer)
        .stderr(writer_err);
    #[cfg(windows)]
    command.creation_flags(CREATE_NO_WINDOW);

    let child = command.spawn()?;
    // The command holds our copies of the write end; the reader only sees
    // EOF once they are gone.
    drop(command);
    Ok((child, reader))
}

#[async_trait::async_trait]
impl Launcher for LocalLauncher {
    type Handle = ScriptProcess;

    fn name(&self) -> &str {
        "local"
    }

    async fn launch(&self, request: &ScriptRequest) -> Result<ScriptProcess, LaunchError> {
        self.spawn(request)
    }
}

/// A spawned script. The owner drains the merged output and collects the
/// exit code; nothing else holds a reference to the process.
pub struct ScriptProcess {
    request: ScriptRequest,
    invocation: Invocation,
    child: Child,
    output: Option<PipeReader>,
}

impl ScriptProcess {
    pub fn pid(&self) -> Option<u32> {
        self.child.id()
    }

    pub fn request(&self) -> &ScriptRequest {
        &self.request
    }

    pub fn invocation(&self) -> &Invocation {
        &self.invocation
    }

    /// Take the read end of the merged stdout/stderr pipe. Returns `None`
    /// after the first call.
    pub fn take_output(&mut self) -> Option<PipeReader> {
        self.output.take()
    }

    /// Wait for the process to exit. Drain the output first (or concurrently),
    /// otherwise a chatty script can block on a full pipe.
    pub async fn wait(&mut self) -> Result<RunOutcome, LaunchError> {
        let status = self.child.wait().await?;
        Ok(RunOutcome::from(status))
    }

    /// Hand the process to a background reader and receive its lines as
    /// events, ending with [`OutputEvent::Finished`].
    pub fn stream(self) -> mpsc::UnboundedReceiver<OutputEvent> {
        spawn_output_pump(self)
    }

    /// Read every line, then wait for the exit code.
    pub async fn wait_with_output(mut self) -> Result<(Vec<String>, RunOutcome), LaunchError> {
        let lines = match self.take_output() {
            Some(reader) => tokio::task::spawn_blocking(move || read_lines(reader))
                .await
                .map_err(|e| LaunchError::Spawn(format!("output reader failed: {}", e)))??,
            None => Vec::new(),
        };
        let outcome = self.wait().await?;
        Ok((lines, outcome))
    }
}

fn read_lines(reader: PipeReader) -> std::io::Result<Vec<String>> {
    let mut reader = BufReader::new(reader);
    let mut lines = Vec::new();
    let mut buf = Vec::new();
    while reader.read_until(b'\n', &mut buf)? > 0 {
        lines.push(decode_line(&buf));
        buf.clear();
    }
    Ok(lines)
}

/// Lossy-decode one line and strip its terminator.
pub(crate) fn decode_line(buf: &[u8]) -> String {
    String::from_utf8_lossy(buf)
        .trim_end_matches(['\r', '\n'])
        .to_string()
}
