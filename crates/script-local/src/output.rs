use crate::local_launcher::{decode_line, ScriptProcess};
use script_core::outcome::RunOutcome;
use std::io::{BufRead, BufReader, PipeReader};
use tokio::sync::mpsc;
use tracing::warn;

/// Events delivered to whoever displays a running script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputEvent {
    /// One line of merged stdout/stderr, terminator removed.
    Line(String),
    /// Reading the output or waiting for the exit code failed.
    Error(String),
    /// The process exited. Always the last event.
    Finished(RunOutcome),
}

/// Drain a process on a dedicated blocking thread, forwarding each line in
/// the order the child wrote it, then report the exit outcome.
///
/// Lines keep being read after the receiver is dropped so the child never
/// stalls on a full pipe.
pub fn spawn_output_pump(mut process: ScriptProcess) -> mpsc::UnboundedReceiver<OutputEvent> {
    let (tx, rx) = mpsc::unbounded_channel();
    let reader = process.take_output();

    tokio::spawn(async move {
        if let Some(reader) = reader {
            forward_lines(reader, &tx).await;
        }

        let last = match process.wait().await {
            Ok(outcome) => OutputEvent::Finished(outcome),
            Err(e) => {
                warn!("Failed to wait for {}: {}", process.request().script_name(), e);
                OutputEvent::Finished(RunOutcome::from_exit_code(None))
            }
        };
        let _ = tx.send(last);
    });

    rx
}

/// Read `reader` to the end on a blocking thread, sending each line to `tx`.
/// A read failure is sent as [`OutputEvent::Error`].
pub(crate) async fn forward_lines(reader: PipeReader, tx: &mpsc::UnboundedSender<OutputEvent>) {
    let line_tx = tx.clone();
    let drained = tokio::task::spawn_blocking(move || -> std::io::Result<()> {
        let mut reader = BufReader::new(reader);
        let mut buf = Vec::new();
        while reader.read_until(b'\n', &mut buf)? > 0 {
            let _ = line_tx.send(OutputEvent::Line(decode_line(&buf)));
            buf.clear();
        }
        Ok(())
    })
    .await;

    let failure = match drained {
        Ok(Ok(())) => None,
        Ok(Err(e)) => Some(format!("Error reading script output: {}", e)),
        Err(e) => Some(format!("Output reader panicked: {}", e)),
    };
    if let Some(message) = failure {
        warn!("{}", message);
        let _ = tx.send(OutputEvent::Error(message));
    }
}

/// Collect every event until the process finishes.
pub async fn collect_events(mut rx: mpsc::UnboundedReceiver<OutputEvent>) -> (Vec<String>, RunOutcome) {
    let mut lines = Vec::new();
    while let Some(event) = rx.recv().await {
        match event {
            OutputEvent::Line(line) => lines.push(line),
            OutputEvent::Error(_) => {}
            OutputEvent::Finished(outcome) => return (lines, outcome),
        }
    }
    (lines, RunOutcome::from_exit_code(None))
}
