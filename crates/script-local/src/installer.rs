//! Installs missing Python modules with `<python> -m pip`, bootstrapping pip
//! first when the interpreter lacks it.

use crate::local_launcher::spawn_merged;
use crate::output::{forward_lines, OutputEvent};
use script_core::deps::PipStep;
use script_core::outcome::RunOutcome;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Start installing `modules` in the background. Events arrive the same way as
/// for a running script: progress banners and merged pip output as
/// [`OutputEvent::Line`], ending with [`OutputEvent::Finished`] carrying the
/// outcome of the install step.
///
/// A failed pip upgrade is reported and skipped; a failed bootstrap ends the
/// installation.
pub fn install_python_modules(
    interpreter: &str,
    modules: &[String],
    upgrade_pip: bool,
) -> mpsc::UnboundedReceiver<OutputEvent> {
    let (tx, rx) = mpsc::unbounded_channel();
    let interpreter = interpreter.to_string();
    let modules = modules.to_vec();

    tokio::spawn(async move {
        let outcome = install(&interpreter, modules, upgrade_pip, &tx).await;
        let _ = tx.send(OutputEvent::Finished(outcome));
    });

    rx
}

async fn install(
    interpreter: &str,
    modules: Vec<String>,
    upgrade_pip: bool,
    tx: &mpsc::UnboundedSender<OutputEvent>,
) -> RunOutcome {
    let not_started = RunOutcome::from_exit_code(None);
    if modules.is_empty() {
        return RunOutcome::Succeeded;
    }

    let Some(check) = run_step(interpreter, &PipStep::Check, tx).await else {
        return not_started;
    };
    if !check.is_success() {
        match run_step(interpreter, &PipStep::Bootstrap, tx).await {
            Some(o) if o.is_success() => {}
            Some(o) => {
                let _ = tx.send(OutputEvent::Error("Failed to install pip".to_string()));
                return o;
            }
            None => return not_started,
        }
    }

    if upgrade_pip {
        let upgraded = run_step(interpreter, &PipStep::Upgrade, tx).await;
        if !upgraded.is_some_and(|o| o.is_success()) {
            warn!("Failed to upgrade pip, continuing with installation");
            let _ = tx.send(OutputEvent::Line(
                "Warning: Failed to upgrade pip, continuing with installation".to_string(),
            ));
        }
    }

    run_step(interpreter, &PipStep::Install(modules), tx)
        .await
        .unwrap_or(not_started)
}

/// Run one step with its output forwarded. `None` when the interpreter could
/// not be started or waited on.
async fn run_step(
    interpreter: &str,
    step: &PipStep,
    tx: &mpsc::UnboundedSender<OutputEvent>,
) -> Option<RunOutcome> {
    info!("{}", step.describe());
    let _ = tx.send(OutputEvent::Line(format!("=== {} ===", step.describe())));

    let (mut child, reader) = match spawn_merged(interpreter, &step.args()) {
        Ok(spawned) => spawned,
        Err(e) => {
            let message = format!("{}: {}", interpreter, e);
            warn!("{}", message);
            let _ = tx.send(OutputEvent::Error(message));
            return None;
        }
    };

    forward_lines(reader, tx).await;
    match child.wait().await {
        Ok(status) => Some(RunOutcome::from(status)),
        Err(e) => {
            let _ = tx.send(OutputEvent::Error(format!("Failed to wait for {}: {}", interpreter, e)));
            None
        }
    }
}
