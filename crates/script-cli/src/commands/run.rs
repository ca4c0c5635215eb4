use crate::dispatch::{self, Launched};
use script_core::config::Config;
use script_core::history::RunRecord;
use script_core::metadata::parse_script_metadata;
use script_core::outcome::RunOutcome;
use script_core::request::{Elevation, RunMode, ScriptRequest};
use script_local::OutputEvent;
use tracing::warn;

pub struct RunOptions {
    pub undo: bool,
    pub admin: bool,
    pub force: bool,
}

/// Run or undo a script. Returns `Ok(false)` when the script ran but
/// reported failure, so the caller can set the exit code.
pub async fn run(config: &Config, script: &str, opts: RunOptions) -> anyhow::Result<bool> {
    let path = dispatch::resolve_script(config, script)?;
    let meta = parse_script_metadata(&path);

    let mode = if opts.undo { RunMode::Undo } else { RunMode::Run };
    let elevation = if opts.admin {
        Elevation::Elevated
    } else {
        Elevation::Normal
    };

    if mode.is_undo() && !meta.undoable && config.require_undoable && !opts.force {
        anyhow::bail!(
            "Script '{}' does not support undo functionality (use --force to try anyway)",
            meta.friendly_name
        );
    }

    let request = ScriptRequest::new(path, mode, elevation);
    let mut record = RunRecord::new(&request, meta.friendly_name.clone());

    let launched = match dispatch::launch(config, &request).await {
        Ok(launched) => launched,
        Err(e) => {
            record.mark_launch_failed(e.to_string());
            save(config, &record);
            anyhow::bail!("Failed to {} the script: {}", mode, e);
        }
    };

    match launched {
        Launched::Attached(process) => {
            record.mark_started(process.pid());
            save(config, &record);

            let label = mode.to_string().to_uppercase();
            println!("\n=== {}: {} ===\n", label, meta.friendly_name);

            let mut rx = process.stream();
            let mut outcome = RunOutcome::from_exit_code(None);
            while let Some(event) = rx.recv().await {
                match event {
                    OutputEvent::Line(line) => println!("{}", line),
                    OutputEvent::Error(message) => eprintln!("\n{}\n", message),
                    OutputEvent::Finished(o) => outcome = o,
                }
            }

            record.mark_finished(outcome);
            save(config, &record);

            match outcome {
                RunOutcome::Succeeded => {
                    println!("\n=== Script {} completed successfully: {} ===\n", mode, meta.friendly_name);
                }
                RunOutcome::Failed { exit_code } => {
                    println!(
                        "\n=== Script {} returned error code {}: {} ===\n",
                        mode,
                        exit_code.map(|c| c.to_string()).unwrap_or_else(|| "none".into()),
                        meta.friendly_name
                    );
                }
            }
            Ok(outcome.is_success())
        }
        Launched::Elevated(result) => {
            if result.accepted {
                record.mark_detached();
                save(config, &record);
                println!(
                    "=== {} as Administrator: {} ===",
                    mode.verb(),
                    meta.friendly_name
                );
                println!("Note: {}", result.message);
                Ok(true)
            } else {
                record.mark_launch_failed(result.message.clone());
                save(config, &record);
                anyhow::bail!("Failed to run script as Administrator: {}", result.message)
            }
        }
    }
}

/// History is best effort; a failed write never fails the run.
fn save(config: &Config, record: &RunRecord) {
    if !config.history.enabled {
        return;
    }
    if let Err(e) = record.write_to_dir(&config.history.resolved_dir()) {
        warn!("Failed to record run {}: {}", record.run_id, e);
    }
}
