use script_core::config::Config;
use script_core::history::list_runs;

pub async fn run(config: &Config, limit: usize, json: bool, jsonl: bool) -> anyhow::Result<()> {
    let mut runs = list_runs(&config.history.resolved_dir())?;
    runs.truncate(limit);

    if jsonl {
        for r in &runs {
            println!("{}", r.to_jsonl_line());
        }
        return Ok(());
    }
    if json {
        let values: Vec<_> = runs.iter().map(|r| r.to_json()).collect();
        println!("{}", serde_json::to_string_pretty(&values)?);
        return Ok(());
    }

    if runs.is_empty() {
        println!("No runs recorded.");
        return Ok(());
    }
    println!(
        "{:<20} {:<28} {:<5} {:<9} {:<14} {}",
        "STARTED", "SCRIPT", "MODE", "ELEVATION", "STATUS", "EXIT"
    );
    println!("{}", "-".repeat(86));
    for r in &runs {
        println!(
            "{:<20} {:<28} {:<5} {:<9} {:<14} {}",
            r.started_at
                .with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
            r.script_name,
            r.mode.to_string(),
            r.elevation.to_string(),
            r.status.to_string(),
            r.exit_code.map(|c| c.to_string()).unwrap_or_else(|| "-".into()),
        );
    }
    Ok(())
}
