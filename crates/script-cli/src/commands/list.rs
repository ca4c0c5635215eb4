use script_core::catalog::{Catalog, ScriptEntry};
use script_core::config::Config;

pub async fn run(config: &Config, category: Option<String>, json: bool) -> anyhow::Result<()> {
    let catalog = Catalog::new(&config.scripts_dir);
    let scripts = match category {
        Some(ref name) => catalog.scripts(name)?,
        None => catalog.all_scripts()?,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&scripts)?);
        return Ok(());
    }

    if scripts.is_empty() {
        println!("No scripts found.");
        return Ok(());
    }
    println!(
        "{:<32} {:<11} {:<6} {:<22} {}",
        "NAME", "TYPE", "UNDO", "CATEGORY", "FILE"
    );
    println!("{}", "-".repeat(96));
    for s in &scripts {
        print_row(s);
    }
    Ok(())
}

fn print_row(s: &ScriptEntry) {
    println!(
        "{:<32} {:<11} {:<6} {:<22} {}",
        s.metadata.friendly_name,
        s.kind.to_string(),
        if s.metadata.undoable { "yes" } else { "-" },
        s.category,
        s.file_name,
    );
}
