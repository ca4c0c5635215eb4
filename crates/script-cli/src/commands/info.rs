use crate::dispatch;
use script_core::config::Config;
use script_core::kind::ScriptKind;
use script_core::metadata::parse_script_metadata;

pub async fn run(config: &Config, script: &str, json: bool) -> anyhow::Result<()> {
    let path = dispatch::resolve_script(config, script)?;
    let meta = parse_script_metadata(&path);
    let kind = ScriptKind::from_path(&path);

    if json {
        let value = serde_json::json!({
            "path": path.display().to_string(),
            "type": kind.map(|k| k.to_string()),
            "name": meta.friendly_name,
            "description": meta.description,
            "undoable": meta.undoable,
            "undo_description": meta.undo_description,
            "developer": meta.developer,
            "link": meta.link,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("Name:        {}", meta.friendly_name);
    println!("Path:        {}", path.display());
    println!(
        "Type:        {}",
        kind.map(|k| k.to_string()).unwrap_or_else(|| "unsupported".into())
    );
    if !meta.developer.is_empty() {
        println!("Developer:   {}", meta.developer);
    }
    if !meta.link.is_empty() {
        println!("Link:        {}", meta.link);
    }
    if !meta.description.is_empty() {
        println!("Description: {}", meta.description);
    }
    println!("Undoable:    {}", if meta.undoable { "Yes" } else { "No" });
    if meta.undoable && !meta.undo_description.is_empty() {
        println!("Undo:        {}", meta.undo_description);
    }
    Ok(())
}
