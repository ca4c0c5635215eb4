use script_core::catalog::Catalog;
use script_core::config::Config;
use script_core::template::{create_script_with_extension, ScriptTemplate};

pub struct NewScript {
    pub category: String,
    pub name: String,
    pub kind: String,
    pub developer: Option<String>,
    pub link: Option<String>,
    pub description: Option<String>,
    pub undoable: bool,
    pub undo_description: Option<String>,
    pub force: bool,
}

pub async fn run(config: &Config, args: NewScript) -> anyhow::Result<()> {
    let defaults = ScriptTemplate::default();
    let template = ScriptTemplate {
        name: args.name,
        developer: args.developer.unwrap_or(defaults.developer),
        link: args.link.unwrap_or(defaults.link),
        description: args.description.unwrap_or(defaults.description),
        undoable: args.undoable,
        undo_description: args.undo_description.unwrap_or(defaults.undo_description),
    };

    let dir = Catalog::new(&config.scripts_dir).add_category(&args.category)?;
    let path = create_script_with_extension(&dir, &args.kind, &template, args.force)?;
    println!("Created new script: {} in {}", path.display(), args.category);
    Ok(())
}
