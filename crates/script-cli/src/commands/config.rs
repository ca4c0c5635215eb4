use script_core::Config;
use std::path::Path;

const SAMPLE_CONFIG: &str = r#"# scriptdeck configuration

# Root folder; each sub-folder is a category.
scripts_dir: ~/Documents/WindowsScripts

categories:
  - UI Customizations
  - Performance Tweaks
  - Privacy Settings
  - Bloatware Removal
  - Security Enhancements
  - System Maintenance
  - Boot Options
  - Network Optimizations
  - Power Management
  - Default Apps

interpreters:
  powershell: powershell
  python: python
  cmd: cmd

history:
  enabled: true

# Refuse `run --undo` for scripts without `UNDOABLE: Yes` unless --force is given.
require_undoable: true
"#;

/// Show or initialize the config at `config_path`, or at the default
/// location when none is given.
pub async fn run(config_path: Option<&Path>, path: bool, init: bool) -> anyhow::Result<()> {
    let config_path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(Config::default_path);

    if path {
        println!("{}", config_path.display());
        return Ok(());
    }

    if init {
        if config_path.exists() {
            println!("Config already exists at: {}", config_path.display());
            println!("Remove it first if you want to reinitialize.");
            return Ok(());
        }

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&config_path, SAMPLE_CONFIG)?;
        println!("Sample config written to: {}", config_path.display());
        return Ok(());
    }

    println!("Config path: {}", config_path.display());
    let config = if config_path.exists() {
        Config::load_from(&config_path)?
    } else {
        println!("Status:      not found, using defaults");
        println!("Run `scriptdeck config --init` to create one.");
        Config::empty()
    };
    print!("{}", config.to_yaml()?);

    Ok(())
}
