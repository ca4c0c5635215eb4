use script_core::catalog::Catalog;
use script_core::config::Config;
use script_core::error::LaunchError;
use script_core::request::{Elevation, ScriptRequest};
use script_core::Launcher;
use script_local::{ElevatedLauncher, ElevationResult, LocalLauncher, ScriptProcess};
use std::path::PathBuf;

/// What a launch produced, depending on the requested elevation.
pub enum Launched {
    Attached(ScriptProcess),
    Elevated(ElevationResult),
}

/// Launch a request with the launcher matching its elevation.
pub async fn launch(config: &Config, request: &ScriptRequest) -> Result<Launched, LaunchError> {
    match request.elevation {
        Elevation::Normal => {
            let launcher = LocalLauncher::new(config.interpreters.clone());
            Ok(Launched::Attached(launcher.launch(request).await?))
        }
        Elevation::Elevated => {
            let launcher = ElevatedLauncher::new(config.interpreters.clone());
            Ok(Launched::Elevated(launcher.launch(request).await?))
        }
    }
}

/// Resolve a script argument: an existing path is used as-is, anything else
/// is looked up in the catalog by file or friendly name.
pub fn resolve_script(config: &Config, query: &str) -> anyhow::Result<PathBuf> {
    let as_path = PathBuf::from(query);
    if as_path.is_file() {
        return Ok(as_path);
    }
    match Catalog::new(&config.scripts_dir).find_script(query)? {
        Some(entry) => Ok(entry.path),
        None => anyhow::bail!(
            "Script not found: '{}' (not a file and not in {})",
            query,
            config.scripts_dir.display()
        ),
    }
}
