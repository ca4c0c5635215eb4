use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration.
/// Loaded from <config_dir>/scriptdeck/config.yaml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_scripts_dir")]
    pub scripts_dir: PathBuf,
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,
    #[serde(default)]
    pub interpreters: Interpreters,
    #[serde(default)]
    pub history: HistoryConfig,
    /// Refuse undo for scripts whose header does not declare `UNDOABLE`.
    /// The launcher itself never checks this; callers do.
    #[serde(default = "default_true")]
    pub require_undoable: bool,
}

/// Programs used to run each script kind.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Interpreters {
    #[serde(default = "default_powershell")]
    pub powershell: String,
    #[serde(default = "default_python")]
    pub python: String,
    #[serde(default = "default_cmd")]
    pub cmd: String,
}

impl Default for Interpreters {
    fn default() -> Self {
        Self {
            powershell: default_powershell(),
            python: default_python(),
            cmd: default_cmd(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: None,
        }
    }
}

impl HistoryConfig {
    /// Configured history directory, falling back to the data dir.
    pub fn resolved_dir(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(crate::history::history_dir)
    }
}

/// Replace a leading `~` with the user's home directory.
pub fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}

fn default_true() -> bool {
    true
}

fn default_scripts_dir() -> PathBuf {
    dirs::document_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("WindowsScripts")
}

pub fn default_categories() -> Vec<String> {
    [
        "UI Customizations",
        "Performance Tweaks",
        "Privacy Settings",
        "Bloatware Removal",
        "Security Enhancements",
        "System Maintenance",
        "Boot Options",
        "Network Optimizations",
        "Power Management",
        "Default Apps",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_powershell() -> String {
    let program = if cfg!(windows) { "powershell" } else { "pwsh" };
    program.to_string()
}

fn default_python() -> String {
    let program = if cfg!(windows) { "python" } else { "python3" };
    program.to_string()
}

fn default_cmd() -> String {
    "cmd".to_string()
}

impl Config {
    /// Load config from the default path, or defaults if it does not exist.
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::empty())
        }
    }

    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Config = serde_yaml::from_str(&contents)?;
        config.scripts_dir = expand_home(&config.scripts_dir);
        config.history.dir = config.history.dir.as_deref().map(expand_home);
        Ok(config)
    }

    /// Default config file path.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("/etc"))
            .join("scriptdeck")
            .join("config.yaml")
    }

    /// Config with every field at its default.
    pub fn empty() -> Self {
        Self {
            scripts_dir: default_scripts_dir(),
            categories: default_categories(),
            interpreters: Interpreters::default(),
            history: HistoryConfig::default(),
            require_undoable: true,
        }
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_yaml_uses_defaults() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.categories.len(), 10);
        assert!(config.require_undoable);
        assert!(config.history.enabled);
        assert_eq!(config.interpreters, Interpreters::default());
    }

    #[test]
    fn test_partial_interpreters() {
        let yaml = "scripts_dir: /srv/scripts\ninterpreters:\n  python: /usr/bin/python3.12\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.scripts_dir, PathBuf::from("/srv/scripts"));
        assert_eq!(config.interpreters.python, "/usr/bin/python3.12");
        assert_eq!(config.interpreters.cmd, "cmd");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "categories: [Tweaks]\nrequire_undoable: false\n").unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.categories, vec!["Tweaks".to_string()]);
        assert!(!config.require_undoable);
    }

    #[test]
    fn test_expand_home() {
        let plain = PathBuf::from("/srv/scripts");
        assert_eq!(expand_home(&plain), plain);
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home(Path::new("~/Scripts")), home.join("Scripts"));
        }
    }

    #[test]
    fn test_yaml_roundtrip_keeps_history_dir() {
        let mut config = Config::empty();
        config.history.dir = Some(PathBuf::from("/tmp/runs"));
        let yaml = config.to_yaml().unwrap();
        let back: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back.history.resolved_dir(), PathBuf::from("/tmp/runs"));
    }
}
