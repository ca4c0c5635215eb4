use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct RunId(pub String);

impl RunId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn from_string(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    #[default]
    Run,
    Undo,
}

impl RunMode {
    pub fn is_undo(&self) -> bool {
        matches!(self, RunMode::Undo)
    }

    /// Present participle used in console banners ("Running", "Undoing").
    pub fn verb(&self) -> &'static str {
        match self {
            RunMode::Run => "Running",
            RunMode::Undo => "Undoing",
        }
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunMode::Run => write!(f, "run"),
            RunMode::Undo => write!(f, "undo"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Elevation {
    #[default]
    Normal,
    Elevated,
}

impl fmt::Display for Elevation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Elevation::Normal => write!(f, "normal"),
            Elevation::Elevated => write!(f, "elevated"),
        }
    }
}

/// One invocation of a script.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptRequest {
    pub path: PathBuf,
    #[serde(default)]
    pub mode: RunMode,
    #[serde(default)]
    pub elevation: Elevation,
}

impl ScriptRequest {
    pub fn new(path: impl Into<PathBuf>, mode: RunMode, elevation: Elevation) -> Self {
        Self {
            path: path.into(),
            mode,
            elevation,
        }
    }

    pub fn run(path: impl Into<PathBuf>) -> Self {
        Self::new(path, RunMode::Run, Elevation::Normal)
    }

    pub fn undo(path: impl Into<PathBuf>) -> Self {
        Self::new(path, RunMode::Undo, Elevation::Normal)
    }

    pub fn elevated(mut self) -> Self {
        self.elevation = Elevation::Elevated;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name used in banners and logs.
    pub fn script_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}
