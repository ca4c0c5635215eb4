use thiserror::Error;

/// Errors raised while turning a request into a running process.
///
/// Setup variants (`UnsupportedType`, `UndoUnsupported`) are returned before
/// any OS resource is touched. A script that starts and then exits non-zero
/// is not an error; see [`crate::outcome::RunOutcome`].
#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("Unsupported script type: {0}")]
    UnsupportedType(String),

    #[error("Undo operation not supported for {0} files")]
    UndoUnsupported(String),

    #[error("Script not found: {0}")]
    ScriptNotFound(String),

    #[error("Failed to start process: {0}")]
    Spawn(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Invalid category name: '{0}'")]
    InvalidCategory(String),

    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Executable files cannot be created from a template")]
    ExecutableKind,

    #[error("Unknown script type: {0}")]
    UnknownType(String),

    #[error("Script name cannot be empty")]
    EmptyName,

    #[error("File already exists: {0}")]
    AlreadyExists(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
