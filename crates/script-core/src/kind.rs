use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// File extensions the catalog picks up, lowercase and without the dot.
pub const SUPPORTED_EXTENSIONS: [&str; 5] = ["ps1", "py", "bat", "cmd", "exe"];

/// Closed set of script types. Resolved once from the file extension and then
/// matched exhaustively by the parser and the invocation builder.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ScriptKind {
    PowerShell,
    Python,
    Batch,
    Executable,
}

impl ScriptKind {
    /// Resolve from a bare extension (case-insensitive, leading dot allowed).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "ps1" => Some(Self::PowerShell),
            "py" => Some(Self::Python),
            "bat" | "cmd" => Some(Self::Batch),
            "exe" => Some(Self::Executable),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// Line-comment marker used by metadata headers of this kind.
    pub fn comment_marker(&self) -> CommentMarker {
        match self {
            Self::Batch => CommentMarker::DoubleColon,
            Self::PowerShell | Self::Python | Self::Executable => CommentMarker::Hash,
        }
    }

    /// Default extension used when creating a script of this kind.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::PowerShell => "ps1",
            Self::Python => "py",
            Self::Batch => "bat",
            Self::Executable => "exe",
        }
    }

    pub fn supports_undo(&self) -> bool {
        !matches!(self, Self::Executable)
    }
}

impl fmt::Display for ScriptKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptKind::PowerShell => write!(f, "powershell"),
            ScriptKind::Python => write!(f, "python"),
            ScriptKind::Batch => write!(f, "batch"),
            ScriptKind::Executable => write!(f, "executable"),
        }
    }
}

/// Comment prefix that introduces a metadata line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommentMarker {
    Hash,
    DoubleColon,
}

impl CommentMarker {
    /// Marker for any text file: `::` for batch files, `#` for everything
    /// else, including extensions the launcher does not support.
    pub fn for_path(path: &Path) -> Self {
        ScriptKind::from_path(path)
            .map(|k| k.comment_marker())
            .unwrap_or(Self::Hash)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hash => "#",
            Self::DoubleColon => "::",
        }
    }
}

/// Lowercase extension of `path` including the dot, or an empty string.
pub fn dotted_extension(path: &Path) -> String {
    path.extension()
        .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}
