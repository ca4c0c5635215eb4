//! Metadata header parser.
//!
//! Scripts declare their identity in line comments near the top of the file:
//!
//! ```text
//! # NAME: Disable Telemetry
//! # DEVELOPER: Jane Doe
//! # DESCRIPTION: Turns off diagnostic data collection
//! # UNDOABLE: Yes
//! # UNDO_DESC: Restores the default telemetry level
//! ```
//!
//! Batch files use `::` instead of `#`. Only the first
//! [`SCAN_WINDOW_CHARS`] characters are scanned and every field is matched
//! independently; a field that is missing falls back to its default.

use crate::exe_info::{exe_metadata, SystemVersionInfo, VersionInfoProvider};
use crate::kind::{CommentMarker, ScriptKind};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;
use std::sync::LazyLock;
use tracing::warn;

/// Number of characters scanned from the top of a script.
pub const SCAN_WINDOW_CHARS: usize = 2000;

/// Upper bound on bytes needed to hold the scan window in UTF-8.
const SCAN_WINDOW_BYTES: u64 = (SCAN_WINDOW_CHARS * 4) as u64;

/// Declared properties of one script file. Derived on demand, never cached.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScriptMetadata {
    pub friendly_name: String,
    pub description: String,
    pub undoable: bool,
    pub undo_description: String,
    pub developer: String,
    pub link: String,
}

impl ScriptMetadata {
    /// All fields empty, `undoable = false`.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Defaults for a script with no header: the name is the file's base name.
    pub fn defaults_for(path: &Path) -> Self {
        Self {
            friendly_name: base_name(path),
            ..Self::empty()
        }
    }

    /// Fields in declaration order: name, description, undoable, undo
    /// description, developer, link.
    pub fn fields(&self) -> (&str, &str, bool, &str, &str, &str) {
        (
            &self.friendly_name,
            &self.description,
            self.undoable,
            &self.undo_description,
            &self.developer,
            &self.link,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetadataField {
    Name,
    Description,
    Undoable,
    UndoDescription,
    Developer,
    Link,
}

impl MetadataField {
    pub const ALL: [MetadataField; 6] = [
        MetadataField::Name,
        MetadataField::Description,
        MetadataField::Undoable,
        MetadataField::UndoDescription,
        MetadataField::Developer,
        MetadataField::Link,
    ];

    /// Keyword written in the header, e.g. `UNDO_DESC`.
    pub fn key(&self) -> &'static str {
        match self {
            MetadataField::Name => "NAME",
            MetadataField::Description => "DESCRIPTION",
            MetadataField::Undoable => "UNDOABLE",
            MetadataField::UndoDescription => "UNDO_DESC",
            MetadataField::Developer => "DEVELOPER",
            MetadataField::Link => "LINK",
        }
    }
}

/// One compiled pattern per field for a given comment marker.
struct FieldPatterns {
    patterns: Vec<(MetadataField, Regex)>,
}

impl FieldPatterns {
    fn compile(marker: CommentMarker) -> Self {
        let marker = regex::escape(marker.as_str());
        let patterns = MetadataField::ALL
            .iter()
            .map(|field| {
                let pattern = format!(r"(?i){}[ \t]*{}:[ \t]*(.*?)[\r\n]", marker, field.key());
                (*field, Regex::new(&pattern).expect("valid regex"))
            })
            .collect();
        Self { patterns }
    }

    fn capture(&self, field: MetadataField, text: &str) -> Option<String> {
        self.patterns
            .iter()
            .find(|(f, _)| *f == field)
            .and_then(|(_, re)| re.captures(text))
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
    }
}

static HASH_PATTERNS: LazyLock<FieldPatterns> =
    LazyLock::new(|| FieldPatterns::compile(CommentMarker::Hash));

static DOUBLE_COLON_PATTERNS: LazyLock<FieldPatterns> =
    LazyLock::new(|| FieldPatterns::compile(CommentMarker::DoubleColon));

fn patterns_for(marker: CommentMarker) -> &'static FieldPatterns {
    match marker {
        CommentMarker::Hash => &*HASH_PATTERNS,
        CommentMarker::DoubleColon => &*DOUBLE_COLON_PATTERNS,
    }
}

/// `yes`, `true` and `1` (any case) mean undoable; everything else does not.
pub fn parse_undoable(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "yes" | "true" | "1")
}

/// Extract metadata from already-loaded header text.
pub fn parse_metadata_text(text: &str, marker: CommentMarker, default_name: &str) -> ScriptMetadata {
    let patterns = patterns_for(marker);
    let get = |field| patterns.capture(field, text);

    ScriptMetadata {
        friendly_name: get(MetadataField::Name).unwrap_or_else(|| default_name.to_string()),
        description: get(MetadataField::Description).unwrap_or_default(),
        undoable: get(MetadataField::Undoable)
            .map(|v| parse_undoable(&v))
            .unwrap_or(false),
        undo_description: get(MetadataField::UndoDescription).unwrap_or_default(),
        developer: get(MetadataField::Developer).unwrap_or_default(),
        link: get(MetadataField::Link).unwrap_or_default(),
    }
}

/// Parse a script's metadata using the platform's executable lookup.
pub fn parse_script_metadata(path: &Path) -> ScriptMetadata {
    parse_script_metadata_with(path, &SystemVersionInfo::default())
}

/// Parse a script's metadata. Total over valid paths: I/O failures are folded
/// into the `description` field rather than returned.
pub fn parse_script_metadata_with(path: &Path, exe_info: &dyn VersionInfoProvider) -> ScriptMetadata {
    if ScriptKind::from_path(path) == Some(ScriptKind::Executable) {
        return exe_metadata(path, exe_info);
    }

    let default_name = base_name(path);
    match read_scan_window(path) {
        Ok(text) => parse_metadata_text(&text, CommentMarker::for_path(path), &default_name),
        Err(e) => {
            warn!("Error parsing metadata for {}: {}", path.display(), e);
            ScriptMetadata {
                description: format!("Error reading metadata: {}", e),
                ..ScriptMetadata::defaults_for(path)
            }
        }
    }
}

/// Read the first [`SCAN_WINDOW_CHARS`] characters of a file. Invalid UTF-8
/// bytes are dropped, not replaced.
fn read_scan_window(path: &Path) -> std::io::Result<String> {
    let file = std::fs::File::open(path)?;
    let mut buf = Vec::new();
    file.take(SCAN_WINDOW_BYTES).read_to_end(&mut buf)?;
    Ok(decode_ignoring_invalid(&buf)
        .chars()
        .take(SCAN_WINDOW_CHARS)
        .collect())
}

fn decode_ignoring_invalid(bytes: &[u8]) -> String {
    bytes.utf8_chunks().map(|chunk| chunk.valid()).collect()
}

fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_undoable_values() {
        for v in ["Yes", "yes", "TRUE", "1", " true "] {
            assert!(parse_undoable(v), "{v:?} should be undoable");
        }
        for v in ["No", "", "maybe", "0", "y"] {
            assert!(!parse_undoable(v), "{v:?} should not be undoable");
        }
    }

    #[test]
    fn test_marker_is_case_insensitive_and_trims() {
        let text = "#   name:   Clean Temp   \n# Developer:\tAda\n";
        let meta = parse_metadata_text(text, CommentMarker::Hash, "x.py");
        assert_eq!(meta.friendly_name, "Clean Temp");
        assert_eq!(meta.developer, "Ada");
    }

    #[test]
    fn test_value_requires_line_terminator() {
        let meta = parse_metadata_text("# NAME: Cut", CommentMarker::Hash, "x.py");
        assert_eq!(meta.friendly_name, "x.py");
    }

    #[test]
    fn test_crlf_line_endings() {
        let text = ":: NAME: Flush DNS\r\n:: UNDOABLE: no\r\n";
        let meta = parse_metadata_text(text, CommentMarker::DoubleColon, "f.bat");
        assert_eq!(meta.friendly_name, "Flush DNS");
        assert!(!meta.undoable);
    }

    #[test]
    fn test_undo_desc_does_not_shadow_undoable() {
        let text = "# UNDO_DESC: puts it back\n# UNDOABLE: true\n";
        let meta = parse_metadata_text(text, CommentMarker::Hash, "x.ps1");
        assert!(meta.undoable);
        assert_eq!(meta.undo_description, "puts it back");
    }

    #[test]
    fn test_invalid_bytes_are_dropped() {
        assert_eq!(decode_ignoring_invalid(b"caf\xe9 au lait"), "caf au lait");
        assert_eq!(decode_ignoring_invalid("na\u{ef}ve".as_bytes()), "na\u{ef}ve");
    }

    #[test]
    fn test_fields_order() {
        let meta = ScriptMetadata {
            friendly_name: "n".into(),
            description: "d".into(),
            undoable: true,
            undo_description: "u".into(),
            developer: "dev".into(),
            link: "l".into(),
        };
        assert_eq!(meta.fields(), ("n", "d", true, "u", "dev", "l"));
    }
}
