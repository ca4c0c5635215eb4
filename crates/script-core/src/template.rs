//! Starter scripts with a metadata header and an undo branch.

use crate::error::TemplateError;
use crate::kind::ScriptKind;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone)]
pub struct ScriptTemplate {
    pub name: String,
    pub developer: String,
    pub link: String,
    pub description: String,
    pub undoable: bool,
    pub undo_description: String,
}

impl Default for ScriptTemplate {
    fn default() -> Self {
        Self {
            name: "Script Name".to_string(),
            developer: "Unknown Developer".to_string(),
            link: String::new(),
            description: "Script Description".to_string(),
            undoable: true,
            undo_description: "Reverts the changes made by this script".to_string(),
        }
    }
}

impl ScriptTemplate {
    fn header(&self, marker: &str) -> String {
        format!(
            "{m} NAME: {}\n{m} DEVELOPER: {}\n{m} LINK: {}\n{m} DESCRIPTION: {}\n{m} UNDOABLE: {}\n{m} UNDO_DESC: {}\n{m}\n",
            self.name,
            self.developer,
            self.link,
            self.description,
            if self.undoable { "Yes" } else { "No" },
            self.undo_description,
            m = marker,
        )
    }

    /// Full source text for a new script of `kind`.
    pub fn render(&self, kind: ScriptKind) -> Result<String, TemplateError> {
        let header = self.header(kind.comment_marker().as_str());
        let body = match kind {
            ScriptKind::Python => python_body(&self.description),
            ScriptKind::PowerShell => POWERSHELL_BODY.to_string(),
            ScriptKind::Batch => BATCH_BODY.to_string(),
            ScriptKind::Executable => return Err(TemplateError::ExecutableKind),
        };
        Ok(format!("{}{}", header, body))
    }
}

/// Write `<dir>/<name>.<ext>` from the template, using the kind's usual
/// extension. Refuses to replace an existing file unless `overwrite` is set.
pub fn create_script(
    dir: &Path,
    kind: ScriptKind,
    template: &ScriptTemplate,
    overwrite: bool,
) -> Result<PathBuf, TemplateError> {
    create_script_with_extension(dir, kind.extension(), template, overwrite)
}

/// Like [`create_script`], but keeps the given extension, so `cmd` yields a
/// `.cmd` file rather than `.bat`.
pub fn create_script_with_extension(
    dir: &Path,
    extension: &str,
    template: &ScriptTemplate,
    overwrite: bool,
) -> Result<PathBuf, TemplateError> {
    let extension = extension.trim_start_matches('.').to_ascii_lowercase();
    let kind = ScriptKind::from_extension(&extension)
        .ok_or_else(|| TemplateError::UnknownType(extension.clone()))?;
    let name = template.name.trim();
    if name.is_empty() {
        return Err(TemplateError::EmptyName);
    }
    let content = template.render(kind)?;

    let suffix = format!(".{}", extension);
    let file_name = if name.to_lowercase().ends_with(&suffix) {
        name.to_string()
    } else {
        format!("{}{}", name, suffix)
    };
    let path = dir.join(&file_name);
    if path.exists() && !overwrite {
        return Err(TemplateError::AlreadyExists(path.display().to_string()));
    }

    std::fs::create_dir_all(dir)?;
    std::fs::write(&path, content)?;
    info!("Created new script: {}", path.display());
    Ok(path)
}

/// Single-quoted Python string literal for `s`.
fn python_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\x{:02x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

fn python_body(description: &str) -> String {
    let description = python_literal(description);
    format!(
        r#"# This is a Python script template with undo capability

import argparse


def main():
    parser = argparse.ArgumentParser(description={description})
    parser.add_argument('--undo', action='store_true', help='Undo the changes made by this script')
    args = parser.parse_args()

    if args.undo:
        perform_undo()
    else:
        perform_action()


def perform_action():
    print("Performing main action...")


def perform_undo():
    print("Performing undo action...")


if __name__ == "__main__":
    main()
"#
    )
}

const POWERSHELL_BODY: &str = r#"# This is a PowerShell script template with undo capability

param (
    [switch]$Undo
)

function Perform-Action {
    Write-Host "Performing main action..."
}

function Perform-Undo {
    Write-Host "Performing undo action..."
}

if ($Undo) {
    Perform-Undo
} else {
    Perform-Action
}
"#;

const BATCH_BODY: &str = r#":: This is a Batch script template with undo capability

@echo off

if "%1"=="undo" goto :undo

:main
echo Performing main action...
goto :end

:undo
echo Performing undo action...
goto :end

:end
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::CommentMarker;
    use crate::metadata::parse_metadata_text;

    fn template() -> ScriptTemplate {
        ScriptTemplate {
            name: "Disable Cortana".into(),
            developer: "Ada".into(),
            link: "https://example.com/ada".into(),
            description: "Turns Cortana off".into(),
            undoable: true,
            undo_description: "Turns it back on".into(),
        }
    }

    #[test]
    fn test_rendered_header_parses_back() {
        for kind in [ScriptKind::Python, ScriptKind::PowerShell, ScriptKind::Batch] {
            let text = template().render(kind).unwrap();
            let meta = parse_metadata_text(&text, kind.comment_marker(), "fallback");
            assert_eq!(meta.friendly_name, "Disable Cortana", "{kind}");
            assert_eq!(meta.developer, "Ada");
            assert_eq!(meta.link, "https://example.com/ada");
            assert!(meta.undoable);
            assert_eq!(meta.undo_description, "Turns it back on");
        }
    }

    #[test]
    fn test_batch_header_uses_double_colon() {
        let text = template().render(ScriptKind::Batch).unwrap();
        assert!(text.starts_with(":: NAME: Disable Cortana"));
        assert!(text.contains("if \"%1\"==\"undo\""));
        let hash = parse_metadata_text(&text, CommentMarker::Hash, "fallback");
        assert_eq!(hash.friendly_name, "fallback");
    }

    #[test]
    fn test_executable_rejected() {
        assert!(matches!(
            template().render(ScriptKind::Executable),
            Err(TemplateError::ExecutableKind)
        ));
    }

    #[test]
    fn test_create_script_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = create_script(dir.path(), ScriptKind::Python, &template(), false).unwrap();
        assert_eq!(path.file_name().unwrap(), "Disable Cortana.py");
        assert!(std::fs::read_to_string(&path).unwrap().contains("--undo"));

        let again = create_script(dir.path(), ScriptKind::Python, &template(), false);
        assert!(matches!(again, Err(TemplateError::AlreadyExists(_))));
        assert!(create_script(dir.path(), ScriptKind::Python, &template(), true).is_ok());
    }

    #[test]
    fn test_create_script_keeps_given_extension() {
        let dir = tempfile::tempdir().unwrap();
        let t = ScriptTemplate {
            name: "flush.BAT".into(),
            ..ScriptTemplate::default()
        };
        let path = create_script(dir.path(), ScriptKind::Batch, &t, false).unwrap();
        assert_eq!(path.file_name().unwrap(), "flush.BAT");
    }

    #[test]
    fn test_cmd_extension_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = create_script_with_extension(dir.path(), ".CMD", &template(), false).unwrap();
        assert_eq!(path.file_name().unwrap(), "Disable Cortana.cmd");
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with(":: NAME: Disable Cortana"));

        assert!(matches!(
            create_script_with_extension(dir.path(), "sh", &template(), false),
            Err(TemplateError::UnknownType(ext)) if ext == "sh"
        ));
    }

    #[test]
    fn test_python_literal_escaping() {
        assert_eq!(python_literal("plain"), "'plain'");
        assert_eq!(python_literal(r"it's C:\Temp"), r"'it\'s C:\\Temp'");
        assert_eq!(python_literal("a\tb\u{7f}\u{1b}"), r"'a\tb\x7f\x1b'");
        assert_eq!(python_literal("say \"hi\" caf\u{e9}"), "'say \"hi\" caf\u{e9}'");

        let t = ScriptTemplate {
            description: "Cleans\u{7f} temp".into(),
            ..template()
        };
        let text = t.render(ScriptKind::Python).unwrap();
        assert!(text.contains(r"ArgumentParser(description='Cleans\x7f temp')"));
    }

    #[test]
    fn test_empty_name() {
        let dir = tempfile::tempdir().unwrap();
        let t = ScriptTemplate {
            name: "  ".into(),
            ..ScriptTemplate::default()
        };
        assert!(matches!(
            create_script(dir.path(), ScriptKind::PowerShell, &t, false),
            Err(TemplateError::EmptyName)
        ));
    }
}
