#[cfg(test)]
mod tests {
    use script_core::exe_info::{VersionInfo, VersionInfoProvider, VersionLookup};
    use script_core::metadata::{parse_script_metadata_with, ScriptMetadata, SCAN_WINDOW_CHARS};
    use std::path::{Path, PathBuf};

    struct Lookup(VersionLookup);

    impl VersionInfoProvider for Lookup {
        fn lookup(&self, _path: &Path) -> VersionLookup {
            self.0.clone()
        }
    }

    fn unavailable() -> Lookup {
        Lookup(VersionLookup::Unavailable)
    }

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    fn parse(path: &Path) -> ScriptMetadata {
        parse_script_metadata_with(path, &unavailable())
    }

    #[test]
    fn test_no_markers_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["plain.py", "plain.ps1", "plain.bat", "plain.cmd", "plain.txt"] {
            let path = write(dir.path(), name, "echo hello\nrem nothing here\n");
            let meta = parse(&path);
            assert_eq!(meta.friendly_name, name);
            assert_eq!(meta.description, "");
            assert!(!meta.undoable);
            assert_eq!(meta.undo_description, "");
            assert_eq!(meta.developer, "");
            assert_eq!(meta.link, "");
        }
    }

    #[test]
    fn test_empty_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "empty.ps1", "");
        assert_eq!(parse(&path), ScriptMetadata::defaults_for(&path));
    }

    #[test]
    fn test_full_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "telemetry.ps1",
            "# NAME: Disable Telemetry\n\
             # DEVELOPER: Jane Doe\n\
             # LINK: https://github.com/janedoe\n\
             # DESCRIPTION: Turns off diagnostic data\n\
             # UNDOABLE: Yes\n\
             # UNDO_DESC: Restores defaults\n\
             param([switch]$Undo)\n",
        );
        let meta = parse(&path);
        assert_eq!(
            meta.fields(),
            (
                "Disable Telemetry",
                "Turns off diagnostic data",
                true,
                "Restores defaults",
                "Jane Doe",
                "https://github.com/janedoe"
            )
        );
    }

    #[test]
    fn test_fields_are_independent() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "two.py", "#UNDOABLE: true\nimport os\n# NAME: Two Fields\n");
        let meta = parse(&path);
        assert_eq!(meta.friendly_name, "Two Fields");
        assert!(meta.undoable);
        assert_eq!(meta.description, "");
        assert_eq!(meta.undo_description, "");
        assert_eq!(meta.developer, "");
        assert_eq!(meta.link, "");
    }

    #[test]
    fn test_undoable_normalization() {
        let dir = tempfile::tempdir().unwrap();
        let cases = [
            ("Yes", true),
            ("yes", true),
            ("TRUE", true),
            ("1", true),
            ("No", false),
            ("", false),
            ("maybe", false),
        ];
        for (i, (value, expected)) in cases.iter().enumerate() {
            let path = write(dir.path(), &format!("u{i}.py"), &format!("# UNDOABLE: {value}\n"));
            assert_eq!(parse(&path).undoable, *expected, "value {value:?}");
        }
        let absent = write(dir.path(), "absent.py", "# NAME: x\n");
        assert!(!parse(&absent).undoable);
    }

    #[test]
    fn test_comment_marker_follows_extension() {
        let dir = tempfile::tempdir().unwrap();
        let good = write(dir.path(), "good.bat", "@echo off\n:: NAME: Foo\n");
        assert_eq!(parse(&good).friendly_name, "Foo");

        let wrong = write(dir.path(), "wrong.bat", "# NAME: Foo\n");
        assert_eq!(parse(&wrong).friendly_name, "wrong.bat");

        let cmd = write(dir.path(), "shell.CMD", "::NAME:Bar\n");
        assert_eq!(parse(&cmd).friendly_name, "Bar");

        let py = write(dir.path(), "colons.py", ":: NAME: Foo\n");
        assert_eq!(parse(&py).friendly_name, "colons.py");
    }

    #[test]
    fn test_scan_window_boundary() {
        let dir = tempfile::tempdir().unwrap();

        let mut early = "x".repeat(99);
        early.push('\n');
        early.push_str("# NAME: Early\n");
        early.push_str(&"y".repeat(5000));
        let path = write(dir.path(), "early.py", &early);
        assert_eq!(parse(&path).friendly_name, "Early");

        let mut late = "z".repeat(SCAN_WINDOW_CHARS + 10);
        late.push('\n');
        late.push_str("# NAME: Late\n");
        let path = write(dir.path(), "late.py", &late);
        assert_eq!(parse(&path).friendly_name, "late.py");
    }

    #[test]
    fn test_window_counts_characters_not_bytes() {
        let dir = tempfile::tempdir().unwrap();
        // 1500 three-byte characters exceed 2000 bytes but not 2000 characters.
        let mut text = "\u{20AC}".repeat(1500);
        text.push('\n');
        text.push_str("# NAME: Wide\n");
        let path = write(dir.path(), "wide.py", &text);
        assert_eq!(parse(&path).friendly_name, "Wide");
    }

    #[test]
    fn test_last_line_without_newline_is_not_matched() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "tail.py", "print(1)\n# NAME: Tail");
        assert_eq!(parse(&path).friendly_name, "tail.py");

        let terminated = write(dir.path(), "done.py", "print(1)\n# NAME: Tail\n");
        assert_eq!(parse(&terminated).friendly_name, "Tail");
    }

    #[test]
    fn test_invalid_utf8_bytes_are_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("latin.py");
        let mut bytes = b"# DESCRIPTION: caf\xe9\n".to_vec();
        bytes.extend_from_slice(b"# NAME: Latin\n");
        std::fs::write(&path, bytes).unwrap();
        let meta = parse(&path);
        assert_eq!(meta.friendly_name, "Latin");
        assert_eq!(meta.description, "caf");
    }

    #[test]
    fn test_unreadable_file_degrades() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vanished.py");
        let meta = parse(&path);
        assert_eq!(meta.friendly_name, "vanished.py");
        assert!(meta.description.starts_with("Error reading metadata:"));
        assert!(!meta.undoable);
        assert_eq!(meta.developer, "");
    }

    #[test]
    fn test_exe_ignores_text_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "Tool.exe", "# NAME: Not Me\n# UNDOABLE: yes\n");

        let meta = parse(&path);
        assert_eq!(meta.friendly_name, "Tool");
        assert!(!meta.undoable);

        let failed = parse_script_metadata_with(&path, &Lookup(VersionLookup::Failed("no resource".into())));
        assert_eq!(failed.friendly_name, "Tool");
        assert!(!failed.undoable);

        let found = parse_script_metadata_with(
            &path,
            &Lookup(VersionLookup::Found(VersionInfo {
                product_name: Some("Tool Suite".into()),
                file_description: Some("Does things".into()),
            })),
        );
        assert_eq!(found.friendly_name, "Tool Suite");
        assert!(!found.undoable);
        assert!(found.undo_description.is_empty());
    }

    #[test]
    fn test_missing_exe_still_has_name() {
        let meta = parse(Path::new("/definitely/not/here/ghost.exe"));
        assert_eq!(meta.friendly_name, "ghost");
        assert!(!meta.undoable);
    }
}
