//! Best-effort display metadata for `.exe` files, which carry no text header.

use crate::metadata::ScriptMetadata;
use std::path::Path;
use tracing::debug;

pub const UNAVAILABLE_DESCRIPTION: &str = "Windows Executable";
pub const GENERIC_DESCRIPTION: &str = "Executable file";

/// Version-resource strings read from an executable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionInfo {
    pub product_name: Option<String>,
    pub file_description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionLookup {
    /// No platform facility for reading version resources.
    Unavailable,
    Found(VersionInfo),
    Failed(String),
}

/// Source of OS-level version-resource fields.
pub trait VersionInfoProvider: Send + Sync {
    fn lookup(&self, path: &Path) -> VersionLookup;
}

/// Reads `VersionInfo` through PowerShell on Windows; unavailable elsewhere.
#[derive(Debug, Clone, Default)]
pub struct SystemVersionInfo {
    powershell: Option<String>,
}

impl SystemVersionInfo {
    pub fn new(powershell: impl Into<String>) -> Self {
        Self {
            powershell: Some(powershell.into()),
        }
    }
}

impl VersionInfoProvider for SystemVersionInfo {
    #[cfg(windows)]
    fn lookup(&self, path: &Path) -> VersionLookup {
        use std::os::windows::process::CommandExt;
        const CREATE_NO_WINDOW: u32 = 0x0800_0000;

        let powershell = self.powershell.as_deref().unwrap_or("powershell");
        let script = format!(
            "$v = (Get-Item -LiteralPath '{}').VersionInfo; $v.ProductName; $v.FileDescription",
            path.display().to_string().replace('\'', "''")
        );
        let output = std::process::Command::new(powershell)
            .args(["-NoProfile", "-NonInteractive", "-Command", &script])
            .creation_flags(CREATE_NO_WINDOW)
            .output();

        match output {
            Ok(o) if o.status.success() => {
                let text = String::from_utf8_lossy(&o.stdout);
                let mut lines = text.lines().map(|l| l.trim().to_string());
                let non_empty = |s: Option<String>| s.filter(|v| !v.is_empty());
                VersionLookup::Found(VersionInfo {
                    product_name: non_empty(lines.next()),
                    file_description: non_empty(lines.next()),
                })
            }
            Ok(o) => VersionLookup::Failed(String::from_utf8_lossy(&o.stderr).trim().to_string()),
            Err(e) => VersionLookup::Failed(e.to_string()),
        }
    }

    #[cfg(not(windows))]
    fn lookup(&self, _path: &Path) -> VersionLookup {
        let _ = &self.powershell;
        VersionLookup::Unavailable
    }
}

/// Build metadata for an executable. Never fails: lookup problems degrade to
/// the file stem and a generic description.
pub fn exe_metadata(path: &Path, provider: &dyn VersionInfoProvider) -> ScriptMetadata {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| path.display().to_string());

    let (name, description) = match provider.lookup(path) {
        VersionLookup::Unavailable => (stem, UNAVAILABLE_DESCRIPTION.to_string()),
        VersionLookup::Failed(reason) => {
            debug!("Version lookup failed for {}: {}", path.display(), reason);
            (stem, GENERIC_DESCRIPTION.to_string())
        }
        VersionLookup::Found(info) => (
            info.product_name.filter(|s| !s.trim().is_empty()).unwrap_or(stem),
            info.file_description
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| GENERIC_DESCRIPTION.to_string()),
        ),
    };

    ScriptMetadata {
        friendly_name: name,
        description,
        ..ScriptMetadata::empty()
    }
}
