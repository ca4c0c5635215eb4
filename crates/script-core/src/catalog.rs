//! Category directories and the scripts inside them.

use crate::error::CatalogError;
use crate::exe_info::{SystemVersionInfo, VersionInfoProvider};
use crate::kind::ScriptKind;
use crate::metadata::{parse_script_metadata_with, ScriptMetadata};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// A script file found in a category, with freshly parsed metadata.
#[derive(Debug, Clone, Serialize)]
pub struct ScriptEntry {
    pub category: String,
    pub file_name: String,
    pub path: PathBuf,
    pub kind: ScriptKind,
    pub metadata: ScriptMetadata,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EnsureReport {
    pub created: Vec<String>,
    pub existing: Vec<String>,
}

/// Scripts are organized as `<root>/<category>/<script>`.
pub struct Catalog {
    root: PathBuf,
    exe_info: Box<dyn VersionInfoProvider>,
}

impl Catalog {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_version_info(root, Box::new(SystemVersionInfo::default()))
    }

    pub fn with_version_info(root: impl Into<PathBuf>, exe_info: Box<dyn VersionInfoProvider>) -> Self {
        Self {
            root: root.into(),
            exe_info,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the root and any missing category directories.
    pub fn ensure_categories(&self, categories: &[String]) -> Result<EnsureReport, CatalogError> {
        if !self.root.exists() {
            info!("Creating base directory: {}", self.root.display());
        }
        std::fs::create_dir_all(&self.root)?;

        let mut report = EnsureReport::default();
        for category in categories {
            let dir = self.category_dir(category)?;
            if dir.is_dir() {
                report.existing.push(category.clone());
            } else {
                std::fs::create_dir_all(&dir)?;
                info!("Created directory: {}", dir.display());
                report.created.push(category.clone());
            }
        }
        Ok(report)
    }

    pub fn add_category(&self, name: &str) -> Result<PathBuf, CatalogError> {
        let dir = self.category_dir(name)?;
        std::fs::create_dir_all(&dir)?;
        info!("Created new category: {}", name);
        Ok(dir)
    }

    /// Category directory names, sorted.
    pub fn categories(&self) -> Result<Vec<String>, CatalogError> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in std::fs::read_dir(&self.root)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Supported scripts in `category`, sorted by friendly name (case-insensitive).
    pub fn scripts(&self, category: &str) -> Result<Vec<ScriptEntry>, CatalogError> {
        let dir = self.category_dir(category)?;
        if !dir.is_dir() {
            return Err(CatalogError::CategoryNotFound(category.to_string()));
        }

        let mut scripts = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Some(kind) = ScriptKind::from_path(&path) else {
                continue;
            };
            let metadata = parse_script_metadata_with(&path, self.exe_info.as_ref());
            scripts.push(ScriptEntry {
                category: category.to_string(),
                file_name: entry.file_name().to_string_lossy().into_owned(),
                path,
                kind,
                metadata,
            });
        }
        scripts.sort_by_key(|s| s.metadata.friendly_name.to_lowercase());
        Ok(scripts)
    }

    /// Every script in every category.
    pub fn all_scripts(&self) -> Result<Vec<ScriptEntry>, CatalogError> {
        let mut all = Vec::new();
        for category in self.categories()? {
            match self.scripts(&category) {
                Ok(mut scripts) => all.append(&mut scripts),
                Err(e) => warn!("Skipping category {}: {}", category, e),
            }
        }
        Ok(all)
    }

    /// Find a script by file name, file stem or friendly name (case-insensitive).
    pub fn find_script(&self, query: &str) -> Result<Option<ScriptEntry>, CatalogError> {
        let needle = query.to_lowercase();
        Ok(self.all_scripts()?.into_iter().find(|s| {
            s.file_name.to_lowercase() == needle
                || s.path
                    .file_stem()
                    .is_some_and(|stem| stem.to_string_lossy().to_lowercase() == needle)
                || s.metadata.friendly_name.to_lowercase() == needle
        }))
    }

    fn category_dir(&self, name: &str) -> Result<PathBuf, CatalogError> {
        let trimmed = name.trim();
        if trimmed.is_empty()
            || trimmed == "."
            || trimmed == ".."
            || trimmed.contains(['/', '\\'])
        {
            return Err(CatalogError::InvalidCategory(name.to_string()));
        }
        Ok(self.root.join(trimmed))
    }
}
