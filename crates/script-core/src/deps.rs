//! Module dependencies declared by Python and PowerShell scripts.

use crate::kind::ScriptKind;
use regex::Regex;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::LazyLock;
use tokio::process::Command;
use tracing::debug;

/// Standard-library modules that never need installing.
const PYTHON_BUILTINS: &[&str] = &[
    "os", "sys", "io", "re", "time", "datetime", "math", "json", "random", "threading", "queue",
    "tkinter", "ctypes", "argparse", "subprocess", "traceback", "winreg", "shutil", "pathlib",
    "logging", "collections", "itertools", "functools", "typing", "platform", "socket",
];

static PY_IMPORT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*import\s+([a-zA-Z0-9_.,\t ]+)").expect("valid regex"));

static PY_FROM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*from\s+([a-zA-Z0-9_.]+)\s+import").expect("valid regex"));

static PS_MODULE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Import-Module\s+([a-zA-Z0-9_.-]+)").expect("valid regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dependencies {
    Python(Vec<String>),
    PowerShell(Vec<String>),
    /// Batch files and executables declare no modules.
    None,
}

impl Dependencies {
    pub fn modules(&self) -> &[String] {
        match self {
            Dependencies::Python(m) | Dependencies::PowerShell(m) => m,
            Dependencies::None => &[],
        }
    }
}

/// Top-level, non-builtin modules imported by Python source, sorted.
pub fn python_imports(source: &str) -> Vec<String> {
    let mut modules = BTreeSet::new();

    for caps in PY_IMPORT_RE.captures_iter(source) {
        for item in caps[1].split(',') {
            let base = item.split(" as ").next().unwrap_or("").trim();
            let top = base.split('.').next().unwrap_or("").trim();
            if !top.is_empty() {
                modules.insert(top.to_string());
            }
        }
    }
    for caps in PY_FROM_RE.captures_iter(source) {
        if let Some(top) = caps[1].split('.').next().filter(|t| !t.is_empty()) {
            modules.insert(top.to_string());
        }
    }

    modules
        .into_iter()
        .filter(|m| !PYTHON_BUILTINS.contains(&m.as_str()))
        .collect()
}

/// Modules loaded with `Import-Module`, in order of appearance.
pub fn powershell_modules(source: &str) -> Vec<String> {
    PS_MODULE_RE
        .captures_iter(source)
        .map(|caps| caps[1].trim().to_string())
        .collect()
}

/// Read a script and list the modules it depends on.
pub fn detect_dependencies(path: &Path) -> std::io::Result<Dependencies> {
    let kind = ScriptKind::from_path(path);
    if !matches!(kind, Some(ScriptKind::Python) | Some(ScriptKind::PowerShell)) {
        return Ok(Dependencies::None);
    }
    let bytes = std::fs::read(path)?;
    let source = String::from_utf8_lossy(&bytes);
    Ok(match kind {
        Some(ScriptKind::Python) => Dependencies::Python(python_imports(&source)),
        _ => Dependencies::PowerShell(powershell_modules(&source)),
    })
}

/// Modules from `modules` that `interpreter` cannot import.
pub async fn missing_python_modules(interpreter: &str, modules: &[String]) -> std::io::Result<Vec<String>> {
    let mut missing = Vec::new();
    for module in modules {
        let status = Command::new(interpreter)
            .args(["-c", &format!("import {}", module)])
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .status()
            .await?;
        debug!("import {} -> {}", module, status);
        if !status.success() {
            missing.push(module.clone());
        }
    }
    Ok(missing)
}

/// One `<python> -m ...` command of a module installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipStep {
    /// `pip --version`; a failure means pip has to be bootstrapped.
    Check,
    Bootstrap,
    Upgrade,
    Install(Vec<String>),
}

impl PipStep {
    pub fn args(&self) -> Vec<String> {
        let fixed: &[&str] = match self {
            PipStep::Check => &["-m", "pip", "--version"],
            PipStep::Bootstrap => &["-m", "ensurepip", "--upgrade"],
            PipStep::Upgrade => &["-m", "pip", "install", "--upgrade", "pip"],
            PipStep::Install(_) => &["-m", "pip", "install"],
        };
        let mut args: Vec<String> = fixed.iter().map(|a| a.to_string()).collect();
        if let PipStep::Install(modules) = self {
            args.extend(modules.iter().cloned());
        }
        args
    }

    pub fn describe(&self) -> String {
        match self {
            PipStep::Check => "Checking pip installation".to_string(),
            PipStep::Bootstrap => "Installing pip".to_string(),
            PipStep::Upgrade => "Upgrading pip to latest version".to_string(),
            PipStep::Install(modules) => format!("Installing {}", modules.join(", ")),
        }
    }
}
