//! Installs run against stub interpreters that log their arguments.
//! Kept to one test so no other test forks while the stubs are written.
#![cfg(unix)]

use script_core::outcome::RunOutcome;
use script_local::{collect_events, install_python_modules};
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

struct Stub {
    interpreter: PathBuf,
    log: PathBuf,
}

impl Stub {
    fn calls(&self) -> Vec<String> {
        std::fs::read_to_string(&self.log)
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }
}

fn stub(dir: &Path, name: &str, has_pip: bool, install_code: i32) -> Stub {
    let interpreter = dir.join(name);
    let log = dir.join(format!("{name}.log"));
    let script = format!(
        "#!/bin/sh\n\
         echo \"$*\" >> '{log}'\n\
         case \"$*\" in\n\
         \"-m pip --version\") {check} ;;\n\
         \"-m ensurepip --upgrade\") echo no ensurepip; exit 1 ;;\n\
         \"-m pip install --upgrade pip\") exit 0 ;;\n\
         \"-m pip install \"*) echo \"Collecting $4\"; echo \"note on stderr\" >&2; exit {install_code} ;;\n\
         esac\n\
         exit 2\n",
        log = log.display(),
        check = if has_pip { "echo pip 24.0; exit 0" } else { "exit 1" },
    );
    std::fs::write(&interpreter, script).unwrap();
    std::fs::set_permissions(&interpreter, std::fs::Permissions::from_mode(0o755)).unwrap();
    Stub { interpreter, log }
}

fn modules(names: &[&str]) -> Vec<String> {
    names.iter().map(|m| m.to_string()).collect()
}

#[tokio::test]
async fn test_install_python_modules() {
    let dir = tempfile::tempdir().unwrap();
    let good = stub(dir.path(), "good", true, 0);
    let no_pip = stub(dir.path(), "nopip", false, 0);
    let broken = stub(dir.path(), "broken", true, 3);

    // Upgrade, then install; pip output is merged into the stream.
    let rx = install_python_modules(
        good.interpreter.to_str().unwrap(),
        &modules(&["requests", "yaml"]),
        true,
    );
    let (lines, outcome) = collect_events(rx).await;
    assert_eq!(outcome, RunOutcome::Succeeded);
    assert!(lines.contains(&"pip 24.0".to_string()), "{lines:?}");
    assert!(lines.contains(&"Collecting requests".to_string()), "{lines:?}");
    assert!(lines.contains(&"note on stderr".to_string()), "{lines:?}");
    assert_eq!(
        good.calls(),
        vec![
            "-m pip --version",
            "-m pip install --upgrade pip",
            "-m pip install requests yaml",
        ]
    );

    // pip missing and ensurepip failing: nothing is installed.
    let rx = install_python_modules(no_pip.interpreter.to_str().unwrap(), &modules(&["requests"]), false);
    let (_, outcome) = collect_events(rx).await;
    assert_eq!(outcome, RunOutcome::Failed { exit_code: Some(1) });
    assert_eq!(no_pip.calls(), vec!["-m pip --version", "-m ensurepip --upgrade"]);

    // The install step's exit code is the outcome.
    let rx = install_python_modules(broken.interpreter.to_str().unwrap(), &modules(&["psutil"]), false);
    let (_, outcome) = collect_events(rx).await;
    assert_eq!(outcome, RunOutcome::Failed { exit_code: Some(3) });
    assert_eq!(broken.calls(), vec!["-m pip --version", "-m pip install psutil"]);

    // A missing interpreter fails without an exit code.
    let rx = install_python_modules("/nonexistent/python", &modules(&["psutil"]), false);
    let (_, outcome) = collect_events(rx).await;
    assert_eq!(outcome, RunOutcome::Failed { exit_code: None });

    // Nothing to install: no process is started.
    let rx = install_python_modules("/nonexistent/python", &[], true);
    let (lines, outcome) = collect_events(rx).await;
    assert_eq!(outcome, RunOutcome::Succeeded);
    assert!(lines.is_empty());
}
