use crate::dispatch;
use script_core::config::Config;
use script_core::deps::{detect_dependencies, missing_python_modules, Dependencies};
use script_core::outcome::RunOutcome;
use script_local::{install_python_modules, OutputEvent};

pub struct DepsOptions {
    pub check: bool,
    pub install: bool,
    pub upgrade_pip: bool,
}

pub async fn run(config: &Config, script: &str, opts: DepsOptions) -> anyhow::Result<()> {
    let path = dispatch::resolve_script(config, script)?;

    match detect_dependencies(&path)? {
        Dependencies::None => {
            println!("Dependency detection is only available for Python and PowerShell scripts.");
        }
        Dependencies::PowerShell(modules) => {
            if opts.install {
                println!("Dependency installation is only available for Python scripts.");
            }
            if modules.is_empty() {
                println!("No PowerShell modules imported.");
            }
            for m in modules {
                println!("{}", m);
            }
        }
        Dependencies::Python(modules) => {
            if modules.is_empty() {
                println!("No third-party Python modules imported.");
                return Ok(());
            }
            if !opts.check && !opts.install {
                for m in &modules {
                    println!("{}", m);
                }
                return Ok(());
            }
            let python = &config.interpreters.python;
            let missing = missing_python_modules(python, &modules).await?;
            if missing.is_empty() {
                println!("All Python module dependencies appear to be satisfied.");
                return Ok(());
            }
            println!("Missing modules: {}", missing.join(", "));
            if !opts.install {
                println!("Install with: scriptdeck deps --install {}", script);
                return Ok(());
            }
            install(python, &missing, opts.upgrade_pip).await?;
        }
    }
    Ok(())
}

async fn install(python: &str, modules: &[String], upgrade_pip: bool) -> anyhow::Result<()> {
    let mut rx = install_python_modules(python, modules, upgrade_pip);
    let mut outcome = RunOutcome::from_exit_code(None);
    while let Some(event) = rx.recv().await {
        match event {
            OutputEvent::Line(line) => println!("{}", line),
            OutputEvent::Error(message) => eprintln!("\n{}\n", message),
            OutputEvent::Finished(o) => outcome = o,
        }
    }

    match outcome {
        RunOutcome::Succeeded => {
            println!("\n=== Dependencies installed successfully ===\n");
            Ok(())
        }
        RunOutcome::Failed { .. } => {
            anyhow::bail!("Failed to install dependencies: {}", outcome)
        }
    }
}
