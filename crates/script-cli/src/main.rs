use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

mod commands;
mod dispatch;

#[derive(Parser)]
#[command(name = "scriptdeck")]
#[command(about = "Organize, inspect and run automation scripts", long_about = None)]
struct Cli {
    /// Use this config file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List categories and their script counts
    Categories,

    /// Create the scripts directory and the configured categories
    Init,

    /// Create a new category
    AddCategory {
        /// Category name
        name: String,
    },

    /// List scripts with their metadata
    List {
        /// Only this category
        category: Option<String>,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the metadata header of a script
    Info {
        /// Script path, file name or friendly name
        script: String,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Run a script, or undo its effects
    Run {
        /// Script path, file name or friendly name
        script: String,

        /// Invoke the script's undo action
        #[arg(short, long)]
        undo: bool,

        /// Request administrator rights (output goes to a separate window)
        #[arg(short, long)]
        admin: bool,

        /// Undo even if the script does not declare UNDOABLE
        #[arg(short, long)]
        force: bool,
    },

    /// Create a new script from a template
    New {
        /// Category to create the script in
        category: String,

        /// Script name (also the file name)
        name: String,

        /// Script type: py, ps1, bat or cmd
        #[arg(short = 't', long = "type", default_value = "py")]
        kind: String,

        #[arg(long)]
        developer: Option<String>,

        #[arg(long)]
        link: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        /// Declare the script as undoable
        #[arg(long)]
        undoable: bool,

        #[arg(long)]
        undo_desc: Option<String>,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// List the modules a script imports
    Deps {
        /// Script path, file name or friendly name
        script: String,

        /// Check which Python modules are missing
        #[arg(short, long)]
        check: bool,

        /// Install missing Python modules with pip
        #[arg(short, long)]
        install: bool,

        /// Upgrade pip before installing
        #[arg(long, requires = "install")]
        upgrade_pip: bool,
    },

    /// Show recent runs
    History {
        /// Number of runs to show
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Output as JSONL
        #[arg(long)]
        jsonl: bool,
    },

    /// Show or initialize the config file
    Config {
        /// Print the config path only
        #[arg(long)]
        path: bool,

        /// Write a sample config
        #[arg(long)]
        init: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config_path = cli.config;

    use Commands::*;

    match cli.command {
        Config { path, init } => {
            commands::config::run(config_path.as_deref(), path, init).await?;
        }
        Categories => {
            let config = load_config(config_path.as_deref())?;
            commands::categories::list(&config).await?;
        }
        Init => {
            let config = load_config(config_path.as_deref())?;
            commands::categories::init(&config).await?;
        }
        AddCategory { name } => {
            let config = load_config(config_path.as_deref())?;
            commands::categories::add(&config, &name).await?;
        }
        List { category, json } => {
            let config = load_config(config_path.as_deref())?;
            commands::list::run(&config, category, json).await?;
        }
        Info { script, json } => {
            let config = load_config(config_path.as_deref())?;
            commands::info::run(&config, &script, json).await?;
        }
        Run {
            script,
            undo,
            admin,
            force,
        } => {
            let config = load_config(config_path.as_deref())?;
            let opts = commands::run::RunOptions { undo, admin, force };
            if !commands::run::run(&config, &script, opts).await? {
                std::process::exit(1);
            }
        }
        New {
            category,
            name,
            kind,
            developer,
            link,
            description,
            undoable,
            undo_desc,
            force,
        } => {
            let config = load_config(config_path.as_deref())?;
            let args = commands::new::NewScript {
                category,
                name,
                kind,
                developer,
                link,
                description,
                undoable,
                undo_description: undo_desc,
                force,
            };
            commands::new::run(&config, args).await?;
        }
        Deps {
            script,
            check,
            install,
            upgrade_pip,
        } => {
            let config = load_config(config_path.as_deref())?;
            let opts = commands::deps::DepsOptions {
                check,
                install,
                upgrade_pip,
            };
            commands::deps::run(&config, &script, opts).await?;
        }
        History { limit, json, jsonl } => {
            let config = load_config(config_path.as_deref())?;
            commands::history::run(&config, limit, json, jsonl).await?;
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<script_core::Config> {
    let config = match path {
        Some(p) => script_core::Config::load_from(p)?,
        None => script_core::Config::load_default()?,
    };
    Ok(config)
}
