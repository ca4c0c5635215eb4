pub mod catalog;
pub mod config;
pub mod deps;
pub mod error;
pub mod exe_info;
pub mod history;
pub mod invocation;
pub mod kind;
pub mod launcher;
pub mod metadata;
pub mod outcome;
pub mod request;
pub mod template;

pub use config::{Config, Interpreters};
pub use error::LaunchError;
pub use invocation::Invocation;
pub use kind::ScriptKind;
pub use launcher::Launcher;
pub use metadata::{parse_script_metadata, ScriptMetadata};
pub use outcome::RunOutcome;
pub use request::{Elevation, RunId, RunMode, ScriptRequest};
