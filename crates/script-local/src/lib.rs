pub mod elevated_launcher;
pub mod installer;
pub mod local_launcher;
pub mod output;

pub use elevated_launcher::{ElevatedLauncher, ElevationResult};
pub use installer::install_python_modules;
pub use local_launcher::{LocalLauncher, ScriptProcess};
pub use output::{collect_events, spawn_output_pump, OutputEvent};
