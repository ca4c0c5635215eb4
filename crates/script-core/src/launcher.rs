use crate::error::LaunchError;
use crate::request::ScriptRequest;

/// Turns a [`ScriptRequest`] into a started process.
///
/// Implementations validate the request (extension, undo support) before
/// touching the OS and return as soon as the process has been started; they
/// never wait for the script to finish.
#[async_trait::async_trait]
pub trait Launcher: Send + Sync {
    /// What the caller gets back: a live process handle for attached launches,
    /// an acceptance report for detached ones.
    type Handle: Send;

    /// Launcher name used in logs ("local", "elevated").
    fn name(&self) -> &str;

    async fn launch(&self, request: &ScriptRequest) -> Result<Self::Handle, LaunchError>;
}
