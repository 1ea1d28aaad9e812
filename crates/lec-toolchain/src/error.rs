use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolchainError {
    #[error("failed to start '{binary}': {source}")]
    Spawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{binary}' timed out after {}s", after.as_secs())]
    Timeout { binary: String, after: Duration },
}
