//! External compiler toolchain configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

fn default_binary() -> String {
    "forge".to_string()
}

const fn default_compile_timeout_secs() -> u64 {
    30
}

const fn default_test_timeout_secs() -> u64 {
    60
}

const fn default_force_rebuild() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ToolchainConfig {
    /// Toolchain executable (name on `PATH` or absolute path).
    #[serde(default = "default_binary")]
    pub binary: String,

    /// Wall-clock limit for `build`, in seconds.
    #[serde(default = "default_compile_timeout_secs")]
    pub compile_timeout_secs: u64,

    /// Wall-clock limit for `test`, in seconds.
    #[serde(default = "default_test_timeout_secs")]
    pub test_timeout_secs: u64,

    /// Pass the forced-rebuild flag on every invocation.
    #[serde(default = "default_force_rebuild")]
    pub force_rebuild: bool,
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            binary: default_binary(),
            compile_timeout_secs: default_compile_timeout_secs(),
            test_timeout_secs: default_test_timeout_secs(),
            force_rebuild: default_force_rebuild(),
        }
    }
}

impl ToolchainConfig {
    #[must_use]
    pub const fn compile_timeout(&self) -> Duration {
        Duration::from_secs(self.compile_timeout_secs)
    }

    #[must_use]
    pub const fn test_timeout(&self) -> Duration {
        Duration::from_secs(self.test_timeout_secs)
    }
}
