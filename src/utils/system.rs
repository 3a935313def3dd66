// file: src/utils/system.rs
// version: 2.0.0
// guid: b382ab32-71f9-4b8f-a6d8-c2117b3f3a6f

//! System utility functions

use crate::executor::SystemCommand;
use tracing::debug;

/// Tools the provisioning run shells out to
pub const REQUIRED_TOOLS: [&str; 4] = ["ip", "dnsmasq", "systemctl", "ipmitool"];

/// System utility functions
pub struct SystemUtils;

impl SystemUtils {
    /// Check if a command exists in PATH
    pub fn command_exists(command: &str) -> bool {
        match which::which(command) {
            Ok(path) => {
                debug!("Found {} at {}", command, path.display());
                true
            }
            Err(_) => false,
        }
    }

    /// Check if running as root
    pub fn is_root() -> bool {
        #[cfg(unix)]
        {
            unsafe { libc::geteuid() == 0 }
        }
        #[cfg(not(unix))]
        {
            false
        }
    }

    /// Package install hint for a missing tool
    pub fn install_hint(tool: &str) -> String {
        let package = match tool {
            "ip" => "iproute2",
            "systemctl" => "systemd",
            other => other,
        };
        format!("Please install it with: sudo apt-get install {}", package)
    }

    /// Return the tools from `tools` that are not available
    pub fn missing_tools<'a>(system: &dyn SystemCommand, tools: &[&'a str]) -> Vec<&'a str> {
        tools
            .iter()
            .copied()
            .filter(|tool| !system.command_exists(tool))
            .collect()
    }
}
