// file: src/error.rs
// version: 3.0.0
// guid: c2e21015-fd92-4e84-8983-1d9c4215729c

//! Error types for IPMIrage

use thiserror::Error;

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, ProvisionError>;

/// Error types for the provisioning run
#[derive(Error, Debug)]
pub enum ProvisionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Input error: {0}")]
    Input(String),

    #[error("Permission denied: {0}")]
    Permission(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Required tool '{tool}' is not installed. {hint}")]
    MissingTool { tool: String, hint: String },

    #[error("Command '{command}' failed with exit code {exit_code:?}: {stderr}")]
    Process {
        command: String,
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("Network setup error: {0}")]
    Network(String),

    #[error("DHCP error: {0}")]
    Dhcp(String),

    #[error("No DHCP lease found for {0}")]
    LeaseNotFound(String),

    #[error("Device configuration error: {0}")]
    Device(String),
}

impl ProvisionError {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new input error
    pub fn input(msg: impl Into<String>) -> Self {
        Self::Input(msg.into())
    }

    /// Create a new permission error
    pub fn permission(msg: impl Into<String>) -> Self {
        Self::Permission(msg.into())
    }

    /// Create a new file not found error
    pub fn file_not_found(msg: impl Into<String>) -> Self {
        Self::FileNotFound(msg.into())
    }

    /// Create a new missing tool error with an install hint
    pub fn missing_tool(tool: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::MissingTool {
            tool: tool.into(),
            hint: hint.into(),
        }
    }

    /// Create a new network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create a new DHCP error
    pub fn dhcp(msg: impl Into<String>) -> Self {
        Self::Dhcp(msg.into())
    }

    /// Create a new device error
    pub fn device(msg: impl Into<String>) -> Self {
        Self::Device(msg.into())
    }

    /// Whether this error only affects a single mapping entry.
    ///
    /// Per-entry errors are logged and skipped by the provisioner; everything
    /// else aborts the run.
    pub fn is_per_entry(&self) -> bool {
        matches!(self, Self::LeaseNotFound(_) | Self::Device(_))
    }
}
