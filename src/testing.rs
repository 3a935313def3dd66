// file: src/testing.rs
// version: 1.0.0
// guid: 79eb5355-e0e5-4e7d-a3c5-b1ba370fd7c4

//! Test doubles for the system command and sleep capabilities

use crate::config::{
    Credentials, DhcpConfig, IpmiConfig, IpmiMethod, NetworkConfig, ProvisioningConfig,
    RetryConfig,
};
use crate::executor::{CommandOutput, SystemCommand};
use crate::utils::clock::Sleeper;
use crate::Result;
use std::collections::HashSet;
use std::net::Ipv4Addr;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

/// One recorded invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCommand {
    pub program: String,
    pub args: Vec<String>,
    pub env: Vec<(String, String)>,
}

impl RecordedCommand {
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Fake [`SystemCommand`]: records calls, answers from canned responses
pub struct FakeSystem {
    responses: Vec<(String, CommandOutput)>,
    missing: HashSet<String>,
    privileged: bool,
    calls: Mutex<Vec<RecordedCommand>>,
}

impl FakeSystem {
    /// Everything installed, running as root, every command succeeds
    pub fn new() -> Self {
        Self {
            responses: Vec::new(),
            missing: HashSet::new(),
            privileged: true,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Answer commands whose command line starts with `prefix`
    pub fn with_response(mut self, prefix: &str, output: CommandOutput) -> Self {
        self.responses.push((prefix.to_string(), output));
        self
    }

    pub fn without_tool(mut self, tool: &str) -> Self {
        self.missing.insert(tool.to_string());
        self
    }

    pub fn unprivileged(mut self) -> Self {
        self.privileged = false;
        self
    }

    pub fn calls(&self) -> Vec<RecordedCommand> {
        self.calls.lock().unwrap().clone()
    }

    pub fn command_lines(&self) -> Vec<String> {
        self.calls().iter().map(RecordedCommand::command_line).collect()
    }
}

#[async_trait::async_trait]
impl SystemCommand for FakeSystem {
    async fn run(
        &self,
        program: &str,
        args: &[&str],
        env: &[(&str, &str)],
    ) -> Result<CommandOutput> {
        let recorded = RecordedCommand {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            env: env
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        };
        let line = recorded.command_line();
        self.calls.lock().unwrap().push(recorded);

        Ok(self
            .responses
            .iter()
            .find(|(prefix, _)| line.starts_with(prefix.as_str()))
            .map(|(_, output)| output.clone())
            .unwrap_or_else(|| CommandOutput::ok("")))
    }

    fn command_exists(&self, program: &str) -> bool {
        !self.missing.contains(program)
    }

    fn is_privileged(&self) -> bool {
        self.privileged
    }
}

type SleepHook = Box<dyn Fn(usize) + Send + Sync>;

/// Fake [`Sleeper`]: returns immediately and records requested durations
pub struct RecordingSleeper {
    sleeps: Mutex<Vec<Duration>>,
    hook: Option<SleepHook>,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        Self {
            sleeps: Mutex::new(Vec::new()),
            hook: None,
        }
    }

    /// Call `hook` with the 1-based sleep count after each sleep
    pub fn with_hook(hook: impl Fn(usize) + Send + Sync + 'static) -> Self {
        Self {
            sleeps: Mutex::new(Vec::new()),
            hook: Some(Box::new(hook)),
        }
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        let count = {
            let mut sleeps = self.sleeps.lock().unwrap();
            sleeps.push(duration);
            sleeps.len()
        };
        if let Some(hook) = &self.hook {
            hook(count);
        }
    }
}

/// Valid configuration pointing at the given dnsmasq files
pub fn sample_config(config_file: PathBuf, leases_file: PathBuf) -> ProvisioningConfig {
    ProvisioningConfig {
        network: NetworkConfig {
            interface: "eth0".to_string(),
            dhcp_range_start: Ipv4Addr::new(192, 168, 100, 10),
            dhcp_range_end: Ipv4Addr::new(192, 168, 100, 200),
            subnet_mask: Ipv4Addr::new(255, 255, 255, 0),
            gateway: Ipv4Addr::new(192, 168, 100, 1),
        },
        dhcp: DhcpConfig {
            config_file,
            leases_file,
        },
        ipmi: IpmiConfig {
            credentials: Credentials {
                username: "ADMIN".to_string(),
                password: "changeme".to_string(),
            },
            method: IpmiMethod::Script,
            script: PathBuf::from("./ipmi_set_ip.sh"),
            channel: 1,
            interface: "lanplus".to_string(),
        },
        provisioning: RetryConfig::default(),
    }
}
