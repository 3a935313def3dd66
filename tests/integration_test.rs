// file: tests/integration_test.rs
// version: 2.0.0
// guid: dea053d4-8d25-45ad-b523-27e77bf689c9

//! Integration tests for IPMIrage

use ipmirage::{
    config::ConfigLoader,
    executor::{CommandOutput, SystemCommand},
    mapping::parse_mapping_file,
    provisioner::{ProvisionState, Provisioner},
    utils::clock::Sleeper,
    ProvisionError, Result,
};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;
use tempfile::TempDir;

/// Records every command and reports success for all of them
#[derive(Default)]
struct ScriptedSystem {
    calls: Mutex<Vec<(String, Vec<String>, Vec<(String, String)>)>>,
}

#[async_trait::async_trait]
impl SystemCommand for ScriptedSystem {
    async fn run(
        &self,
        program: &str,
        args: &[&str],
        env: &[(&str, &str)],
    ) -> Result<CommandOutput> {
        self.calls.lock().unwrap().push((
            program.to_string(),
            args.iter().map(|a| a.to_string()).collect(),
            env.iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        ));
        Ok(CommandOutput::ok(""))
    }

    fn command_exists(&self, _program: &str) -> bool {
        true
    }

    fn is_privileged(&self) -> bool {
        true
    }
}

#[derive(Default)]
struct CountingSleeper {
    sleeps: Mutex<Vec<Duration>>,
}

#[async_trait::async_trait]
impl Sleeper for CountingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
    }
}

fn write_config(dir: &Path, script: &Path) -> PathBuf {
    let config = format!(
        r#"
network:
  interface: enp3s0
  dhcp_range_start: 192.168.100.10
  dhcp_range_end: 192.168.100.200
  subnet_mask: 255.255.255.0
  gateway: 192.168.100.1
dhcp:
  config_file: {dir}/dnsmasq.d/ipmirage.conf
  leases_file: {dir}/dnsmasq.leases
ipmi:
  username: ADMIN
  password: ${{IPMIRAGE_IT_PASSWORD}}
  script: {script}
provisioning:
  warmup_secs: 2
  lease_attempts: 3
  retry_interval_secs: 1
"#,
        dir = dir.display(),
        script = script.display()
    );
    let path = dir.join("config.yaml");
    std::fs::write(&path, config).unwrap();
    path
}

#[tokio::test]
async fn test_config_loading_with_env_substitution() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let config_path = write_config(temp_dir.path(), Path::new("/opt/ipmi_set_ip.sh"));

    let mut loader = ConfigLoader::new();
    loader.set_env_var("IPMIRAGE_IT_PASSWORD".to_string(), "pa55".to_string());
    let config = loader.load_provisioning_config(&config_path)?;

    assert_eq!(config.network.interface, "enp3s0");
    assert_eq!(config.ipmi.credentials.password, "pa55");
    assert_eq!(config.provisioning.lease_attempts, 3);
    assert_eq!(config.provisioning.warmup(), Duration::from_secs(2));

    Ok(())
}

#[tokio::test]
async fn test_config_missing_env_var_is_error() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = write_config(temp_dir.path(), Path::new("/opt/ipmi_set_ip.sh"));

    let loader = ConfigLoader::new();
    let result = loader.load_provisioning_config(&config_path);
    assert!(matches!(result, Err(ProvisionError::Config(_))));
}

#[test]
fn test_mapping_scenarios() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("mac_to_ip.csv");
    std::fs::write(
        &path,
        "MAC,STATIC_IP,NETMASK,GATEWAY\n\
         AA-BB-CC-DD-EE-FF,10.0.0.5,255.255.255.0,10.0.0.1\n\
         12:34:56:78:9A,10.0.0.6,255.255.255.0,10.0.0.1\n",
    )?;

    let entries = parse_mapping_file(&path)?;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].hardware_address.as_str(), "AA:BB:CC:DD:EE:FF");
    assert_eq!(entries[0].static_address.to_string(), "10.0.0.5");
    assert_eq!(entries[0].netmask.to_string(), "255.255.255.0");
    assert_eq!(entries[0].gateway.to_string(), "10.0.0.1");

    Ok(())
}

#[tokio::test]
async fn test_full_provisioning_run() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();

    let script = dir.join("ipmi_set_ip.sh");
    std::fs::write(&script, "#!/bin/sh\nexit 0\n")?;
    std::fs::write(
        dir.join("dnsmasq.leases"),
        "00:11:22:33:44:55 AA:BB:CC:DD:EE:FF 192.168.100.42\n",
    )?;
    let mapping = dir.join("mac_to_ip.csv");
    std::fs::write(
        &mapping,
        "MAC,STATIC_IP,NETMASK,GATEWAY\n\
         aa:bb:cc:dd:ee:ff,10.0.0.5,255.255.255.0,10.0.0.1\n\
         11:22:33:44:55:66,10.0.0.6,255.255.255.0,10.0.0.1\n",
    )?;

    let config_path = write_config(dir, &script);
    let mut loader = ConfigLoader::new();
    loader.set_env_var("IPMIRAGE_IT_PASSWORD".to_string(), "pa55".to_string());
    let config = loader.load_provisioning_config(&config_path)?;

    let system = ScriptedSystem::default();
    let sleeper = CountingSleeper::default();
    let mut provisioner = Provisioner::new(&config, &system, &sleeper);
    let summary = provisioner.run(&mapping).await?;

    assert_eq!(provisioner.state(), ProvisionState::Done);
    assert_eq!(summary.total_entries, 2);
    assert_eq!(summary.succeeded_count, 1);

    // warm-up, then two retry sleeps for the MAC without a lease
    assert_eq!(
        *sleeper.sleeps.lock().unwrap(),
        vec![
            Duration::from_secs(2),
            Duration::from_secs(1),
            Duration::from_secs(1)
        ]
    );

    let rendered = std::fs::read_to_string(dir.join("dnsmasq.d/ipmirage.conf"))?;
    assert_eq!(
        rendered,
        "interface=enp3s0\ndhcp-range=192.168.100.10,192.168.100.200,255.255.255.0,12h\nlog-dhcp\n"
    );

    let calls = system.calls.lock().unwrap();
    let (program, args, env) = calls.last().unwrap();
    assert_eq!(Path::new(program), script.as_path());
    assert_eq!(args, &vec!["192.168.100.42", "10.0.0.5", "255.255.255.0", "10.0.0.1"]);
    assert!(env.contains(&("PASSWORD".to_string(), "pa55".to_string())));

    Ok(())
}
