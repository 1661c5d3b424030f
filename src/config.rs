use std::time::Duration;

use serde::Deserialize;

use crate::collector::CollectOptions;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub sampling: SamplingConfig,
    #[serde(default)]
    pub wireguard: WireguardConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SamplingConfig {
    /// Wall-clock interval between the two counter snapshots of each rate
    /// sample. Longer windows smooth the rates but delay every response.
    #[serde(default = "default_window_ms")]
    pub window_ms: u64,
    /// Report swap percentages alongside RAM. Off by default; hosts without
    /// swap would otherwise report meaningless figures.
    #[serde(default)]
    pub include_swap: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireguardConfig {
    #[serde(default = "default_interface")]
    pub interface: String,
    /// Overrides the whole dump invocation. Empty means
    /// `wg show <interface> dump`.
    #[serde(default)]
    pub command: Vec<String>,
    #[serde(default = "default_command_timeout_secs")]
    pub command_timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5665
}

fn default_window_ms() -> u64 {
    1000
}

fn default_interface() -> String {
    "wg0".to_string()
}

fn default_command_timeout_secs() -> u64 {
    5
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            window_ms: default_window_ms(),
            include_swap: false,
        }
    }
}

impl Default for WireguardConfig {
    fn default() -> Self {
        Self {
            interface: default_interface(),
            command: Vec::new(),
            command_timeout_secs: default_command_timeout_secs(),
        }
    }
}

impl AppConfig {
    /// Loads CONFIG_FILE (default config.toml). A missing file is not an
    /// error; the agent runs on defaults so a bare install works.
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        match std::fs::read_to_string(&path) {
            Ok(s) => Self::load_from_str(&s),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(config_file = %path, "no config file, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(anyhow::Error::new(e).context(format!("reading {path}"))),
        }
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(
            (1..=60_000).contains(&self.sampling.window_ms),
            "sampling.window_ms must be between 1 and 60000, got {}",
            self.sampling.window_ms
        );
        anyhow::ensure!(
            (1..=120).contains(&self.wireguard.command_timeout_secs),
            "wireguard.command_timeout_secs must be between 1 and 120, got {}",
            self.wireguard.command_timeout_secs
        );
        anyhow::ensure!(
            !self.wireguard.command.is_empty() || !self.wireguard.interface.is_empty(),
            "wireguard.interface must be non-empty when wireguard.command is not set"
        );
        Ok(())
    }

    pub fn collect_options(&self) -> CollectOptions {
        CollectOptions {
            window: Duration::from_millis(self.sampling.window_ms),
            include_swap: self.sampling.include_swap,
        }
    }

    /// The dump invocation: the configured override, or wg show on the
    /// configured interface.
    pub fn dump_command(&self) -> Vec<String> {
        if self.wireguard.command.is_empty() {
            vec![
                "wg".to_string(),
                "show".to_string(),
                self.wireguard.interface.clone(),
                "dump".to_string(),
            ]
        } else {
            self.wireguard.command.clone()
        }
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.wireguard.command_timeout_secs)
    }
}
