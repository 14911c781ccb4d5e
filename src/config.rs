use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub backend_url: String,
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,
    #[serde(default)]
    pub poll: PollConfig,
    #[serde(default)]
    pub actions: ActionsConfig,
    #[serde(default)]
    pub notifications: NotificationsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PollConfig {
    #[serde(default = "default_poll_interval_secs")]
    pub pod_health_interval_secs: u64,
    #[serde(default = "default_poll_interval_secs")]
    pub dashboard_interval_secs: u64,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            pod_health_interval_secs: default_poll_interval_secs(),
            dashboard_interval_secs: default_poll_interval_secs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActionsConfig {
    /// Delay before the second post-action poll.
    #[serde(default = "default_repoll_delay_ms")]
    pub repoll_delay_ms: u64,
}

impl Default for ActionsConfig {
    fn default() -> Self {
        Self {
            repoll_delay_ms: default_repoll_delay_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default = "default_dismiss_after_ms")]
    pub dismiss_after_ms: u64,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            dismiss_after_ms: default_dismiss_after_ms(),
        }
    }
}

fn default_listen_port() -> u16 {
    8790
}

fn default_poll_interval_secs() -> u64 {
    10
}

fn default_repoll_delay_ms() -> u64 {
    3000
}

fn default_dismiss_after_ms() -> u64 {
    5000
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| format!("reading config {}: {}", path.display(), e))?;
        Self::load_from_str(&data)
    }

    pub fn load_from_str(data: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let mut cfg: Config =
            serde_yaml::from_str(data).map_err(|e| format!("parsing config: {}", e))?;

        cfg.backend_url = cfg.backend_url.trim_end_matches('/').to_string();
        if cfg.backend_url.is_empty() {
            return Err("backend_url must be configured".into());
        }
        if cfg.poll.pod_health_interval_secs == 0 || cfg.poll.dashboard_interval_secs == 0 {
            return Err("poll intervals must be at least 1 second".into());
        }

        Ok(cfg)
    }

    pub fn listen_addr(&self) -> String {
        format!("0.0.0.0:{}", self.listen_port)
    }
}
