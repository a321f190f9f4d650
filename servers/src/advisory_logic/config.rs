use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Deserialize, Serialize, Debug, Clone, Default)]
#[clap(about = "Advisory terminal backend server", version)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[clap(long, env = "ADVISORY_PORT", help = "Port to listen on for client connections.")]
    pub port: Option<u16>,

    #[clap(long, env = "ADVISORY_CONFIG_PATH", help = "Path to the JSON configuration file.")]
    pub config_path: Option<PathBuf>,

    #[clap(long, env = "ADVISORY_LOG_DIR", help = "Directory for log files.")]
    pub log_dir: Option<PathBuf>,

    #[clap(long, env = "ADVISORY_LOG_LEVEL", help = "Logging level (debug, info, warn, error).")]
    pub log_level: Option<String>,

    #[clap(long, env = "GEMINI_API_KEY", help = "API key for the Gemini collaborator. Fetches short-circuit without it.")]
    pub gemini_api_key: Option<String>,

    #[clap(long, env = "ADVISORY_COOLDOWN_SECONDS", help = "Cooldown window after a rate-limit signal, in seconds.")]
    pub cooldown_seconds: Option<u64>,

    #[clap(long, env = "ADVISORY_REDIS_URL", help = "Redis URL for store write-through persistence. In-memory only when absent.")]
    pub redis_url: Option<String>,

    #[clap(long, env = "ADVISORY_TRACKED_INDICES", value_delimiter = ',', help = "Comma-separated tracked index names.")]
    pub tracked_indices: Option<Vec<String>>,

    #[clap(long, env = "ADVISORY_ALERTS_ENABLED", help = "Grant permission for local new-signal notifications.")]
    pub alerts_enabled: Option<bool>,

    #[clap(long, env = "ADVISORY_STALE_AFTER_SECONDS", help = "Snapshot age during market hours before the monitor warns.")]
    pub stale_after_seconds: Option<u64>,

    #[clap(long, env = "ADVISORY_STALE_CHECK_INTERVAL_SECONDS", help = "Interval in seconds between staleness checks.")]
    pub stale_check_interval_seconds: Option<u64>,

    #[clap(long, env = "TLS_CERT_PATH", help = "Path to the TLS certificate file.")]
    pub tls_cert_path: Option<PathBuf>,

    #[clap(long, env = "TLS_KEY_PATH", help = "Path to the TLS private key file.")]
    pub tls_key_path: Option<PathBuf>,
}

impl Config {
    // Merge two Config structs, where 'other' overrides 'self' for Some values
    fn merge(self, other: Config) -> Config {
        Config {
            port: other.port.or(self.port),
            config_path: other.config_path.or(self.config_path),
            log_dir: other.log_dir.or(self.log_dir),
            log_level: other.log_level.or(self.log_level),
            gemini_api_key: other.gemini_api_key.or(self.gemini_api_key),
            cooldown_seconds: other.cooldown_seconds.or(self.cooldown_seconds),
            redis_url: other.redis_url.or(self.redis_url),
            tracked_indices: other.tracked_indices.or(self.tracked_indices),
            alerts_enabled: other.alerts_enabled.or(self.alerts_enabled),
            stale_after_seconds: other.stale_after_seconds.or(self.stale_after_seconds),
            stale_check_interval_seconds: other
                .stale_check_interval_seconds
                .or(self.stale_check_interval_seconds),
            tls_cert_path: other.tls_cert_path.or(self.tls_cert_path),
            tls_key_path: other.tls_key_path.or(self.tls_key_path),
        }
    }
}

pub fn load_config() -> Config {
    // 1. Load defaults
    let default_config = Config {
        port: Some(9010),
        log_dir: Some(PathBuf::from("./logs")),
        log_level: Some("info".to_string()),
        cooldown_seconds: Some(60),
        tracked_indices: Some(vec![
            "NIFTY 50".to_string(),
            "SENSEX".to_string(),
            "BANK NIFTY".to_string(),
            "NIFTY IT".to_string(),
        ]),
        alerts_enabled: Some(true),
        stale_after_seconds: Some(900),
        stale_check_interval_seconds: Some(60),
        ..Default::default()
    };

    // 2. Load from config file (server_advisory.conf) if present.
    //    Allow overriding default config file path with CLI arg.
    let cli_args_for_path = Config::parse();

    let config_file_path = cli_args_for_path
        .config_path
        .clone()
        .unwrap_or_else(|| PathBuf::from("server_advisory.conf"));

    let mut current_config = default_config;

    if config_file_path.exists() {
        if let Ok(config_str) = fs::read_to_string(&config_file_path) {
            if let Ok(file_config) = serde_json::from_str::<Config>(&config_str) {
                current_config = current_config.merge(file_config);
            } else {
                log::warn!(
                    "Failed to parse config file: {}. Falling back to other sources.",
                    config_file_path.display()
                );
            }
        } else {
            log::warn!(
                "Failed to read config file: {}. Falling back to other sources.",
                config_file_path.display()
            );
        }
    } else {
        log::info!(
            "Config file not found at {}. Using defaults and environment/CLI variables.",
            config_file_path.display()
        );
    }

    // 3. Override with environment variables and CLI arguments.
    //    clap::Parser handles env vars and CLI args; merge them over the
    //    file config.
    let cli_args_final = Config::parse();
    current_config = current_config.merge(cli_args_final);

    // 4. Apply default TLS paths if not already set
    if current_config.tls_cert_path.is_none() || current_config.tls_key_path.is_none() {
        if let Some(home_dir) = dirs::home_dir() {
            let letsencrypt_dir = home_dir.join(".letsencrypt");
            if current_config.tls_cert_path.is_none() {
                current_config.tls_cert_path = Some(letsencrypt_dir.join("fullchain.pem"));
            }
            if current_config.tls_key_path.is_none() {
                current_config.tls_key_path = Some(letsencrypt_dir.join("privkey.pem"));
            }
        } else {
            log::warn!("Could not determine home directory for default TLS paths.");
        }
    }

    current_config
}
