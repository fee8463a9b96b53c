use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{domain::ChatId, errors::Error, relay::RelayStrategy, Result};

const DEFAULT_HTTP_PORT: u16 = 8000;

/// Typed configuration for the support bot.
#[derive(Clone, Debug)]
pub struct Config {
    // Telegram
    pub bot_token: String,
    pub admin_chat_id: ChatId,

    // Relay
    pub relay_strategy: RelayStrategy,
    pub catalog_file: Option<PathBuf>,

    // Liveness
    pub http_port: u16,

    // Outbound throttling
    pub throttle_global_interval: Duration,
    pub throttle_per_chat_interval: Duration,
}

impl Config {
    /// Load from the process environment, after merging `.env` if present.
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup (the environment in production).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let env_str = |key: &str| lookup(key).and_then(non_empty);

        // Required env vars
        let bot_token = env_str("BOT_TOKEN")
            .or_else(|| env_str("TELEGRAM_BOT_TOKEN"))
            .ok_or_else(|| {
                Error::Config("BOT_TOKEN environment variable is required".to_string())
            })?;

        let admin_raw = env_str("ADMIN_CHAT_ID").ok_or_else(|| {
            Error::Config("ADMIN_CHAT_ID environment variable is required".to_string())
        })?;
        let admin_chat_id = admin_raw
            .trim()
            .parse::<i64>()
            .map(ChatId)
            .map_err(|_| Error::Config(format!("ADMIN_CHAT_ID must be an integer: {admin_raw}")))?;

        let relay_strategy = match env_str("RELAY_STRATEGY") {
            Some(raw) => raw.parse::<RelayStrategy>()?,
            None => RelayStrategy::default(),
        };
        let catalog_file = env_str("CATALOG_FILE").map(PathBuf::from);

        let http_port = match env_str("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| Error::Config(format!("PORT must be a valid port number: {raw}")))?,
            None => DEFAULT_HTTP_PORT,
        };

        // Mirrors the messenger throttle defaults (~25/sec global, ~1/sec per chat).
        let throttle_global_interval =
            Duration::from_millis(parse_u64(env_str("THROTTLE_GLOBAL_MS")).unwrap_or(40));
        let throttle_per_chat_interval =
            Duration::from_millis(parse_u64(env_str("THROTTLE_PER_CHAT_MS")).unwrap_or(1050));

        Ok(Self {
            bot_token,
            admin_chat_id,
            relay_strategy,
            catalog_file,
            http_port,
            throttle_global_interval,
            throttle_per_chat_interval,
        })
    }
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for (key, val) in parse_dotenv(&contents) {
        if env::var_os(&key).is_some() {
            continue; // do not override existing env
        }
        env::set_var(key, val);
    }
}

fn parse_dotenv(contents: &str) -> Vec<(String, String)> {
    let mut out = Vec::new();
    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        out.push((key.to_string(), val));
    }
    out
}

fn parse_u64(v: Option<String>) -> Option<u64> {
    v.and_then(|s| s.trim().parse::<u64>().ok())
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}
