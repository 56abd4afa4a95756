use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use flashdeck_algo::EngineConfig;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
    /// Rolling log file directory; `None` keeps logging on stdout only
    pub log_dir: Option<PathBuf>,
    pub database_path: PathBuf,
    pub words_path: PathBuf,
    pub sentences_path: PathBuf,
    pub engine: EngineConfig,
}

impl Config {
    pub fn from_env() -> Self {
        let port = env_parse("PORT").unwrap_or(3000);

        let host = env_parse::<IpAddr>("HOST").unwrap_or(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)));

        let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let log_dir = env_flag("ENABLE_FILE_LOGS")
            .then(|| env_path("LOG_DIR").unwrap_or_else(|| PathBuf::from("./logs")));

        let database_path = env_path("DATABASE_PATH").unwrap_or_else(default_database_path);
        let words_path = env_path("WORDS_PATH").unwrap_or_else(|| PathBuf::from("data/words.json"));
        let sentences_path =
            env_path("SENTENCES_PATH").unwrap_or_else(|| PathBuf::from("data/sentences.json"));

        let defaults = EngineConfig::default();
        let engine = EngineConfig {
            required_per_direction: env_parse("FLASHDECK_REQUIRED_PER_DIRECTION")
                .unwrap_or(defaults.required_per_direction),
            active_deck_size: env_parse("FLASHDECK_ACTIVE_DECK_SIZE")
                .unwrap_or(defaults.active_deck_size),
            lock_milestone: env_parse("FLASHDECK_LOCK_MILESTONE")
                .unwrap_or(defaults.lock_milestone),
            unlock_streak_required: env_parse("FLASHDECK_UNLOCK_STREAK_REQUIRED")
                .unwrap_or(defaults.unlock_streak_required),
        }
        .sanitized();

        Self {
            host,
            port,
            log_level,
            log_dir,
            database_path,
            words_path,
            sentences_path,
            engine,
        }
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

pub fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("com.flashdeck.app")
        .join("data.db")
}

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key)
        .ok()
        .and_then(|value| value.trim().parse::<T>().ok())
}

fn env_flag(key: &str) -> bool {
    std::env::var(key)
        .map(|v| v == "true" || v == "1")
        .unwrap_or(false)
}

fn env_path(key: &str) -> Option<PathBuf> {
    std::env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
}
