// Configuration module entry point
// Loads configuration from file, environment and built-in defaults

mod types;

use std::net::SocketAddr;

pub use types::{Config, HttpConfig, LoggingConfig, ServerConfig};

/// Environment variable naming the configuration file (without extension)
pub const CONFIG_PATH_ENV: &str = "RAWHTTP_CONFIG";

/// Default configuration file, looked up without extension
pub const DEFAULT_CONFIG_PATH: &str = "config";

impl Config {
    /// Load configuration from the path in `RAWHTTP_CONFIG`, or `config.toml`
    pub fn load() -> Result<Self, config::ConfigError> {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(&path)
    }

    /// Load configuration from specified file path (without extension)
    ///
    /// A missing file is not an error. `RAWHTTP_*` environment variables
    /// override file values (`RAWHTTP_HTTP__SERVER_NAME` sets `http.server_name`).
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let defaults = Self::default();
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("RAWHTTP")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_default("server.host", defaults.server.host)?
            .set_default("server.port", i64::from(defaults.server.port))?
            .set_default("logging.level", defaults.logging.level)?
            .set_default("logging.access_log", defaults.logging.access_log)?
            .set_default("logging.access_log_format", defaults.logging.access_log_format)?
            .set_default("http.server_name", defaults.http.server_name)?
            .set_default("http.default_content_type", defaults.http.default_content_type)?
            .set_default("http.keep_alive", defaults.http.keep_alive)?
            .set_default("http.max_body_size", defaults.http.max_body_size)?
            .set_default("http.read_timeout", defaults.http.read_timeout)?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_without_file() {
        let config = Config::load_from("definitely/missing/rawhttp").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.http.server_name, "BOSS");
        assert_eq!(config.http.default_content_type, "text/html");
        assert!(config.http.keep_alive);
        assert_eq!(config.logging.access_log_format, "combined");
    }

    #[test]
    fn test_file_overrides() {
        let dir = std::env::temp_dir().join(format!("rawhttp-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("custom.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[http]\nserver_name = \"edge\"\nkeep_alive = false").unwrap();
        writeln!(file, "[server]\nport = 9000").unwrap();

        let stem = dir.join("custom");
        let config = Config::load_from(&stem.to_string_lossy()).unwrap();
        assert_eq!(config.http.server_name, "edge");
        assert!(!config.http.keep_alive);
        assert_eq!(config.http.max_body_size, 10_485_760);
        assert_eq!(config.server.port, 9000);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_socket_addr() {
        let config = Config::default();
        assert_eq!(
            config.get_socket_addr().unwrap(),
            "127.0.0.1:8080".parse().unwrap()
        );
    }
}
