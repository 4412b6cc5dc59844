use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    /// Каталог собранного фронтенда (index.html + wasm)
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            static_dir: default_static_dir(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct UpstreamConfig {
    /// Базовый адрес API отчёта, без /api/report
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_port() -> u16 {
    3051
}

fn default_static_dir() -> String {
    "dist".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[server]
port = 3051
static_dir = "dist"

[upstream]
base_url = "http://localhost:8009"
timeout_secs = 30
"#;

const CONFIG_FILE: &str = "config.toml";

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Current working directory
/// 3. Falls back to embedded default config
///
/// `PORT` from the environment overrides `server.port`.
pub fn load_config() -> anyhow::Result<Config> {
    let config = match find_config_file() {
        Some(config_path) => {
            tracing::info!("Loading config from: {}", config_path.display());
            let contents = std::fs::read_to_string(&config_path)?;
            parse_config(&contents)?
        }
        None => {
            tracing::info!("Using default embedded configuration");
            parse_config(DEFAULT_CONFIG)?
        }
    };

    Ok(config.with_port_override(std::env::var("PORT").ok().as_deref()))
}

fn find_config_file() -> Option<PathBuf> {
    let next_to_exe = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(CONFIG_FILE)));

    next_to_exe
        .into_iter()
        .chain(std::iter::once(PathBuf::from(CONFIG_FILE)))
        .find(|path| {
            let exists = path.exists();
            if !exists {
                tracing::debug!("config.toml not found at: {}", path.display());
            }
            exists
        })
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let config: Config = toml::from_str(contents)?;
    Ok(config)
}

impl Config {
    /// Значение PORT, если оно валидный номер порта; иначе порт из файла
    pub fn with_port_override(mut self, port: Option<&str>) -> Self {
        let Some(raw) = port.map(str::trim).filter(|p| !p.is_empty()) else {
            return self;
        };
        match raw.parse::<u16>() {
            Ok(port) => self.server.port = port,
            Err(e) => tracing::warn!("Ignoring invalid PORT {:?}: {}", raw, e),
        }
        self
    }

    /// Каталог статики. Относительный путь ищется в рабочем каталоге,
    /// затем рядом с исполняемым файлом.
    pub fn static_dir_path(&self) -> PathBuf {
        let dir = Path::new(&self.server.static_dir);
        if dir.is_absolute() || dir.exists() {
            return dir.to_path_buf();
        }

        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let resolved = exe_dir.join(dir);
                if resolved.exists() {
                    return resolved;
                }
            }
        }

        dir.to_path_buf()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config = parse_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.server.port, 3051);
        assert_eq!(config.server.static_dir, "dist");
        assert_eq!(config.upstream.base_url, "http://localhost:8009");
        assert_eq!(config.upstream.timeout_secs, 30);
    }

    #[test]
    fn test_missing_server_section_uses_defaults() {
        let config = parse_config(
            r#"
            [upstream]
            base_url = "http://reports.local"
            "#,
        )
        .unwrap();
        assert_eq!(config.server, ServerConfig::default());
        assert_eq!(config.upstream.timeout_secs, 30);
    }

    #[test]
    fn test_missing_upstream_is_an_error() {
        assert!(parse_config("[server]\nport = 8080\n").is_err());
    }

    #[test]
    fn test_port_override() {
        let port = |value: Option<&str>| {
            let config = parse_config(DEFAULT_CONFIG).unwrap();
            config.with_port_override(value).server.port
        };

        assert_eq!(port(None), 3051);
        assert_eq!(port(Some("")), 3051);
        assert_eq!(port(Some("8080")), 8080);
        assert_eq!(port(Some("http")), 3051);
    }
}
