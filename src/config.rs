use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_PORT: u16 = 4000;
const DEFAULT_DATABASE: &str = "db.json";

#[derive(Parser, Debug)]
#[command(name = "shelf")]
#[command(about = "Serves the books collection over HTTP", long_about = None)]
pub struct Cli {
    #[arg(short = 'c', long = "config")]
    pub config_path: Option<String>,

    /// Overrides `app.port` from the config file
    #[arg(short = 'p', long = "port", env = "PORT")]
    pub port: Option<u16>,

    /// Keep books in memory only; nothing is written to disk
    #[arg(long = "in-memory")]
    pub in_memory: bool,
}

pub fn default_config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".shelf")
}

pub fn default_config_path() -> PathBuf {
    default_config_dir().join("config.yaml")
}

#[derive(Debug, Deserialize, Clone)]
pub struct App {
    #[serde(default = "default_port")]
    port: u16,
    #[serde(default = "default_database")]
    database: String,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_database() -> String {
    DEFAULT_DATABASE.to_string()
}

impl Default for App {
    fn default() -> Self {
        App {
            port: default_port(),
            database: default_database(),
        }
    }
}

impl App {
    pub fn get_port(&self) -> u16 {
        self.port
    }

    pub fn get_db(&self) -> &str {
        &self.database
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub app: App,
    /// Directory the config was read from; relative database paths hang off it.
    #[serde(skip)]
    pub base_dir: PathBuf,
}

impl Config {
    pub fn new(path: &str) -> Result<Self> {
        let mut cfg = Config::load_config(path)?;
        cfg.base_dir = Path::new(path)
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Ok(cfg)
    }

    /// An explicit path must exist. Without one, the default location is
    /// tried and plain defaults are used if nothing is there.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let mut cfg = match &cli.config_path {
            Some(path) => Config::new(path).with_context(|| format!("failed to load config {}", path))?,
            None => {
                let path = default_config_path();
                if path.exists() {
                    Config::new(&path.to_string_lossy())?
                } else {
                    tracing::info!(path = ?path, "no config file, using defaults");
                    Config {
                        app: App::default(),
                        base_dir: default_config_dir(),
                    }
                }
            }
        };

        if let Some(port) = cli.port {
            cfg.app.port = port;
        }
        Ok(cfg)
    }

    pub fn database_path(&self) -> PathBuf {
        let db = Path::new(self.app.get_db());
        if db.is_absolute() {
            db.to_path_buf()
        } else {
            self.base_dir.join(db)
        }
    }

    fn load_config(path: &str) -> Result<Config> {
        let yaml_str = fs::read_to_string(path)?;
        let yaml_with_env = Config::substitute_env_vars(&yaml_str)?;
        let config: Option<Config> = serde_yaml::from_str(&yaml_with_env)?;
        Ok(config.unwrap_or_default())
    }

    fn substitute_env_vars(yaml_str: &str) -> Result<String> {
        let mut result = yaml_str.to_string();
        let mut offset = 0;

        while let Some(start) = result[offset..].find("${") {
            let actual_start = offset + start;
            if let Some(end) = result[actual_start..].find('}') {
                let var_name = &result[actual_start + 2..actual_start + end];

                // ${VAR:-default}
                let env_value = if let Some(default_start) = var_name.find(":-") {
                    let actual_var = &var_name[..default_start];
                    let default_val = &var_name[default_start + 2..];
                    env::var(actual_var).unwrap_or_else(|_| default_val.to_string())
                } else {
                    env::var(var_name).unwrap_or_else(|_| {
                        tracing::warn!("environment variable '{}' not found", var_name);
                        String::new()
                    })
                };

                result.replace_range(actual_start..actual_start + end + 1, &env_value);
                offset = actual_start + env_value.len();
            } else {
                break;
            }
        }

        Ok(result)
    }
}
