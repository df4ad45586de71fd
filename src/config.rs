use clap::Parser;
use config::{Config, ConfigError, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
    /// When true, the schema description sent to the LLM also carries sample
    /// rows and foreign-key edges for each table.
    pub include_sample_data: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WebConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LlmConfig {
    pub api_key: String,
    pub model: String,
    pub api_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub web: WebConfig,
    pub llm: LlmConfig,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Host to bind to
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to
    #[arg(short, long)]
    pub port: Option<u16>,
}

/// Environment variables honored as overrides, mapped onto config keys.
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("DB_HOST", "database.host"),
    ("DB_PORT", "database.port"),
    ("DB_USERNAME", "database.username"),
    ("DB_PASSWORD", "database.password"),
    ("DB_DATABASE", "database.database"),
    ("GEMINI_API_KEY", "llm.api_key"),
];

impl AppConfig {
    pub fn new(args: &CliArgs) -> Result<Self, ConfigError> {
        // Start with default configuration
        let mut config_builder = Config::builder()
            .set_default("database.host", "localhost")?
            .set_default("database.port", 3306)?
            .set_default("database.username", "root")?
            .set_default("database.password", "")?
            .set_default("database.database", "test")?
            .set_default("database.include_sample_data", false)?
            .set_default("llm.api_key", "")?
            .set_default("llm.model", "gemini-2.0-flash")?
            .set_default(
                "llm.api_url",
                "https://generativelanguage.googleapis.com/v1beta/models",
            )?
            .set_default("web.host", "127.0.0.1")?
            .set_default("web.port", 8080)?;

        // Add configuration from file if specified
        if let Some(config_path) = &args.config {
            config_builder = config_builder.add_source(File::from(config_path.as_path()));
        } else {
            // Check for config in default locations
            let default_locations = vec![
                "config.toml",
                "config/config.toml",
                "/etc/dbchat/config.toml",
            ];

            for location in default_locations {
                if Path::new(location).exists() {
                    config_builder =
                        config_builder.add_source(File::new(location, config::FileFormat::Toml));
                    break;
                }
            }
        }

        // Environment variables win over the file
        for (var, key) in ENV_OVERRIDES {
            if let Ok(value) = std::env::var(var) {
                config_builder = config_builder.set_override(*key, value)?;
            }
        }

        // Build the config
        let mut config: AppConfig = config_builder.build()?.try_deserialize()?;

        // Override with command line args if provided
        if let Some(host) = &args.host {
            config.web.host = host.clone();
        }
        if let Some(port) = args.port {
            config.web.port = port;
        }

        Ok(config)
    }
}

// Default implementation
impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                host: "localhost".to_string(),
                port: 3306,
                username: "root".to_string(),
                password: "".to_string(),
                database: "test".to_string(),
                include_sample_data: false,
            },
            web: WebConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            llm: LlmConfig {
                api_key: "".to_string(),
                model: "gemini-2.0-flash".to_string(),
                api_url: "https://generativelanguage.googleapis.com/v1beta/models".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = AppConfig::default();
        assert_eq!(config.database.host, "localhost");
        assert_eq!(config.database.port, 3306);
        assert_eq!(config.database.username, "root");
        assert_eq!(config.database.password, "");
        assert_eq!(config.database.database, "test");
        assert!(!config.database.include_sample_data);
        assert_eq!(config.llm.model, "gemini-2.0-flash");
        assert_eq!(config.web.port, 8080);
    }
}
