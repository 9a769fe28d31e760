use serde::Deserialize;
use std::{env, str::FromStr};

use chrono::TimeDelta;

use crate::services::progress::{default_session_gap, DEFAULT_SESSION_GAP_SECONDS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Plain,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "plain" | "text" | "pretty" => Ok(LogFormat::Plain),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub mongo_uri: String,
    pub mongo_database: String,
    pub bind_addr: String,
    /// Largest pause between two quiz attempts that still counts as one session.
    pub session_gap_seconds: i64,
    pub otlp_endpoint: Option<String>,
    pub log_format: LogFormat,
    /// `user:password` expected on `/metrics`.
    pub metrics_auth: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mongo_uri: "mongodb://localhost:27017".to_string(),
            mongo_database: "storybook".to_string(),
            bind_addr: "0.0.0.0:8081".to_string(),
            session_gap_seconds: DEFAULT_SESSION_GAP_SECONDS,
            otlp_endpoint: None,
            log_format: LogFormat::Plain,
            metrics_auth: "admin:changeme".to_string(),
        }
    }
}

impl Config {
    /// Session gap as a duration. Values that slipped past validation fall
    /// back to the default.
    pub fn session_gap(&self) -> TimeDelta {
        if self.session_gap_seconds < 0 {
            return default_session_gap();
        }
        TimeDelta::try_seconds(self.session_gap_seconds).unwrap_or_else(default_session_gap)
    }

    pub fn load() -> Result<Self, config::ConfigError> {
        // Root .env first, then the crate-local one
        if dotenvy::from_path("../../.env").is_err() {
            dotenvy::dotenv().ok();
        }

        let env = env::var("APP_ENV").unwrap_or_else(|_| "dev".to_string());

        // config/{env}.toml, overridden by APP__SECTION__KEY variables
        let settings = config::Config::builder()
            .add_source(config::File::with_name(&format!("config/{}", env)).required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        Self::from_settings(&settings)
    }

    /// Resolves every key from the layered settings, then the legacy plain
    /// environment variable, then the default.
    pub fn from_settings(settings: &config::Config) -> Result<Self, config::ConfigError> {
        let defaults = Config::default();

        let mongo_uri = setting_or_env(settings, "database.mongo_uri", "MONGO_URI")
            .unwrap_or(defaults.mongo_uri);
        let mongo_database = setting_or_env(settings, "database.mongo_database", "MONGO_DATABASE")
            .unwrap_or(defaults.mongo_database);
        let bind_addr =
            setting_or_env(settings, "server.bind_addr", "BIND_ADDR").unwrap_or(defaults.bind_addr);

        let session_gap_seconds = match setting_or_env(
            settings,
            "progress.session_gap_seconds",
            "SESSION_GAP_SECONDS",
        ) {
            Some(raw) => raw.trim().parse::<i64>().map_err(|_| {
                config::ConfigError::Message(format!(
                    "progress.session_gap_seconds must be an integer, got '{}'",
                    raw
                ))
            })?,
            None => defaults.session_gap_seconds,
        };
        if session_gap_seconds < 0 {
            return Err(config::ConfigError::Message(
                "progress.session_gap_seconds cannot be negative".to_string(),
            ));
        }
        if TimeDelta::try_seconds(session_gap_seconds).is_none() {
            return Err(config::ConfigError::Message(format!(
                "progress.session_gap_seconds is out of range: {}",
                session_gap_seconds
            )));
        }

        let otlp_endpoint = setting_or_env(
            settings,
            "telemetry.otlp_endpoint",
            "OTEL_EXPORTER_OTLP_ENDPOINT",
        );

        let log_format = match setting_or_env(settings, "telemetry.log_format", "LOG_FORMAT") {
            Some(raw) => raw.parse().map_err(config::ConfigError::Message)?,
            None => defaults.log_format,
        };

        let metrics_auth = setting_or_env(settings, "metrics.auth", "METRICS_AUTH")
            .unwrap_or(defaults.metrics_auth);

        Ok(Config {
            mongo_uri,
            mongo_database,
            bind_addr,
            session_gap_seconds,
            otlp_endpoint,
            log_format,
            metrics_auth,
        })
    }
}

fn setting_or_env(settings: &config::Config, key: &str, env_key: &str) -> Option<String> {
    settings
        .get_string(key)
        .ok()
        .or_else(|| env::var(env_key).ok())
        .filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn settings(overrides: &[(&str, &str)]) -> config::Config {
        let mut builder = config::Config::builder();
        for (key, value) in overrides {
            builder = builder.set_override(*key, *value).unwrap();
        }
        builder.build().unwrap()
    }

    fn clear_env() {
        for key in [
            "MONGO_URI",
            "MONGO_DATABASE",
            "BIND_ADDR",
            "SESSION_GAP_SECONDS",
            "OTEL_EXPORTER_OTLP_ENDPOINT",
            "LOG_FORMAT",
            "METRICS_AUTH",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn defaults_apply_when_nothing_is_set() {
        clear_env();
        let config = Config::from_settings(&settings(&[])).unwrap();
        assert_eq!(config.session_gap_seconds, 120);
        assert_eq!(config.mongo_database, "storybook");
        assert_eq!(config.log_format, LogFormat::Plain);
        assert!(config.otlp_endpoint.is_none());
    }

    #[test]
    #[serial]
    fn layered_settings_win_over_env() {
        clear_env();
        env::set_var("SESSION_GAP_SECONDS", "300");
        let config = Config::from_settings(&settings(&[
            ("progress.session_gap_seconds", "90"),
            ("telemetry.log_format", "json"),
        ]))
        .unwrap();
        env::remove_var("SESSION_GAP_SECONDS");

        assert_eq!(config.session_gap_seconds, 90);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    #[serial]
    fn env_fallback_is_used() {
        clear_env();
        env::set_var("MONGO_URI", "mongodb://db:27017");
        env::set_var("SESSION_GAP_SECONDS", "45");
        let config = Config::from_settings(&settings(&[])).unwrap();
        clear_env();

        assert_eq!(config.mongo_uri, "mongodb://db:27017");
        assert_eq!(config.session_gap_seconds, 45);
    }

    #[test]
    #[serial]
    fn rejects_bad_gap_and_format() {
        clear_env();
        assert!(Config::from_settings(&settings(&[("progress.session_gap_seconds", "-5")])).is_err());
        assert!(Config::from_settings(&settings(&[("progress.session_gap_seconds", "soon")])).is_err());
        assert!(Config::from_settings(&settings(&[("telemetry.log_format", "xml")])).is_err());
    }

    #[test]
    #[serial]
    fn rejects_gap_beyond_duration_range() {
        clear_env();
        let result = Config::from_settings(&settings(&[(
            "progress.session_gap_seconds",
            "9223372036854775807",
        )]));
        assert!(result.is_err());
    }

    #[test]
    fn session_gap_never_panics_on_unvalidated_values() {
        let config = Config {
            session_gap_seconds: i64::MAX,
            ..Config::default()
        };
        assert_eq!(config.session_gap(), default_session_gap());

        let config = Config {
            session_gap_seconds: 90,
            ..Config::default()
        };
        assert_eq!(config.session_gap(), TimeDelta::seconds(90));
    }
}
