use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use jobwatch_engine::{Endpoints, FetchSettings, PollSettings};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use super::logging::LogDestination;

pub const ENV_JOBWATCH_CONFIG: &str = "JOBWATCH_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "./jobwatch.ron";

const DEFAULT_JOBS_URL: &str = "http://127.0.0.1:8000/jobs/";
const DEFAULT_LOGS_URL: &str = "http://127.0.0.1:8000/jobs/logs/";
const DEFAULT_STATUSES_URL: &str = "http://127.0.0.1:8000/jobs/statuses/";
const DEFAULT_POLL_INTERVAL_MS: u64 = 3000;
const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("invalid {field}: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    pub jobs_url: String,
    pub logs_url: String,
    pub statuses_url: String,
    pub poll_interval_ms: u64,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    pub log_destination: LogDestination,
    pub log_level: String,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            jobs_url: DEFAULT_JOBS_URL.to_string(),
            logs_url: DEFAULT_LOGS_URL.to_string(),
            statuses_url: DEFAULT_STATUSES_URL.to_string(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            log_destination: LogDestination::default(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl WatchConfig {
    pub fn endpoints(&self) -> Result<Endpoints, ConfigError> {
        Ok(Endpoints {
            jobs: parse_url("jobs_url", &self.jobs_url)?,
            logs: parse_url("logs_url", &self.logs_url)?,
            statuses: parse_url("statuses_url", &self.statuses_url)?,
        })
    }

    pub fn poll_settings(&self) -> Result<PollSettings, ConfigError> {
        Ok(PollSettings {
            refresh_interval: positive_millis("poll_interval_ms", self.poll_interval_ms)?,
        })
    }

    pub fn fetch_settings(&self) -> Result<FetchSettings, ConfigError> {
        Ok(FetchSettings {
            connect_timeout: positive_millis("connect_timeout_ms", self.connect_timeout_ms)?,
            request_timeout: positive_millis("request_timeout_ms", self.request_timeout_ms)?,
        })
    }

    pub fn log_level(&self) -> Result<LevelFilter, ConfigError> {
        LevelFilter::from_str(&self.log_level).map_err(|err| ConfigError::Invalid {
            field: "log_level",
            message: err.to_string(),
        })
    }
}

fn positive_millis(field: &'static str, millis: u64) -> Result<Duration, ConfigError> {
    if millis == 0 {
        return Err(ConfigError::Invalid {
            field,
            message: "must be greater than zero".to_string(),
        });
    }
    Ok(Duration::from_millis(millis))
}

fn parse_url(field: &'static str, raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|err| ConfigError::Invalid {
        field,
        message: format!("{raw:?}: {err}"),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::Invalid {
            field,
            message: format!("unsupported scheme {other:?}"),
        }),
    }
}

/// Config path: explicit argument, then `JOBWATCH_CONFIG`, then `./jobwatch.ron`.
pub fn resolve_path(arg: Option<String>, env: Option<OsString>) -> PathBuf {
    arg.map(PathBuf::from)
        .or_else(|| env.filter(|value| !value.is_empty()).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Loads the config at `path`. A missing file means all defaults.
pub fn load(path: &Path) -> Result<WatchConfig, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(WatchConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    ron::from_str(&content).map_err(|err| ConfigError::Parse {
        path: path.to_path_buf(),
        message: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let config = load(&temp.path().join("absent.ron")).unwrap();
        assert_eq!(config, WatchConfig::default());
        assert_eq!(
            config.poll_settings().unwrap().refresh_interval,
            Duration::from_secs(3)
        );
    }

    #[test]
    fn partial_file_overrides_only_given_fields() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("jobwatch.ron");
        fs::write(
            &path,
            r#"(
                jobs_url: "https://moss.example.org/jobs/",
                poll_interval_ms: 500,
                log_destination: Terminal,
            )"#,
        )
        .unwrap();

        let config = load(&path).unwrap();
        assert_eq!(config.poll_interval_ms, 500);
        assert_eq!(config.log_destination, LogDestination::Terminal);
        assert_eq!(config.logs_url, DEFAULT_LOGS_URL);
        assert_eq!(
            config.endpoints().unwrap().jobs.as_str(),
            "https://moss.example.org/jobs/"
        );
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bad.ron");
        fs::write(&path, "(poll_interval_ms: \"soon\")").unwrap();
        assert!(matches!(load(&path), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn rejects_zero_interval_and_bad_urls() {
        let config = WatchConfig {
            poll_interval_ms: 0,
            statuses_url: "ftp://host/statuses".to_string(),
            ..WatchConfig::default()
        };
        assert!(matches!(
            config.poll_settings(),
            Err(ConfigError::Invalid {
                field: "poll_interval_ms",
                ..
            })
        ));
        assert!(matches!(
            config.endpoints(),
            Err(ConfigError::Invalid {
                field: "statuses_url",
                ..
            })
        ));
    }

    #[test]
    fn rejects_zero_timeouts() {
        let config = WatchConfig {
            connect_timeout_ms: 0,
            ..WatchConfig::default()
        };
        assert!(matches!(
            config.fetch_settings(),
            Err(ConfigError::Invalid {
                field: "connect_timeout_ms",
                ..
            })
        ));

        let config = WatchConfig {
            request_timeout_ms: 0,
            ..WatchConfig::default()
        };
        assert!(matches!(
            config.fetch_settings(),
            Err(ConfigError::Invalid {
                field: "request_timeout_ms",
                ..
            })
        ));

        let settings = WatchConfig::default().fetch_settings().unwrap();
        assert_eq!(settings.connect_timeout, Duration::from_secs(10));
        assert_eq!(settings.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn log_level_is_parsed() {
        let config = WatchConfig {
            log_level: "debug".to_string(),
            ..WatchConfig::default()
        };
        assert_eq!(config.log_level().unwrap(), LevelFilter::Debug);
        let config = WatchConfig {
            log_level: "loud".to_string(),
            ..WatchConfig::default()
        };
        assert!(config.log_level().is_err());
    }

    #[test]
    fn path_resolution_order() {
        assert_eq!(
            resolve_path(Some("a.ron".into()), Some("b.ron".into())),
            PathBuf::from("a.ron")
        );
        assert_eq!(resolve_path(None, Some("b.ron".into())), PathBuf::from("b.ron"));
        assert_eq!(resolve_path(None, Some("".into())), PathBuf::from(DEFAULT_CONFIG_PATH));
        assert_eq!(resolve_path(None, None), PathBuf::from(DEFAULT_CONFIG_PATH));
    }
}
