//! Logger setup for the jobwatch binary.

use std::fs::File;
use std::path::{Path, PathBuf};

use log::{LevelFilter, SetLoggerError};
use serde::{Deserialize, Serialize};
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};
use thiserror::Error;

const LOG_FILENAME: &str = "./jobwatch.log";

#[derive(Debug, Error)]
pub enum LogSetupError {
    #[error("failed to create log file {path:?}: {source}")]
    CreateFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("logger already installed: {0}")]
    Install(#[from] SetLoggerError),
}

/// Where log lines go. Job output owns stdout, so the file is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LogDestination {
    #[default]
    File,
    Terminal,
    Both,
}

impl LogDestination {
    fn to_file(self) -> bool {
        matches!(self, Self::File | Self::Both)
    }

    fn to_terminal(self) -> bool {
        matches!(self, Self::Terminal | Self::Both)
    }
}

pub fn initialize(destination: LogDestination, level: LevelFilter) -> Result<(), LogSetupError> {
    let config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build();

    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::with_capacity(2);
    if destination.to_terminal() {
        loggers.push(TermLogger::new(
            level,
            config.clone(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ));
    }
    if destination.to_file() {
        loggers.push(file_logger(Path::new(LOG_FILENAME), level, config)?);
    }
    CombinedLogger::init(loggers)?;
    Ok(())
}

fn file_logger(
    path: &Path,
    level: LevelFilter,
    config: Config,
) -> Result<Box<WriteLogger<File>>, LogSetupError> {
    let file = File::create(path).map_err(|source| LogSetupError::CreateFile {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(WriteLogger::new(level, config, file))
}
