use resmut::core::forcefield::params::ParamLoadError;
use resmut::core::topology::bonding::BondTableError;
use resmut::core::topology::registry::{TopologyError, TopologyLoadError};
use resmut::engine::config::ConfigError;
use resmut::engine::error::EngineError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    TopologyLoad(#[from] TopologyLoadError),

    #[error(transparent)]
    ParamLoad(#[from] ParamLoadError),

    #[error(transparent)]
    BondTable(#[from] BondTableError),

    #[error("Failed to parse file '{path}': {source}", path = path.display())]
    FileParsing {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid argument: {0}")]
    Argument(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
