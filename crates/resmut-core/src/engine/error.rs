use thiserror::Error;

use super::config::{ConfigError, ResidueSpecifier};
use crate::core::models::residue::ResidueState;
use crate::core::topology::registry::TopologyError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Initialization failed: {0}")]
    Initialization(String),

    #[error("Residue not found in system: {spec}")]
    ResidueNotFound { spec: ResidueSpecifier },

    #[error("Residue {spec} is in state '{state}' and cannot be mutated")]
    InvalidResidueState {
        spec: ResidueSpecifier,
        state: ResidueState,
    },

    #[error("Residue '{residue_name}' has no valid '{atom_name}' atom to align on")]
    MissingAnchorAtom {
        residue_name: String,
        atom_name: &'static str,
    },

    #[error("Dihedral atom '{atom_name}' is missing from residue '{residue_name}'")]
    MissingDihedralAtom {
        residue_name: String,
        atom_name: String,
    },

    #[error("Dihedral group {group:?} of residue '{residue_name}' would move its own axis")]
    MalformedDihedralGroup {
        residue_name: String,
        group: [String; 4],
    },

    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),

    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Operation was cancelled")]
    Cancelled,

    #[error("Internal logic error: {0}")]
    Internal(String),
}
