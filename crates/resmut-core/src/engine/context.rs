use super::config::ResidueSpecifier;
use super::error::EngineError;
use crate::core::forcefield::params::Forcefield;
use crate::core::models::ids::ResidueId;
use crate::core::models::system::MolecularSystem;
use crate::core::topology::bonding::{BondClassifier, BondDistanceTable};
use crate::core::topology::registry::TopologyRegistry;

/// The shared tables a scan reads: topology, bond classifier and optionally an explicit
/// parameter table that takes precedence over the system's own.
#[derive(Clone, Copy)]
pub struct ScanContext<'a> {
    pub topology: &'a TopologyRegistry,
    pub classifier: &'a dyn BondClassifier,
    pub forcefield: Option<&'a Forcefield>,
}

impl<'a> ScanContext<'a> {
    pub fn new(topology: &'a TopologyRegistry, classifier: &'a dyn BondClassifier) -> Self {
        Self {
            topology,
            classifier,
            forcefield: None,
        }
    }

    pub fn with_forcefield(mut self, forcefield: &'a Forcefield) -> Self {
        self.forcefield = Some(forcefield);
        self
    }

    /// Built-in topology and bond tables, parameters from the system or the built-in set.
    pub fn builtin() -> ScanContext<'static> {
        ScanContext::new(TopologyRegistry::builtin(), BondDistanceTable::builtin())
    }

    /// The explicit table, else the system's, else [`Forcefield::builtin`].
    pub fn resolve_forcefield<'s>(
        &'s self,
        system: &'s MolecularSystem,
    ) -> Result<&'s Forcefield, EngineError> {
        let forcefield = self
            .forcefield
            .or_else(|| system.forcefield())
            .unwrap_or_else(|| Forcefield::builtin());
        if forcefield.is_empty() {
            return Err(EngineError::Initialization(
                "the resolved non-bonded parameter table is empty".to_string(),
            ));
        }
        Ok(forcefield)
    }
}

pub fn resolve_residue(
    system: &MolecularSystem,
    spec: &ResidueSpecifier,
) -> Result<ResidueId, EngineError> {
    system
        .find_chain_by_id(spec.chain_id)
        .and_then(|chain_id| system.find_residue_by_id(chain_id, spec.residue_number))
        .ok_or(EngineError::ResidueNotFound { spec: *spec })
}

/// Residues other than `residue_id` whose centroid lies within `radius` of its centroid.
pub fn context_residues(
    system: &MolecularSystem,
    residue_id: ResidueId,
    radius: f64,
) -> Result<Vec<ResidueId>, EngineError> {
    let centroid = system.residue_centroid(residue_id).ok_or_else(|| {
        EngineError::Internal(format!("residue {residue_id:?} has no atoms to centre on"))
    })?;
    Ok(system
        .residues_within(&centroid, radius)
        .into_iter()
        .filter(|&id| id != residue_id)
        .collect())
}
