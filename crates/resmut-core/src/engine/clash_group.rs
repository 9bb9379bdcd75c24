use super::error::EngineError;
use crate::core::forcefield::params::{Forcefield, ParamSource};
use crate::core::models::atom::{Atom, Element};
use crate::core::models::ids::{AtomId, ResidueId};
use crate::core::models::system::MolecularSystem;
use crate::core::utils::identifiers::side_chain_rank;
use nalgebra::Point3;
use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use tracing::{debug, warn};

static WARNED_MISSING_TYPES: Lazy<Mutex<HashSet<String>>> =
    Lazy::new(|| Mutex::new(HashSet::new()));

fn warn_missing_type_once(force_field_type: &str, element: Element) {
    let Ok(mut warned) = WARNED_MISSING_TYPES.lock() else {
        return;
    };
    if warned.insert(force_field_type.to_string()) {
        warn!(
            "No van der Waals parameters for type '{}' or element '{}'; using the default pair.",
            force_field_type, element
        );
    }
}

/// Scoring snapshot of one atom.
#[derive(Debug, Clone, PartialEq)]
pub struct ClashGroupAtom {
    pub name: String,
    pub element: Element,
    pub position: Point3<f64>,
    pub charge: f64,
    /// In kcal/mol.
    pub well_depth: f64,
    /// Like-pair equilibrium distance in Angstroms.
    pub radius: f64,
    /// Rank along the side chain: 0 backbone, 1 alpha, 2 beta and so on.
    pub group_id: u8,
}

impl ClashGroupAtom {
    pub fn from_atom(atom: &Atom, forcefield: &Forcefield) -> Self {
        let resolved = forcefield.resolve_vdw(&atom.force_field_type, atom.element);
        match resolved.source {
            ParamSource::Type => {}
            ParamSource::Element => debug!(
                "Atom '{}' of type '{}' uses element parameters for '{}'.",
                atom.name, atom.force_field_type, atom.element
            ),
            ParamSource::Default => warn_missing_type_once(&atom.force_field_type, atom.element),
        }
        Self {
            name: atom.name.clone(),
            element: atom.element,
            position: atom.position,
            charge: atom.partial_charge,
            well_depth: resolved.param.well_depth,
            radius: resolved.param.radius,
            group_id: side_chain_rank(&atom.name),
        }
    }

    pub fn is_hydrogen(&self) -> bool {
        self.element.is_hydrogen()
    }

    /// Whether the atom rotates when everything up to `boundary` is frozen.
    ///
    /// Hydrogens ride on the heavy atom one rank below them, so they move from
    /// `boundary` itself while heavy atoms only move beyond it.
    #[inline]
    pub fn is_mobile(&self, boundary: u8) -> bool {
        if self.is_hydrogen() {
            self.group_id >= boundary
        } else {
            self.group_id > boundary
        }
    }
}

/// The residue being mutated, as flat arrays indexed by atom.
#[derive(Debug, Clone)]
pub struct SingleClashGroup {
    atoms: Vec<ClashGroupAtom>,
    positions: Vec<Point3<f64>>,
    atom_ids: Vec<AtomId>,
    name_index: HashMap<String, usize>,
    // masks[b] is the rotation mask at freeze boundary b; the last one is all false.
    masks: Vec<Vec<bool>>,
}

impl SingleClashGroup {
    pub fn new(
        system: &MolecularSystem,
        residue_id: ResidueId,
        forcefield: &Forcefield,
    ) -> Result<Self, EngineError> {
        let residue = system.residue(residue_id).ok_or_else(|| {
            EngineError::Internal(format!("residue {residue_id:?} vanished before scanning"))
        })?;

        let mut atoms = Vec::with_capacity(residue.atoms().len());
        let mut atom_ids = Vec::with_capacity(residue.atoms().len());
        for &atom_id in residue.atoms() {
            let atom = system.atom(atom_id).ok_or_else(|| {
                EngineError::Internal(format!("residue '{}' lists a dead atom", residue.name))
            })?;
            atoms.push(ClashGroupAtom::from_atom(atom, forcefield));
            atom_ids.push(atom_id);
        }

        let name_index = atoms
            .iter()
            .enumerate()
            .map(|(i, atom)| (atom.name.clone(), i))
            .collect();
        let max_rank = atoms.iter().map(|a| a.group_id).max().unwrap_or(0);
        let masks = (0..=max_rank.saturating_add(1))
            .map(|boundary| atoms.iter().map(|a| a.is_mobile(boundary)).collect())
            .collect();
        let positions = atoms.iter().map(|a| a.position).collect();

        Ok(Self {
            atoms,
            positions,
            atom_ids,
            name_index,
            masks,
        })
    }

    pub fn atoms(&self) -> &[ClashGroupAtom] {
        &self.atoms
    }

    /// The positions captured at construction.
    pub fn positions(&self) -> &[Point3<f64>] {
        &self.positions
    }

    pub fn atom_ids(&self) -> &[AtomId] {
        &self.atom_ids
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.name_index.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// Rotation mask at freeze `boundary`, parallel to [`Self::atoms`].
    pub fn mask(&self, boundary: u8) -> &[bool] {
        let last = self.masks.len() - 1;
        &self.masks[usize::from(boundary).min(last)]
    }
}

/// The static surroundings of a scan. Never rotates.
#[derive(Debug, Clone, Default)]
pub struct MultiClashGroup {
    atoms: Vec<ClashGroupAtom>,
}

impl MultiClashGroup {
    pub fn new(
        system: &MolecularSystem,
        residue_ids: &[ResidueId],
        forcefield: &Forcefield,
    ) -> Self {
        let atoms = residue_ids
            .iter()
            .filter_map(|&id| system.residue(id))
            .flat_map(|residue| residue.atoms().iter())
            .filter_map(|&atom_id| system.atom(atom_id))
            .map(|atom| ClashGroupAtom::from_atom(atom, forcefield))
            .collect();
        Self { atoms }
    }

    pub fn atoms(&self) -> &[ClashGroupAtom] {
        &self.atoms
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }
}
