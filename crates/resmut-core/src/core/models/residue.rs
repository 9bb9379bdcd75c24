use super::ids::{AtomId, ChainId};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Role of a residue within its chain.
///
/// Only `Standard`, `NTerminal` and `CTerminal` residues are eligible for mutation; the
/// remaining states describe residues the mutation engine leaves alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResidueState {
    #[default]
    Unknown,
    Standard,
    NonStandard,
    NTerminal,
    CTerminal,
    Hetero,
    Water,
    Cap,
    Ion,
}

impl ResidueState {
    pub fn is_mutable(&self) -> bool {
        matches!(
            self,
            ResidueState::Standard | ResidueState::NTerminal | ResidueState::CTerminal
        )
    }
}

#[derive(Debug, Error)]
#[error("Invalid residue state string")]
pub struct ParseResidueStateError;

impl FromStr for ResidueState {
    type Err = ParseResidueStateError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "unknown" => Ok(Self::Unknown),
            "standard" => Ok(Self::Standard),
            "non-standard" | "nonstandard" => Ok(Self::NonStandard),
            "n-terminal" | "nterminal" => Ok(Self::NTerminal),
            "c-terminal" | "cterminal" => Ok(Self::CTerminal),
            "hetero" => Ok(Self::Hetero),
            "water" => Ok(Self::Water),
            "cap" => Ok(Self::Cap),
            "ion" => Ok(Self::Ion),
            _ => Err(ParseResidueStateError),
        }
    }
}

impl fmt::Display for ResidueState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Unknown => "unknown",
                Self::Standard => "standard",
                Self::NonStandard => "non-standard",
                Self::NTerminal => "n-terminal",
                Self::CTerminal => "c-terminal",
                Self::Hetero => "hetero",
                Self::Water => "water",
                Self::Cap => "cap",
                Self::Ion => "ion",
            }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Residue {
    pub residue_number: isize,     // Residue sequence number from source file
    pub name: String,              // Name of the residue (e.g., "ALA", "GLY")
    pub chain_id: ChainId,         // ID of the parent chain
    pub state: ResidueState,       // Position/role of the residue in its chain
    pub protonated: bool,          // Whether explicit hydrogens are present
    pub(crate) atoms: Vec<AtomId>, // Atoms belonging to this residue, in insertion order
    atom_name_map: HashMap<String, AtomId>,
}

impl Residue {
    pub(crate) fn new(
        residue_number: isize,
        name: &str,
        state: ResidueState,
        chain_id: ChainId,
    ) -> Self {
        Self {
            residue_number,
            name: name.to_string(),
            chain_id,
            state,
            protonated: true,
            atoms: Vec::new(),
            atom_name_map: HashMap::new(),
        }
    }

    pub(crate) fn add_atom(&mut self, atom_name: &str, atom_id: AtomId) {
        self.atoms.push(atom_id);
        self.atom_name_map.insert(atom_name.to_string(), atom_id);
    }

    pub(crate) fn remove_atom(&mut self, atom_name: &str, atom_id: AtomId) {
        self.atoms.retain(|&id| id != atom_id);
        if self.atom_name_map.get(atom_name) == Some(&atom_id) {
            self.atom_name_map.remove(atom_name);
        }
    }

    pub fn atoms(&self) -> &[AtomId] {
        &self.atoms
    }

    pub fn get_atom_id_by_name(&self, name: &str) -> Option<AtomId> {
        self.atom_name_map.get(name).copied()
    }

    pub fn has_atom(&self, name: &str) -> bool {
        self.atom_name_map.contains_key(name)
    }
}
