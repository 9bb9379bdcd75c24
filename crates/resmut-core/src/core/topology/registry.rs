use crate::core::models::residue::ResidueState;
use once_cell::sync::Lazy;
use phf::{Map, phf_map};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Four atom names defining one rotatable torsion, ordered from the backbone outwards.
pub type DihedralGroup = [String; 4];

const CHI1: [&str; 4] = ["N", "CA", "CB", "CG"];
const CHI2_CD: [&str; 4] = ["CA", "CB", "CG", "CD"];

// Side-chain torsions of the standard residues and their AMBER protonation variants.
static STANDARD_DIHEDRALS: Map<&'static str, &'static [[&'static str; 4]]> = phf_map! {
    "ALA" => &[],
    "GLY" => &[],
    "PRO" => &[],
    "ARG" => &[CHI1, CHI2_CD, ["CB", "CG", "CD", "NE"], ["CG", "CD", "NE", "CZ"]],
    "ASN" => &[CHI1, ["CA", "CB", "CG", "OD1"]],
    "ASP" => &[CHI1, ["CA", "CB", "CG", "OD1"]],
    "ASH" => &[CHI1, ["CA", "CB", "CG", "OD1"]],
    "CYS" => &[["N", "CA", "CB", "SG"]],
    "CYX" => &[["N", "CA", "CB", "SG"]],
    "CYM" => &[["N", "CA", "CB", "SG"]],
    "GLN" => &[CHI1, CHI2_CD, ["CB", "CG", "CD", "OE1"]],
    "GLU" => &[CHI1, CHI2_CD, ["CB", "CG", "CD", "OE1"]],
    "GLH" => &[CHI1, CHI2_CD, ["CB", "CG", "CD", "OE1"]],
    "HIS" => &[CHI1, ["CA", "CB", "CG", "ND1"]],
    "HID" => &[CHI1, ["CA", "CB", "CG", "ND1"]],
    "HIE" => &[CHI1, ["CA", "CB", "CG", "ND1"]],
    "HIP" => &[CHI1, ["CA", "CB", "CG", "ND1"]],
    "ILE" => &[["N", "CA", "CB", "CG1"], ["CA", "CB", "CG1", "CD1"]],
    "LEU" => &[CHI1, ["CA", "CB", "CG", "CD1"]],
    "LYS" => &[CHI1, CHI2_CD, ["CB", "CG", "CD", "CE"], ["CG", "CD", "CE", "NZ"]],
    "LYN" => &[CHI1, CHI2_CD, ["CB", "CG", "CD", "CE"], ["CG", "CD", "CE", "NZ"]],
    "MET" => &[CHI1, ["CA", "CB", "CG", "SD"], ["CB", "CG", "SD", "CE"]],
    "PHE" => &[CHI1, ["CA", "CB", "CG", "CD1"]],
    "SER" => &[["N", "CA", "CB", "OG"]],
    "THR" => &[["N", "CA", "CB", "OG1"]],
    "TRP" => &[CHI1, ["CA", "CB", "CG", "CD1"]],
    "TYR" => &[CHI1, ["CA", "CB", "CG", "CD1"]],
    "VAL" => &[["N", "CA", "CB", "CG1"]],
};

static BUILTIN: Lazy<TopologyRegistry> = Lazy::new(|| TopologyRegistry {
    registry: STANDARD_DIHEDRALS
        .entries()
        .map(|(name, groups)| {
            let dihedrals = groups
                .iter()
                .map(|group| (*group).map(String::from))
                .collect();
            (
                name.to_string(),
                ResidueTopology {
                    dihedrals,
                    states: default_states(),
                },
            )
        })
        .collect(),
});

fn default_states() -> Vec<ResidueState> {
    vec![
        ResidueState::Standard,
        ResidueState::NTerminal,
        ResidueState::CTerminal,
    ]
}

/// Topology of one residue type as far as the dihedral scan is concerned.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ResidueTopology {
    /// Rotatable torsions, outermost (chi1) first.
    pub dihedrals: Vec<DihedralGroup>,
    /// Residue states this topology applies to.
    #[serde(default = "default_states")]
    pub states: Vec<ResidueState>,
}

#[derive(Debug, Clone, Default)]
pub struct TopologyRegistry {
    registry: HashMap<String, ResidueTopology>,
}

impl TopologyRegistry {
    /// Registry of the standard amino acids and their common protonation variants.
    pub fn builtin() -> &'static TopologyRegistry {
        &BUILTIN
    }

    pub fn load(path: &Path) -> Result<Self, TopologyLoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| TopologyLoadError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        let registry: HashMap<String, ResidueTopology> =
            toml::from_str(&content).map_err(|e| TopologyLoadError::Toml {
                path: path.to_string_lossy().to_string(),
                source: e,
            })?;
        Ok(Self { registry })
    }

    pub fn get(&self, residue_name: &str) -> Option<&ResidueTopology> {
        self.registry.get(residue_name)
    }

    /// Adds or replaces a residue definition.
    pub fn insert(&mut self, residue_name: &str, topology: ResidueTopology) {
        self.registry.insert(residue_name.to_string(), topology);
    }

    /// Copies every definition from `other`, replacing same-named entries.
    pub fn extend_from(&mut self, other: &TopologyRegistry) {
        self.registry.extend(
            other
                .registry
                .iter()
                .map(|(name, topology)| (name.clone(), topology.clone())),
        );
    }

    pub fn residue_names(&self) -> impl Iterator<Item = &str> {
        self.registry.keys().map(String::as_str)
    }

    /// The ordered rotatable torsions of `residue_name` in `state`.
    pub fn dihedral_groups(
        &self,
        residue_name: &str,
        state: ResidueState,
    ) -> Result<&[DihedralGroup], TopologyError> {
        let topology = self
            .get(residue_name)
            .ok_or_else(|| TopologyError::UnknownResidue(residue_name.to_string()))?;
        if !topology.states.contains(&state) {
            return Err(TopologyError::UnsupportedState {
                residue_name: residue_name.to_string(),
                state,
            });
        }
        Ok(&topology.dihedrals)
    }
}

#[derive(Debug, Error)]
pub enum TopologyLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TopologyError {
    #[error("No topology is defined for residue '{0}'")]
    UnknownResidue(String),
    #[error("Topology for residue '{residue_name}' does not cover state '{state}'")]
    UnsupportedState {
        residue_name: String,
        state: ResidueState,
    },
}
