use super::ids::ResidueId;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChainType {
    #[default]
    Protein,
    Ligand,
    Water,
    Other,
}

impl FromStr for ChainType {
    type Err = std::convert::Infallible;

    /// Unrecognised strings fall back to [`ChainType::Other`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "protein" => ChainType::Protein,
            "ligand" => ChainType::Ligand,
            "water" => ChainType::Water,
            _ => ChainType::Other,
        })
    }
}

impl fmt::Display for ChainType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ChainType::Protein => "Protein",
            ChainType::Ligand => "Ligand",
            ChainType::Water => "Water",
            ChainType::Other => "Other",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chain {
    pub id: char,
    pub chain_type: ChainType,
    pub(crate) residues: Vec<ResidueId>, // In sequence order of insertion
}

impl Chain {
    pub(crate) fn new(id: char, chain_type: ChainType) -> Self {
        Self {
            id,
            chain_type,
            residues: Vec::new(),
        }
    }

    pub fn residues(&self) -> &[ResidueId] {
        &self.residues
    }
}
