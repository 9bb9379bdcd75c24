//! # Core Models Module
//!
//! The data structures describing a molecular system and the templates mutated into it.
//!
//! ## Key Components
//!
//! - [`atom`] - Elements and atoms with position, charge and force field type
//! - [`residue`] - Residues, their chain role ([`residue::ResidueState`]) and protonation flag
//! - [`chain`] - Chains and their classification
//! - [`system`] - The slot-map backed system with bond adjacency and spatial queries
//! - [`topology`] - Bonds and bond orders
//! - [`template`] - Replacement residues in their own coordinate frame
//! - [`ids`] - Stable keys for atoms, residues and chains
//!
//! ```ignore
//! use resmut::core::models::{atom::{Atom, Element}, residue::ResidueState, system::MolecularSystem};
//!
//! let mut system = MolecularSystem::new();
//! let chain_id = system.add_chain('A', ChainType::Protein);
//! let residue_id = system.add_residue(chain_id, 1, "ALA", ResidueState::Standard).unwrap();
//! system.add_atom_to_residue(residue_id, Atom::new("CA", Element::C, residue_id, Point3::origin()));
//! ```

pub mod atom;
pub mod chain;
pub mod ids;
pub mod residue;
pub mod system;
pub mod template;
pub mod topology;
