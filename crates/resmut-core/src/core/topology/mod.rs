//! # Topology Module
//!
//! Structural knowledge the engine needs about residues and atom pairs.
//!
//! ## Key Components
//!
//! - [`registry`] - Ordered rotatable dihedral groups per residue name and state, with a
//!   built-in table for the standard amino acids and a TOML loader for extra residues.
//! - [`bonding`] - The distance-based bond-order classifier. It decides both which atom
//!   pairs are bonded and which non-bonded contacts count as steric clashes.
//!
//! ```ignore
//! use resmut::core::topology::registry::TopologyRegistry;
//!
//! let registry = TopologyRegistry::builtin();
//! let chis = registry.dihedral_groups("LYS", ResidueState::Standard)?;
//! assert_eq!(chis.len(), 4);
//! ```

pub mod bonding;
pub mod registry;
