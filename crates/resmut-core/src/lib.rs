//! # resmut Core Library
//!
//! Residue mutation for protein structures: a residue's side chain is swapped for a
//! template's, and the new side chain's rotatable torsions are searched for a clash-free,
//! low-energy conformation.
//!
//! ## Layers
//!
//! - **[`core`]: The Foundation.** Molecular data models (`MolecularSystem`, residue
//!   templates), non-bonded parameters and potentials, the dihedral topology table, the
//!   bond-order classifier and geometry helpers. Stateless apart from the models themselves.
//!
//! - **[`engine`]: The Search.** Clash-group snapshots of a residue and its surroundings,
//!   the clash scorer, and the `DihedralScanner` that sweeps torsions group by group while
//!   keeping only local minima. Reports progress and honours cancellation.
//!
//! - **[`workflows`]: The Public API.** `ResidueMutator` ties alignment, side-chain
//!   replacement and the scanner together and commits the best conformer into the live
//!   system.

pub mod core;
pub mod engine;
pub mod workflows;

#[cfg(test)]
pub(crate) mod test_fixtures;
