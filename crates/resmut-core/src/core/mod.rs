//! # Core Module
//!
//! Data models and static knowledge used by the mutation engine.
//!
//! - **Molecular Representation** ([`models`]) - atoms, residues, chains, the system arena and
//!   residue templates
//! - **Non-bonded Parameters** ([`forcefield`]) - per-type van der Waals parameters, the
//!   dielectric constant and the pair potentials
//! - **Structural Knowledge** ([`topology`]) - rotatable dihedral groups per residue type and
//!   the distance-based bond-order classifier
//! - **Utilities** ([`utils`]) - rigid-body geometry and atom-name conventions

pub mod forcefield;
pub mod models;
pub mod topology;
pub mod utils;
