//! # Workflows Module
//!
//! Entry points that run a complete procedure against a live [`MolecularSystem`].
//!
//! - **Mutation** ([`mutate`]) - backbone alignment of a residue template, side-chain
//!   replacement and the optional dihedral search, committed in place.
//!
//! [`MolecularSystem`]: crate::core::models::system::MolecularSystem

pub mod mutate;
