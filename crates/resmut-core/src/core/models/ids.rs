//! Stable keys into the [`MolecularSystem`](super::system::MolecularSystem) arenas.
//!
//! Keys stay valid across unrelated insertions and removals, so the mutator can hold on
//! to a residue's id while its side-chain atoms are deleted and re-created.

use slotmap::new_key_type;

new_key_type! {
    /// Key of an [`Atom`](super::atom::Atom).
    pub struct AtomId;
    /// Key of a [`Residue`](super::residue::Residue).
    pub struct ResidueId;
    /// Key of a [`Chain`](super::chain::Chain).
    pub struct ChainId;
}
