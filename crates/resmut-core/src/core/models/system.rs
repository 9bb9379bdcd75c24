use super::atom::Atom;
use super::chain::{Chain, ChainType};
use super::ids::{AtomId, ChainId, ResidueId};
use super::residue::{Residue, ResidueState};
use super::topology::{Bond, BondOrder};
use crate::core::forcefield::params::Forcefield;
use nalgebra::Point3;
use slotmap::{SecondaryMap, SlotMap};
use std::collections::HashMap;

/// A complete molecular system with atoms, residues, chains and bonds.
///
/// All entities live in slot-map arenas so ids stay valid while atoms are added and
/// removed. The system optionally carries its own non-bonded parameter table; engines
/// fall back to [`Forcefield::builtin`] when it does not.
#[derive(Debug, Clone, Default)]
pub struct MolecularSystem {
    atoms: SlotMap<AtomId, Atom>,
    residues: SlotMap<ResidueId, Residue>,
    chains: SlotMap<ChainId, Chain>,
    bonds: Vec<Bond>,
    /// Lookup map for finding residues by chain ID and residue number.
    residue_id_map: HashMap<(ChainId, isize), ResidueId>,
    chain_id_map: HashMap<char, ChainId>,
    /// Cached adjacency list for bond connectivity, indexed by atom ID.
    bond_adjacency: SecondaryMap<AtomId, Vec<AtomId>>,
    forcefield: Option<Forcefield>,
}

impl MolecularSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn atom(&self, id: AtomId) -> Option<&Atom> {
        self.atoms.get(id)
    }

    pub fn atom_mut(&mut self, id: AtomId) -> Option<&mut Atom> {
        self.atoms.get_mut(id)
    }

    pub fn atoms_iter(&self) -> impl Iterator<Item = (AtomId, &Atom)> {
        self.atoms.iter()
    }

    pub fn residue(&self, id: ResidueId) -> Option<&Residue> {
        self.residues.get(id)
    }

    pub fn residue_mut(&mut self, id: ResidueId) -> Option<&mut Residue> {
        self.residues.get_mut(id)
    }

    pub fn residues_iter(&self) -> impl Iterator<Item = (ResidueId, &Residue)> {
        self.residues.iter()
    }

    pub fn chain(&self, id: ChainId) -> Option<&Chain> {
        self.chains.get(id)
    }

    pub fn chains_iter(&self) -> impl Iterator<Item = (ChainId, &Chain)> {
        self.chains.iter()
    }

    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    /// The system's own non-bonded parameter table, if one was attached.
    pub fn forcefield(&self) -> Option<&Forcefield> {
        self.forcefield.as_ref()
    }

    pub fn set_forcefield(&mut self, forcefield: Forcefield) {
        self.forcefield = Some(forcefield);
    }

    pub fn find_chain_by_id(&self, id: char) -> Option<ChainId> {
        self.chain_id_map.get(&id).copied()
    }

    /// Finds a residue ID by its chain ID and residue number.
    pub fn find_residue_by_id(
        &self,
        chain_id: ChainId,
        residue_number: isize,
    ) -> Option<ResidueId> {
        self.residue_id_map
            .get(&(chain_id, residue_number))
            .copied()
    }

    /// Looks up an atom of a residue by name, returning both its id and the atom.
    pub fn residue_atom(&self, residue_id: ResidueId, name: &str) -> Option<(AtomId, &Atom)> {
        let atom_id = self.residues.get(residue_id)?.get_atom_id_by_name(name)?;
        self.atoms.get(atom_id).map(|atom| (atom_id, atom))
    }

    /// Adds a new chain to the system or returns the existing one with the same identifier.
    pub fn add_chain(&mut self, id: char, chain_type: ChainType) -> ChainId {
        *self.chain_id_map.entry(id).or_insert_with(|| {
            let chain = Chain::new(id, chain_type);
            self.chains.insert(chain)
        })
    }

    /// Adds a new residue to a chain or returns the existing one.
    ///
    /// Idempotent on `(chain_id, residue_number)`. Returns `None` when the chain does not
    /// exist.
    pub fn add_residue(
        &mut self,
        chain_id: ChainId,
        residue_number: isize,
        name: &str,
        state: ResidueState,
    ) -> Option<ResidueId> {
        let chain = self.chains.get_mut(chain_id)?;
        let key = (chain_id, residue_number);

        let residue_id = *self.residue_id_map.entry(key).or_insert_with(|| {
            let residue = Residue::new(residue_number, name, state, chain_id);
            self.residues.insert(residue)
        });

        if !chain.residues.contains(&residue_id) {
            chain.residues.push(residue_id);
        }

        Some(residue_id)
    }

    /// Adds an atom to a residue, overriding the atom's `residue_id` with the target.
    ///
    /// Returns `None` if the residue doesn't exist.
    pub fn add_atom_to_residue(&mut self, residue_id: ResidueId, mut atom: Atom) -> Option<AtomId> {
        let residue = self.residues.get_mut(residue_id)?;
        atom.residue_id = residue_id;
        let name = atom.name.clone();

        let atom_id = self.atoms.insert(atom);
        self.bond_adjacency.insert(atom_id, Vec::new());
        residue.add_atom(&name, atom_id);

        Some(atom_id)
    }

    /// Adds a bond between two atoms. Adding an existing bond is a successful no-op.
    pub fn add_bond(&mut self, atom1_id: AtomId, atom2_id: AtomId, order: BondOrder) -> Option<()> {
        if atom1_id == atom2_id
            || !self.atoms.contains_key(atom1_id)
            || !self.atoms.contains_key(atom2_id)
        {
            return None;
        }

        if self.are_bonded(atom1_id, atom2_id) {
            return Some(());
        }

        self.bonds.push(Bond::new(atom1_id, atom2_id, order));
        self.bond_adjacency[atom1_id].push(atom2_id);
        self.bond_adjacency[atom2_id].push(atom1_id);
        Some(())
    }

    pub fn are_bonded(&self, atom1_id: AtomId, atom2_id: AtomId) -> bool {
        self.bond_adjacency
            .get(atom1_id)
            .is_some_and(|neighbors| neighbors.contains(&atom2_id))
    }

    /// Removes an atom together with its bonds and its entry in the parent residue.
    pub fn remove_atom(&mut self, atom_id: AtomId) -> Option<Atom> {
        let atom = self.atoms.remove(atom_id)?;

        if let Some(residue) = self.residues.get_mut(atom.residue_id) {
            residue.remove_atom(&atom.name, atom_id);
        }

        self.bonds.retain(|bond| !bond.contains(atom_id));

        let neighbors = self.bond_adjacency.remove(atom_id).unwrap_or_default();
        for neighbor_id in neighbors {
            if let Some(adjacency) = self.bond_adjacency.get_mut(neighbor_id) {
                adjacency.retain(|&id| id != atom_id);
            }
        }

        Some(atom)
    }

    pub fn get_bonded_neighbors(&self, atom_id: AtomId) -> Option<&[AtomId]> {
        self.bond_adjacency.get(atom_id).map(|v| v.as_slice())
    }

    /// Geometric centre of a residue's atoms, or `None` for a missing or empty residue.
    pub fn residue_centroid(&self, residue_id: ResidueId) -> Option<Point3<f64>> {
        let residue = self.residues.get(residue_id)?;
        if residue.atoms().is_empty() {
            return None;
        }
        let sum = residue
            .atoms()
            .iter()
            .filter_map(|&id| self.atoms.get(id))
            .fold(nalgebra::Vector3::zeros(), |acc, atom| acc + atom.position.coords);
        Some(Point3::from(sum / residue.atoms().len() as f64))
    }

    /// Residues whose centroid lies within `distance` of `point`, in arena order.
    pub fn residues_within(&self, point: &Point3<f64>, distance: f64) -> Vec<ResidueId> {
        let distance_sq = distance * distance;
        self.residues
            .keys()
            .filter(|&id| {
                self.residue_centroid(id)
                    .is_some_and(|centroid| (centroid - point).norm_squared() <= distance_sq)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Element;

    struct Fixture {
        chain_a_id: ChainId,
        gly_id: ResidueId,
        gly_n_id: AtomId,
        gly_ca_id: AtomId,
        ala_id: ResidueId,
        ala_ca_id: AtomId,
    }

    fn gly_ala_system() -> (MolecularSystem, Fixture) {
        let mut system = MolecularSystem::new();
        let chain_a_id = system.add_chain('A', ChainType::Protein);

        let gly_id = system
            .add_residue(chain_a_id, 1, "GLY", ResidueState::Standard)
            .unwrap();
        let gly_n = Atom::new("N", Element::N, gly_id, Point3::new(0.0, 0.0, 0.0));
        let gly_ca = Atom::new("CA", Element::C, gly_id, Point3::new(1.4, 0.0, 0.0));
        let gly_n_id = system.add_atom_to_residue(gly_id, gly_n).unwrap();
        let gly_ca_id = system.add_atom_to_residue(gly_id, gly_ca).unwrap();
        system
            .add_bond(gly_n_id, gly_ca_id, BondOrder::Single)
            .unwrap();

        let ala_id = system
            .add_residue(chain_a_id, 2, "ALA", ResidueState::Standard)
            .unwrap();
        let ala_ca = Atom::new("CA", Element::C, ala_id, Point3::new(10.0, 0.0, 0.0));
        let ala_ca_id = system.add_atom_to_residue(ala_id, ala_ca).unwrap();
        system
            .add_bond(gly_ca_id, ala_ca_id, BondOrder::Single)
            .unwrap();

        let ids = Fixture {
            chain_a_id,
            gly_id,
            gly_n_id,
            gly_ca_id,
            ala_id,
            ala_ca_id,
        };
        (system, ids)
    }

    #[test]
    fn lookups_resolve_chains_residues_and_atoms() {
        let (system, ids) = gly_ala_system();

        assert_eq!(system.atoms_iter().count(), 3);
        assert_eq!(system.residues_iter().count(), 2);
        assert_eq!(system.chains_iter().count(), 1);
        assert_eq!(system.bonds().len(), 2);
        assert!(system.find_chain_by_id('B').is_none());

        assert_eq!(
            system.find_residue_by_id(ids.chain_a_id, 1),
            Some(ids.gly_id)
        );
        assert_eq!(
            system.find_residue_by_id(ids.chain_a_id, 2),
            Some(ids.ala_id)
        );
        assert_eq!(system.residue(ids.gly_id).unwrap().name, "GLY");
        let (ca_id, ca) = system.residue_atom(ids.gly_id, "CA").unwrap();
        assert_eq!(ca_id, ids.gly_ca_id);
        assert_eq!(ca.element, Element::C);
    }

    #[test]
    fn add_residue_is_idempotent() {
        let (mut system, ids) = gly_ala_system();
        let again = system
            .add_residue(ids.chain_a_id, 1, "GLY", ResidueState::Standard)
            .unwrap();
        assert_eq!(again, ids.gly_id);
        assert_eq!(system.chain(ids.chain_a_id).unwrap().residues().len(), 2);
    }

    #[test]
    fn removing_an_atom_drops_its_bonds_and_name_entry() {
        let (mut system, ids) = gly_ala_system();

        let removed = system.remove_atom(ids.gly_n_id).unwrap();

        assert_eq!(removed.name, "N");
        assert_eq!(system.atoms_iter().count(), 2);
        assert!(system.atom(ids.gly_n_id).is_none());
        assert_eq!(system.bonds().len(), 1);
        assert!(
            !system
                .get_bonded_neighbors(ids.gly_ca_id)
                .unwrap()
                .contains(&ids.gly_n_id)
        );
        let gly = system.residue(ids.gly_id).unwrap();
        assert_eq!(gly.atoms().len(), 1);
        assert!(gly.get_atom_id_by_name("N").is_none());
    }

    #[test]
    fn repeated_or_self_bonds_are_not_stored() {
        let (mut system, ids) = gly_ala_system();
        system
            .add_bond(ids.gly_ca_id, ids.gly_n_id, BondOrder::Single)
            .unwrap();
        assert_eq!(system.bonds().len(), 2);
        assert!(system.are_bonded(ids.gly_n_id, ids.gly_ca_id));
        assert!(
            system
                .add_bond(ids.gly_n_id, ids.gly_n_id, BondOrder::Single)
                .is_none()
        );
    }

    #[test]
    fn add_atom_to_missing_residue_returns_none() {
        let (mut system, ids) = gly_ala_system();
        system.remove_atom(ids.ala_ca_id);
        let stray = Atom::new("X", Element::C, ResidueId::default(), Point3::origin());
        assert!(
            system
                .add_atom_to_residue(ResidueId::default(), stray)
                .is_none()
        );
    }

    #[test]
    fn residue_centroid_averages_atom_positions() {
        let (system, ids) = gly_ala_system();
        let centroid = system.residue_centroid(ids.gly_id).unwrap();
        assert!((centroid - Point3::new(0.7, 0.0, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn residues_within_filters_by_centroid_distance() {
        let (system, ids) = gly_ala_system();
        let near = system.residues_within(&Point3::origin(), 5.0);
        assert_eq!(near, vec![ids.gly_id]);
        let all = system.residues_within(&Point3::origin(), 10.0);
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn forcefield_is_absent_until_attached() {
        let (mut system, _) = gly_ala_system();
        assert!(system.forcefield().is_none());
        system.set_forcefield(Forcefield::builtin().clone());
        assert!(system.forcefield().is_some());
    }
}
