use super::clash_group::{ClashGroupAtom, MultiClashGroup, SingleClashGroup};
use crate::core::forcefield::potentials::{
    KCAL_TO_HARTREE, electrostatic_r2_squared, vdw_amber_squared,
};
use crate::core::models::atom::Element;
use crate::core::topology::bonding::BondClassifier;
use nalgebra::Point3;

/// Energy of one conformation, or a clash.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClashScore {
    pub energy: f64,
    pub clash: bool,
}

impl ClashScore {
    pub const CLASH: ClashScore = ClashScore {
        energy: 0.0,
        clash: true,
    };
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct PairParams {
    well_depth: f64,
    r_eq_sq: f64,
    coulomb_factor: f64,
}

impl PairParams {
    fn combine(a: &ClashGroupAtom, b: &ClashGroupAtom, dielectric: f64) -> Self {
        let r_eq = (a.radius + b.radius) / 2.0;
        Self {
            well_depth: (a.well_depth * b.well_depth).sqrt() * KCAL_TO_HARTREE,
            r_eq_sq: r_eq * r_eq,
            coulomb_factor: a.charge * b.charge / dielectric,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct IntraPair {
    i: usize,
    j: usize,
    params: PairParams,
}

/// Non-bonded scorer for one residue against itself and a fixed context.
///
/// All pair parameters are combined once at construction into flat tables indexed by
/// atom index.
pub struct ClashScorer<'a> {
    classifier: &'a dyn BondClassifier,
    elements: Vec<Element>,
    context_elements: Vec<Element>,
    context_positions: Vec<Point3<f64>>,
    intra_pairs: Vec<IntraPair>,
    // Row-major, one row of context pairs per residue atom.
    context_pairs: Vec<PairParams>,
    cutoff_sq: f64,
}

impl<'a> ClashScorer<'a> {
    pub fn new(
        single: &SingleClashGroup,
        context: &MultiClashGroup,
        classifier: &'a dyn BondClassifier,
        dielectric: f64,
        nonbonded_cutoff: f64,
    ) -> Self {
        let atoms = single.atoms();
        let mut intra_pairs = Vec::new();
        for (i, a) in atoms.iter().enumerate() {
            for (j, b) in atoms.iter().enumerate().skip(i + 1) {
                if Self::is_scored_intra_pair(a, b) {
                    intra_pairs.push(IntraPair {
                        i,
                        j,
                        params: PairParams::combine(a, b, dielectric),
                    });
                }
            }
        }

        let context_pairs = atoms
            .iter()
            .flat_map(|a| {
                context
                    .atoms()
                    .iter()
                    .map(move |b| PairParams::combine(a, b, dielectric))
            })
            .collect();

        Self {
            classifier,
            elements: atoms.iter().map(|a| a.element).collect(),
            context_elements: context.atoms().iter().map(|a| a.element).collect(),
            context_positions: context.atoms().iter().map(|a| a.position).collect(),
            intra_pairs,
            context_pairs,
            cutoff_sq: nonbonded_cutoff * nonbonded_cutoff,
        }
    }

    // Pairs closer than two ranks apart are treated as bonded neighbours, except that
    // hydrogens on the same rank still see each other.
    fn is_scored_intra_pair(a: &ClashGroupAtom, b: &ClashGroupAtom) -> bool {
        if a.group_id == b.group_id {
            return a.is_hydrogen() && b.is_hydrogen();
        }
        a.group_id.abs_diff(b.group_id) >= 2
    }

    #[inline]
    fn pair_energy(
        &self,
        a: Element,
        b: Element,
        dist_sq: f64,
        params: &PairParams,
        cutoff_sq: f64,
    ) -> Option<f64> {
        if self.classifier.classify(a, b, dist_sq).is_some() {
            return None;
        }
        if dist_sq > cutoff_sq {
            return Some(0.0);
        }
        Some(
            vdw_amber_squared(dist_sq, params.well_depth, params.r_eq_sq)
                + electrostatic_r2_squared(dist_sq, params.coulomb_factor),
        )
    }

    /// Scores `positions` (parallel to the residue's atoms) counting only pairs that
    /// involve an atom set in `mask`. The first bonded-distance contact aborts with a clash.
    /// The non-bonded cutoff only applies against the context.
    pub fn score(&self, positions: &[Point3<f64>], mask: &[bool]) -> ClashScore {
        let mut energy = 0.0;

        for pair in &self.intra_pairs {
            if !(mask[pair.i] || mask[pair.j]) {
                continue;
            }
            let dist_sq = (positions[pair.i] - positions[pair.j]).norm_squared();
            match self.pair_energy(
                self.elements[pair.i],
                self.elements[pair.j],
                dist_sq,
                &pair.params,
                f64::INFINITY,
            ) {
                Some(e) => energy += e,
                None => return ClashScore::CLASH,
            }
        }

        let width = self.context_positions.len();
        for (i, position) in positions.iter().enumerate() {
            if !mask[i] {
                continue;
            }
            let row = &self.context_pairs[i * width..(i + 1) * width];
            for (j, params) in row.iter().enumerate() {
                let dist_sq = (position - self.context_positions[j]).norm_squared();
                match self.pair_energy(
                    self.elements[i],
                    self.context_elements[j],
                    dist_sq,
                    params,
                    self.cutoff_sq,
                ) {
                    Some(e) => energy += e,
                    None => return ClashScore::CLASH,
                }
            }
        }

        ClashScore {
            energy,
            clash: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::forcefield::params::Forcefield;
    use crate::core::models::atom::Atom;
    use crate::core::models::chain::ChainType;
    use crate::core::models::residue::ResidueState;
    use crate::core::models::system::MolecularSystem;
    use crate::core::topology::bonding::BondDistanceTable;
    use crate::core::models::ids::ResidueId;

    // A residue with a mobile charged "CG" and a context atom moved along +x.
    fn two_atom_setup(
        separation: f64,
        charges: (f64, f64),
    ) -> (MolecularSystem, ResidueId, ResidueId) {
        let mut system = MolecularSystem::new();
        let chain = system.add_chain('A', ChainType::Protein);
        let res = system
            .add_residue(chain, 1, "XXX", ResidueState::Standard)
            .unwrap();
        let ctx = system
            .add_residue(chain, 2, "YYY", ResidueState::Standard)
            .unwrap();
        system
            .add_atom_to_residue(
                res,
                Atom::new("CG", Element::C, res, Point3::origin())
                    .with_force_field_type("CT")
                    .with_partial_charge(charges.0),
            )
            .unwrap();
        system
            .add_atom_to_residue(
                ctx,
                Atom::new("O", Element::O, ctx, Point3::new(separation, 0.0, 0.0))
                    .with_force_field_type("O")
                    .with_partial_charge(charges.1),
            )
            .unwrap();
        (system, res, ctx)
    }

    fn score_at(separation: f64, charges: (f64, f64)) -> ClashScore {
        let (system, res, ctx) = two_atom_setup(separation, charges);
        let ff = Forcefield::builtin();
        let single = SingleClashGroup::new(&system, res, ff).unwrap();
        let context = MultiClashGroup::new(&system, &[ctx], ff);
        let scorer = ClashScorer::new(&single, &context, BondDistanceTable::builtin(), 1.0, 15.0);
        scorer.score(single.positions(), single.mask(2))
    }

    #[test]
    fn far_pairs_decay_monotonically_in_magnitude() {
        let mut previous = f64::INFINITY;
        for r in [4.0, 5.0, 6.0, 8.0, 10.0, 14.0] {
            let score = score_at(r, (0.3, -0.4));
            assert!(!score.clash);
            assert!(score.energy.abs() < previous, "no decay at {r} Å");
            previous = score.energy.abs();
        }
    }

    #[test]
    fn pair_at_bonded_threshold_clashes_regardless_of_charge() {
        let cutoff = BondDistanceTable::builtin()
            .thresholds(Element::C, Element::O)
            .unwrap()
            .bonded_cutoff();
        for charges in [(0.0, 0.0), (1.0, 1.0), (-1.0, 1.0), (5.0, -5.0)] {
            assert_eq!(score_at(cutoff, charges), ClashScore::CLASH);
        }
    }

    #[test]
    fn pairs_beyond_nonbonded_cutoff_contribute_nothing() {
        let score = score_at(15.5, (1.0, -1.0));
        assert_eq!(score, ClashScore { energy: 0.0, clash: false });
    }

    #[test]
    fn cutoff_skips_context_pairs_but_not_intra_residue_pairs() {
        let mut system = MolecularSystem::new();
        let chain = system.add_chain('A', ChainType::Protein);
        let ser = crate::test_fixtures::add_residue(
            &mut system,
            chain,
            1,
            "SER",
            &nalgebra::Isometry3::identity(),
        );
        let og = crate::test_fixtures::position_of(&system, ser, "OG");
        let water = crate::test_fixtures::add_water(
            &mut system,
            chain,
            2,
            og + nalgebra::Vector3::new(4.0, 0.0, 0.0),
        );
        let ff = Forcefield::builtin();
        let single = SingleClashGroup::new(&system, ser, ff).unwrap();
        let alone = MultiClashGroup::default();
        let context = MultiClashGroup::new(&system, &[water], ff);
        let table = BondDistanceTable::builtin();
        let score = |context: &MultiClashGroup, cutoff: f64| {
            ClashScorer::new(&single, context, table, 1.0, cutoff)
                .score(single.positions(), single.mask(2))
        };

        let intra_wide = score(&alone, 15.0);
        let intra_narrow = score(&alone, 0.5);
        assert!(!intra_wide.clash);
        assert_ne!(intra_wide.energy, 0.0);
        assert_eq!(intra_narrow, intra_wide);

        let with_water = score(&context, 15.0);
        assert_ne!(with_water.energy, intra_wide.energy);
        assert_eq!(score(&context, 0.5), intra_wide);
    }

    #[test]
    fn immobile_atoms_are_not_scored_against_context() {
        let (system, res, ctx) = two_atom_setup(0.5, (0.0, 0.0));
        let ff = Forcefield::builtin();
        let single = SingleClashGroup::new(&system, res, ff).unwrap();
        let context = MultiClashGroup::new(&system, &[ctx], ff);
        let scorer = ClashScorer::new(&single, &context, BondDistanceTable::builtin(), 1.0, 15.0);
        // CG ranks 3, so it is frozen from boundary 3 on.
        assert!(!scorer.score(single.positions(), single.mask(3)).clash);
        assert!(scorer.score(single.positions(), single.mask(2)).clash);
    }

    #[test]
    fn energy_matches_combined_pair_formula() {
        let r: f64 = 6.0;
        let score = score_at(r, (0.5, -0.5));
        let ff = Forcefield::builtin();
        let (ct, o) = (ff.vdw("CT").unwrap(), ff.vdw("O").unwrap());
        let r_eq = (ct.radius + o.radius) / 2.0;
        let well = (ct.well_depth * o.well_depth).sqrt() * KCAL_TO_HARTREE;
        let expected = vdw_amber_squared(r * r, well, r_eq * r_eq)
            + electrostatic_r2_squared(r * r, -0.25);
        assert!((score.energy - expected).abs() < 1e-12);
    }

    #[test]
    fn intra_pair_rule_skips_near_neighbours_but_keeps_same_rank_hydrogens() {
        let atom = |name: &str, element| ClashGroupAtom {
            name: name.to_string(),
            element,
            position: Point3::origin(),
            charge: 0.0,
            well_depth: 0.1,
            radius: 2.0,
            group_id: crate::core::utils::identifiers::side_chain_rank(name),
        };
        let cb = atom("CB", Element::C);
        let cg = atom("CG", Element::C);
        let cd = atom("CD", Element::C);
        let hb2 = atom("HB2", Element::H);
        let hb3 = atom("HB3", Element::H);
        let hg = atom("HG", Element::H);
        assert!(!ClashScorer::is_scored_intra_pair(&cb, &cg));
        assert!(ClashScorer::is_scored_intra_pair(&cb, &cd));
        assert!(ClashScorer::is_scored_intra_pair(&hb2, &hb3));
        assert!(!ClashScorer::is_scored_intra_pair(&cb, &hb2));
        assert!(!ClashScorer::is_scored_intra_pair(&hb2, &hg));
    }
}
