use crate::core::models::atom::{Atom, Element};
use crate::core::models::ids::{AtomId, ResidueId};
use crate::core::models::system::MolecularSystem;
use crate::core::models::template::ResidueTemplate;
use crate::core::models::topology::BondOrder;
use crate::core::utils::geometry::{dihedral_angle, rotation_from_axis_angle, rotation_to_align};
use crate::core::utils::identifiers::{is_backbone_atom, side_chain_rank};
use crate::engine::config::{MutationConfig, OptimizationMethod, ResidueSpecifier};
use crate::engine::context::{ScanContext, context_residues, resolve_residue};
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::scanner::{DihedralScanner, ScanStatistics};
use nalgebra::Point3;
use tracing::{debug, info, instrument, warn};

const AMIDE_HYDROGEN_BOND_LENGTH: f64 = 1.01;
const PROLINE: &str = "PRO";

#[derive(Debug, Clone, PartialEq)]
pub enum Optimisation {
    /// The caller asked for replacement only.
    Skipped,
    /// The new residue has no rotatable side-chain torsions.
    NothingToOptimise,
    /// The lowest-scoring conformer was committed.
    Optimised { score: f64, dihedrals: Vec<f64> },
    /// Every conformer clashed; the aligned template geometry was kept.
    AllClashing,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MutationReport {
    pub residue: ResidueSpecifier,
    pub old_name: String,
    pub new_name: String,
    pub optimisation: Optimisation,
    pub statistics: Option<ScanStatistics>,
}

#[derive(Debug, Clone, Copy)]
struct Anchors {
    n: Point3<f64>,
    ca: Point3<f64>,
    c: Point3<f64>,
}

/// Replaces the side chain of one residue of a live system and optionally relaxes it.
pub struct ResidueMutator<'a> {
    system: &'a mut MolecularSystem,
    residue_id: ResidueId,
    spec: ResidueSpecifier,
    context: ScanContext<'a>,
    config: MutationConfig,
    reporter: Option<&'a ProgressReporter<'a>>,
}

impl<'a> ResidueMutator<'a> {
    pub fn new(
        system: &'a mut MolecularSystem,
        spec: ResidueSpecifier,
        context: ScanContext<'a>,
    ) -> Result<Self, EngineError> {
        let residue_id = resolve_residue(system, &spec)?;
        let state = system
            .residue(residue_id)
            .map(|residue| residue.state)
            .ok_or(EngineError::ResidueNotFound { spec })?;
        if !state.is_mutable() {
            return Err(EngineError::InvalidResidueState { spec, state });
        }
        Ok(Self {
            system,
            residue_id,
            spec,
            context,
            config: MutationConfig::default(),
            reporter: None,
        })
    }

    pub fn with_config(mut self, config: MutationConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_reporter(mut self, reporter: &'a ProgressReporter<'a>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    pub fn residue_id(&self) -> ResidueId {
        self.residue_id
    }

    /// Mutates with the configured optimisation method.
    pub fn mutate(&mut self, template: &ResidueTemplate) -> Result<MutationReport, EngineError> {
        self.mutate_standard(template, self.config.method)
    }

    /// Aligns `template` onto the residue's backbone, swaps in its side chain and searches
    /// the new side chain's torsions with `method`.
    ///
    /// Errors raised before the side chain is swapped leave the residue untouched.
    #[instrument(skip_all, name = "mutate_residue", fields(residue = %self.spec, template = %template.name))]
    pub fn mutate_standard(
        &mut self,
        template: &ResidueTemplate,
        method: OptimizationMethod,
    ) -> Result<MutationReport, EngineError> {
        let silent = ProgressReporter::new();
        let reporter = self.reporter.unwrap_or(&silent);

        reporter.report(Progress::PhaseStart { name: "Alignment" });
        let old_name = self.residue_name()?;
        let anchors = Anchors {
            n: self.residue_anchor("N")?,
            ca: self.residue_anchor("CA")?,
            c: self.residue_anchor("C")?,
        };
        let aligned = align_template(template, &anchors)?;
        reporter.report(Progress::PhaseFinish);

        reporter.report(Progress::PhaseStart {
            name: "Side-chain replacement",
        });
        self.replace_side_chain(&aligned)?;
        reporter.report(Progress::PhaseFinish);
        info!("Replaced side chain of {} {} with {}.", self.spec, old_name, aligned.name);

        let (optimisation, statistics) = if method == OptimizationMethod::None {
            (Optimisation::Skipped, None)
        } else {
            reporter.report(Progress::PhaseStart {
                name: "Dihedral search",
            });
            let result = self.optimise(method, reporter)?;
            reporter.report(Progress::PhaseFinish);
            result
        };

        Ok(MutationReport {
            residue: self.spec,
            old_name,
            new_name: aligned.name,
            optimisation,
            statistics,
        })
    }

    fn residue_name(&self) -> Result<String, EngineError> {
        self.system
            .residue(self.residue_id)
            .map(|residue| residue.name.clone())
            .ok_or(EngineError::ResidueNotFound { spec: self.spec })
    }

    fn residue_anchor(&self, atom_name: &'static str) -> Result<Point3<f64>, EngineError> {
        self.system
            .residue_atom(self.residue_id, atom_name)
            .filter(|(_, atom)| atom.has_valid_position())
            .map(|(_, atom)| atom.position)
            .ok_or_else(|| EngineError::MissingAnchorAtom {
                residue_name: self.residue_name().unwrap_or_default(),
                atom_name,
            })
    }

    fn replace_side_chain(&mut self, aligned: &ResidueTemplate) -> Result<(), EngineError> {
        let residue_id = self.residue_id;
        let residue = self
            .system
            .residue(residue_id)
            .ok_or(EngineError::ResidueNotFound { spec: self.spec })?;
        let protonated = residue.protonated;
        let former_ring_carbon = self.proline_ring_carbon();

        let doomed: Vec<AtomId> = residue
            .atoms()
            .iter()
            .copied()
            .filter(|&id| {
                self.system
                    .atom(id)
                    .is_some_and(|atom| !is_backbone_atom(&atom.name))
            })
            .collect();
        debug!("Removing {} side-chain atoms.", doomed.len());
        for atom_id in doomed {
            self.system.remove_atom(atom_id);
        }

        for template_atom in aligned.atoms() {
            if is_backbone_atom(&template_atom.name)
                || (!protonated && template_atom.element.is_hydrogen())
            {
                continue;
            }
            let atom = Atom::new(
                &template_atom.name,
                template_atom.element,
                residue_id,
                template_atom.position,
            )
            .with_force_field_type(&template_atom.force_field_type)
            .with_partial_charge(template_atom.partial_charge);
            self.system
                .add_atom_to_residue(residue_id, atom)
                .ok_or_else(|| EngineError::Internal("mutated residue vanished".to_string()))?;
        }

        for &(i, j, order) in aligned.bonds() {
            let (a, b) = (&aligned.atoms()[i].name, &aligned.atoms()[j].name);
            if let (Some(a), Some(b)) = (self.atom_id(a), self.atom_id(b)) {
                self.system.add_bond(a, b, order);
            }
        }

        let becomes_proline = aligned.name == PROLINE;
        if let Some(ring_carbon) = former_ring_carbon {
            if !becomes_proline && protonated && !self.has_amide_hydrogen() {
                self.add_amide_hydrogen(&ring_carbon, aligned)?;
            }
        }
        if becomes_proline {
            for name in ["H", "HN"] {
                if let Some(id) = self.atom_id(name) {
                    self.system.remove_atom(id);
                }
            }
            self.bond_by_name("N", "CD");
        }
        self.bond_by_name("CA", "CB");

        if let Some(residue) = self.system.residue_mut(residue_id) {
            residue.name = aligned.name.clone();
        }
        Ok(())
    }

    // Position of the side-chain carbon closing a proline-like ring onto N, if any.
    fn proline_ring_carbon(&self) -> Option<Point3<f64>> {
        let n = self.atom_id("N")?;
        self.system
            .get_bonded_neighbors(n)?
            .iter()
            .filter_map(|&id| self.system.atom(id))
            .find(|atom| {
                atom.residue_id == self.residue_id
                    && atom.element == Element::C
                    && side_chain_rank(&atom.name) == 4
            })
            .map(|atom| atom.position)
    }

    fn has_amide_hydrogen(&self) -> bool {
        self.atom_id("H").is_some() || self.atom_id("HN").is_some()
    }

    fn add_amide_hydrogen(
        &mut self,
        ring_carbon: &Point3<f64>,
        aligned: &ResidueTemplate,
    ) -> Result<(), EngineError> {
        let Some(n) = self.atom_id("N") else {
            return Ok(());
        };
        let n_position = self
            .system
            .atom(n)
            .map(|atom| atom.position)
            .ok_or_else(|| EngineError::Internal("amide nitrogen vanished".to_string()))?;
        let Some(direction) = (ring_carbon - n_position).try_normalize(1e-6) else {
            warn!("Former ring carbon sits on N; no amide hydrogen added.");
            return Ok(());
        };

        let mut hydrogen = Atom::new(
            "H",
            Element::H,
            self.residue_id,
            n_position + direction * AMIDE_HYDROGEN_BOND_LENGTH,
        );
        if let Some(template_h) = aligned.atom("H") {
            hydrogen = hydrogen
                .with_force_field_type(&template_h.force_field_type)
                .with_partial_charge(template_h.partial_charge);
        }
        let h = self
            .system
            .add_atom_to_residue(self.residue_id, hydrogen)
            .ok_or_else(|| EngineError::Internal("mutated residue vanished".to_string()))?;
        self.system.add_bond(n, h, BondOrder::Single);
        debug!("Added amide hydrogen to the former proline nitrogen.");
        Ok(())
    }

    fn atom_id(&self, name: &str) -> Option<AtomId> {
        self.system
            .residue_atom(self.residue_id, name)
            .map(|(id, _)| id)
    }

    fn bond_by_name(&mut self, a: &str, b: &str) {
        if let (Some(a), Some(b)) = (self.atom_id(a), self.atom_id(b)) {
            self.system.add_bond(a, b, BondOrder::Single);
        }
    }

    fn optimise(
        &mut self,
        method: OptimizationMethod,
        reporter: &ProgressReporter,
    ) -> Result<(Optimisation, Option<ScanStatistics>), EngineError> {
        let context_ids =
            context_residues(self.system, self.residue_id, self.config.context_radius)?;
        let scanner = DihedralScanner::new(
            self.system,
            self.residue_id,
            &context_ids,
            &self.context,
            self.config.scan,
        )?;
        if scanner.group_count() == 0 {
            info!("{} has no rotatable side-chain torsions; nothing to optimise.", self.spec);
            return Ok((Optimisation::NothingToOptimise, None));
        }

        let outcome = scanner.search(method, reporter)?;
        let Some(best) = outcome.best() else {
            warn!(
                "Every conformer of {} clashes; keeping the aligned template geometry.",
                self.spec
            );
            return Ok((Optimisation::AllClashing, Some(outcome.statistics)));
        };

        let dihedrals = scanner.dihedrals(&best.positions);
        for (&atom_id, position) in scanner.atom_ids().iter().zip(&best.positions) {
            if let Some(atom) = self.system.atom_mut(atom_id) {
                if !is_backbone_atom(&atom.name) {
                    atom.position = *position;
                }
            }
        }
        info!(
            "Committed conformer of {} with score {:.6} and dihedrals {:?}.",
            self.spec,
            best.score,
            dihedrals.iter().map(|d| format!("{d:.1}")).collect::<Vec<_>>()
        );

        let optimisation = Optimisation::Optimised {
            score: best.score,
            dihedrals,
        };
        Ok((optimisation, Some(outcome.statistics)))
    }
}

/// A copy of `template` moved so its C, C→N direction and Cα half-plane match `anchors`.
fn align_template(
    template: &ResidueTemplate,
    anchors: &Anchors,
) -> Result<ResidueTemplate, EngineError> {
    let template_anchor = |atom_name: &'static str| {
        template
            .atom(atom_name)
            .map(|atom| atom.position)
            .filter(|p| p.coords.iter().all(|c| c.is_finite()))
            .ok_or_else(|| EngineError::MissingAnchorAtom {
                residue_name: template.name.clone(),
                atom_name,
            })
    };
    let (t_n, t_c) = (template_anchor("N")?, template_anchor("C")?);
    template_anchor("CA")?;

    let mut aligned = template.clone();
    aligned.translate(&(anchors.c - t_c));

    let c_to_n = anchors.n - anchors.c;
    let onto_axis = rotation_to_align(&(t_n - t_c), &c_to_n).ok_or_else(|| {
        EngineError::DegenerateGeometry("C and N anchors coincide".to_string())
    })?;
    aligned.rotate_about(&anchors.c, &onto_axis);

    let new_ca = aligned
        .atom("CA")
        .map(|atom| atom.position)
        .ok_or_else(|| EngineError::Internal("template lost its CA".to_string()))?;
    let twist = dihedral_angle(&anchors.ca, &anchors.c, &anchors.n, &new_ca);
    let about_axis = rotation_from_axis_angle(&c_to_n, -twist).ok_or_else(|| {
        EngineError::DegenerateGeometry("C and N anchors coincide".to_string())
    })?;
    aligned.rotate_about(&anchors.c, &about_axis);
    Ok(aligned)
}
