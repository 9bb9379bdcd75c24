use super::clash_group::{MultiClashGroup, SingleClashGroup};
use super::config::{OptimizationMethod, ScanConfig};
use super::context::ScanContext;
use super::error::EngineError;
use super::progress::{Progress, ProgressReporter};
use super::scoring::{ClashScore, ClashScorer};
use crate::core::models::ids::{AtomId, ResidueId};
use crate::core::models::system::MolecularSystem;
use crate::core::utils::geometry::{dihedral_angle, rotate_about_axis, rotation_from_axis_angle};
use nalgebra::{Point3, Rotation3};
use tracing::{debug, info, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Freeze boundary used to score final conformers: every side-chain atom beyond Cα moves.
pub const FINAL_BOUNDARY: u8 = 2;

const MIN_AXIS_LENGTH: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq)]
pub struct Conformer {
    /// Positions parallel to [`DihedralScanner::atom_ids`].
    pub positions: Vec<Point3<f64>>,
    pub score: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanStatistics {
    pub scanned_steps: usize,
    pub clashing_steps: usize,
    /// Number of candidate states entering each dihedral group.
    pub candidates_per_group: Vec<usize>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanOutcome {
    pub conformers: Vec<Conformer>,
    pub statistics: ScanStatistics,
}

impl ScanOutcome {
    /// The lowest-scoring conformer; the earliest one wins ties.
    pub fn best(&self) -> Option<&Conformer> {
        self.conformers
            .iter()
            .reduce(|best, c| if c.score < best.score { c } else { best })
    }
}

#[derive(Debug, Clone)]
struct DihedralAxis {
    atoms: [usize; 4],
    boundary: u8,
}

#[derive(Debug, Default)]
struct Sweep {
    retained: Vec<Vec<Point3<f64>>>,
    scanned: usize,
    clashing: usize,
}

/// Follows the energy profile of one sweep and flags the step before each local minimum
/// is left behind.
///
/// A clash counts as a score of zero: the next clear step is descending when it scores
/// at or below zero.
#[derive(Debug, Default)]
struct MinimumTracker {
    reference: Option<f64>,
    descending: bool,
}

impl MinimumTracker {
    /// Feeds the next step's score. Returns true when the previous step is a minimum to keep.
    fn observe(&mut self, score: ClashScore) -> bool {
        if score.clash {
            let keep = self.descending;
            self.descending = false;
            self.reference = Some(0.0);
            return keep;
        }
        let keep = match self.reference {
            Some(last) if score.energy <= last => {
                self.descending = true;
                false
            }
            Some(_) => std::mem::take(&mut self.descending),
            None => false,
        };
        self.reference = Some(score.energy);
        keep
    }
}

/// Clash-avoiding search over the rotatable side-chain torsions of one residue.
///
/// Everything the search touches is snapshotted at construction; the live system is
/// never modified.
pub struct DihedralScanner<'a> {
    residue_name: String,
    groups: Vec<DihedralAxis>,
    single: SingleClashGroup,
    scorer: ClashScorer<'a>,
    config: ScanConfig,
}

impl<'a> DihedralScanner<'a> {
    #[instrument(skip_all, name = "dihedral_scanner_setup")]
    pub fn new(
        system: &MolecularSystem,
        residue_id: ResidueId,
        context_residues: &[ResidueId],
        context: &ScanContext<'a>,
        config: ScanConfig,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        let residue = system.residue(residue_id).ok_or_else(|| {
            EngineError::Internal(format!("residue {residue_id:?} does not exist"))
        })?;
        let descriptors = context
            .topology
            .dihedral_groups(&residue.name, residue.state)?;
        let forcefield = context.resolve_forcefield(system)?;

        let single = SingleClashGroup::new(system, residue_id, forcefield)?;
        let surrounding: Vec<ResidueId> = context_residues
            .iter()
            .copied()
            .filter(|&id| id != residue_id)
            .collect();
        let static_group = MultiClashGroup::new(system, &surrounding, forcefield);

        let mut groups = Vec::with_capacity(descriptors.len());
        for (g, descriptor) in descriptors.iter().enumerate() {
            let mut atoms = [0usize; 4];
            for (slot, name) in atoms.iter_mut().zip(descriptor) {
                *slot = single
                    .index_of(name)
                    .ok_or_else(|| EngineError::MissingDihedralAtom {
                        residue_name: residue.name.clone(),
                        atom_name: name.clone(),
                    })?;
            }
            let boundary = u8::try_from(g + 2).map_err(|_| {
                EngineError::Internal(format!("too many dihedral groups for '{}'", residue.name))
            })?;
            let mask = single.mask(boundary);
            if mask[atoms[1]] || mask[atoms[2]] {
                return Err(EngineError::MalformedDihedralGroup {
                    residue_name: residue.name.clone(),
                    group: descriptor.clone(),
                });
            }
            let positions = single.positions();
            if (positions[atoms[2]] - positions[atoms[1]]).norm() < MIN_AXIS_LENGTH {
                return Err(EngineError::DegenerateGeometry(format!(
                    "axis {}-{} of residue '{}' has zero length",
                    descriptor[1], descriptor[2], residue.name
                )));
            }
            groups.push(DihedralAxis { atoms, boundary });
        }

        let scorer = ClashScorer::new(
            &single,
            &static_group,
            context.classifier,
            forcefield.dielectric_constant(),
            config.nonbonded_cutoff,
        );

        debug!(
            "Scanner for '{}' ready: {} atoms, {} context atoms, {} dihedral groups.",
            residue.name,
            single.len(),
            static_group.len(),
            groups.len()
        );

        Ok(Self {
            residue_name: residue.name.clone(),
            groups,
            single,
            scorer,
            config,
        })
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Live atom ids of the scanned residue, parallel to every position array.
    pub fn atom_ids(&self) -> &[AtomId] {
        self.single.atom_ids()
    }

    pub fn atom_name(&self, index: usize) -> &str {
        &self.single.atoms()[index].name
    }

    pub fn original_positions(&self) -> &[Point3<f64>] {
        self.single.positions()
    }

    pub fn score(&self, positions: &[Point3<f64>], boundary: u8) -> ClashScore {
        self.scorer.score(positions, self.single.mask(boundary))
    }

    /// Torsion of every dihedral group in `positions`, in degrees.
    pub fn dihedrals(&self, positions: &[Point3<f64>]) -> Vec<f64> {
        self.groups
            .iter()
            .map(|axis| {
                let [a, b, c, d] = axis.atoms;
                dihedral_angle(&positions[a], &positions[b], &positions[c], &positions[d])
            })
            .collect()
    }

    pub fn search(
        &self,
        method: OptimizationMethod,
        reporter: &ProgressReporter,
    ) -> Result<ScanOutcome, EngineError> {
        match method {
            OptimizationMethod::None => Ok(ScanOutcome::default()),
            OptimizationMethod::Tree => self.best_conformers(reporter),
            OptimizationMethod::BruteForce => self.brute_force(reporter),
            OptimizationMethod::TreeThenBruteForce => {
                let tree = self.best_conformers(reporter)?;
                if !tree.conformers.is_empty() || self.groups.is_empty() {
                    return Ok(tree);
                }
                info!(
                    "Tree search found no conformer for '{}'; falling back to brute force.",
                    self.residue_name
                );
                let mut exhaustive = self.brute_force(reporter)?;
                exhaustive.statistics.scanned_steps += tree.statistics.scanned_steps;
                exhaustive.statistics.clashing_steps += tree.statistics.clashing_steps;
                Ok(exhaustive)
            }
        }
    }

    /// Pruned tree search: each group carries forward only the local minima of its sweep.
    #[instrument(skip_all, name = "dihedral_scan", fields(residue = %self.residue_name))]
    pub fn best_conformers(&self, reporter: &ProgressReporter) -> Result<ScanOutcome, EngineError> {
        let mut outcome = ScanOutcome::default();
        if self.groups.is_empty() {
            debug!("No rotatable dihedral groups; nothing to scan.");
            return Ok(outcome);
        }

        let last = self.groups.len() - 1;
        let mut inherited = vec![self.single.positions().to_vec()];

        for (g, axis) in self.groups.iter().enumerate() {
            reporter.report(Progress::Message(format!(
                "Scanning dihedral group {} of {} ({} candidates)",
                g + 1,
                self.groups.len(),
                inherited.len()
            )));
            outcome.statistics.candidates_per_group.push(inherited.len());

            let sweeps = self.sweep_all(g, axis, &inherited, reporter)?;
            let mut next = Vec::new();
            for sweep in sweeps {
                outcome.statistics.scanned_steps += sweep.scanned;
                outcome.statistics.clashing_steps += sweep.clashing;
                if g == last {
                    for positions in sweep.retained {
                        let final_score = self.score(&positions, FINAL_BOUNDARY);
                        if !final_score.clash {
                            outcome.conformers.push(Conformer {
                                positions,
                                score: final_score.energy,
                            });
                        }
                    }
                } else {
                    next.extend(sweep.retained);
                }
            }

            debug!(
                "Dihedral group {} retained {} candidates.",
                g + 1,
                if g == last { outcome.conformers.len() } else { next.len() }
            );
            inherited = next;
        }

        self.log_outcome(&outcome);
        Ok(outcome)
    }

    /// Depth-first enumeration of every step combination, pruning clashing branches.
    #[instrument(skip_all, name = "dihedral_brute_force", fields(residue = %self.residue_name))]
    pub fn brute_force(&self, reporter: &ProgressReporter) -> Result<ScanOutcome, EngineError> {
        let mut outcome = ScanOutcome::default();
        if self.groups.is_empty() {
            return Ok(outcome);
        }
        outcome.statistics.candidates_per_group = vec![0; self.groups.len()];
        self.descend(0, self.single.positions().to_vec(), &mut outcome, reporter)?;
        self.log_outcome(&outcome);
        Ok(outcome)
    }

    fn descend(
        &self,
        g: usize,
        start: Vec<Point3<f64>>,
        outcome: &mut ScanOutcome,
        reporter: &ProgressReporter,
    ) -> Result<(), EngineError> {
        if reporter.is_cancelled() {
            return Err(EngineError::Cancelled);
        }
        outcome.statistics.candidates_per_group[g] += 1;

        let axis = &self.groups[g];
        let mask = self.single.mask(axis.boundary);
        let (origin, rotation) = self.step_rotation(axis, &start)?;
        let steps = self.config.steps();
        let last = g + 1 == self.groups.len();
        let mut positions = start.clone();

        for step in 0..steps {
            advance_to_step(step, &mut positions, &start, mask, &origin, &rotation);
            let score = self.scorer.score(&positions, mask);
            outcome.statistics.scanned_steps += 1;
            if score.clash {
                outcome.statistics.clashing_steps += 1;
            } else if last {
                let final_score = self.score(&positions, FINAL_BOUNDARY);
                if !final_score.clash {
                    outcome.conformers.push(Conformer {
                        positions: positions.clone(),
                        score: final_score.energy,
                    });
                }
            } else {
                self.descend(g + 1, positions.clone(), outcome, reporter)?;
            }
            if g == 0 {
                reporter.report(Progress::Fraction((step + 1) as f64 / steps as f64));
            }
        }
        Ok(())
    }

    fn sweep_all(
        &self,
        g: usize,
        axis: &DihedralAxis,
        inherited: &[Vec<Point3<f64>>],
        reporter: &ProgressReporter,
    ) -> Result<Vec<Sweep>, EngineError> {
        let fraction = |done: usize| {
            (g as f64 + done as f64 / inherited.len() as f64) / self.groups.len() as f64
        };

        #[cfg(not(feature = "parallel"))]
        {
            let mut sweeps = Vec::with_capacity(inherited.len());
            for (i, candidate) in inherited.iter().enumerate() {
                if reporter.is_cancelled() {
                    return Err(EngineError::Cancelled);
                }
                sweeps.push(self.sweep(axis, candidate)?);
                reporter.report(Progress::Fraction(fraction(i + 1)));
            }
            Ok(sweeps)
        }

        #[cfg(feature = "parallel")]
        {
            let sweeps = inherited
                .par_iter()
                .map(|candidate| {
                    if reporter.is_cancelled() {
                        return Err(EngineError::Cancelled);
                    }
                    self.sweep(axis, candidate)
                })
                .collect::<Result<Vec<_>, _>>()?;
            for i in 0..inherited.len() {
                reporter.report(Progress::Fraction(fraction(i + 1)));
            }
            Ok(sweeps)
        }
    }

    /// Sweeps one torsion of one candidate and keeps the states just before each rise or
    /// clash that follows a descent.
    fn sweep(&self, axis: &DihedralAxis, start: &[Point3<f64>]) -> Result<Sweep, EngineError> {
        let mask = self.single.mask(axis.boundary);
        let (origin, rotation) = self.step_rotation(axis, start)?;

        let mut sweep = Sweep::default();
        let mut tracker = MinimumTracker::default();
        let mut positions = start.to_vec();
        let mut previous = positions.clone();

        for step in 0..self.config.steps() {
            if step > 0 {
                previous.copy_from_slice(&positions);
            }
            advance_to_step(step, &mut positions, start, mask, &origin, &rotation);
            let score = self.scorer.score(&positions, mask);
            sweep.scanned += 1;
            if score.clash {
                sweep.clashing += 1;
            }
            if tracker.observe(score) {
                sweep.retained.push(previous.clone());
            }
        }
        Ok(sweep)
    }

    fn step_rotation(
        &self,
        axis: &DihedralAxis,
        positions: &[Point3<f64>],
    ) -> Result<(Point3<f64>, Rotation3<f64>), EngineError> {
        let [_, b, c, _] = axis.atoms;
        let origin = positions[c];
        let rotation = rotation_from_axis_angle(&(origin - positions[b]), self.config.step_degrees)
            .ok_or_else(|| {
                EngineError::DegenerateGeometry(format!(
                    "rotation axis {}-{} of residue '{}' collapsed",
                    self.atom_name(b),
                    self.atom_name(c),
                    self.residue_name
                ))
            })?;
        Ok((origin, rotation))
    }

    fn log_outcome(&self, outcome: &ScanOutcome) {
        let stats = &outcome.statistics;
        match outcome.best() {
            Some(best) => info!(
                "Scan of '{}' kept {} conformers ({} steps, {} clashing); best score {:.6} at dihedrals {:?}.",
                self.residue_name,
                outcome.conformers.len(),
                stats.scanned_steps,
                stats.clashing_steps,
                best.score,
                self.dihedrals(&best.positions)
                    .iter()
                    .map(|d| format!("{d:.1}"))
                    .collect::<Vec<_>>()
            ),
            None => info!(
                "Scan of '{}' found no clash-free conformer ({} steps, {} clashing).",
                self.residue_name, stats.scanned_steps, stats.clashing_steps
            ),
        }
    }
}

/// Moves `positions` to sweep step `step`. Step 0 sits one increment before `start`, step 1
/// is `start` itself and every later step adds one increment.
fn advance_to_step(
    step: usize,
    positions: &mut [Point3<f64>],
    start: &[Point3<f64>],
    mask: &[bool],
    origin: &Point3<f64>,
    rotation: &Rotation3<f64>,
) {
    match step {
        0 => rotate_masked(positions, mask, origin, &rotation.inverse()),
        1 => positions.copy_from_slice(start),
        _ => rotate_masked(positions, mask, origin, rotation),
    }
}

fn rotate_masked(
    positions: &mut [Point3<f64>],
    mask: &[bool],
    origin: &Point3<f64>,
    rotation: &Rotation3<f64>,
) {
    for (position, &mobile) in positions.iter_mut().zip(mask) {
        if mobile {
            *position = rotate_about_axis(position, origin, rotation);
        }
    }
}
