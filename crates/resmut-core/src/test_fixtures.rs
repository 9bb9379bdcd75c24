//! Residue geometries built from internal coordinates, shared by the engine and workflow tests.

use crate::core::models::atom::{Atom, Element};
use crate::core::models::ids::{ChainId, ResidueId};
use crate::core::models::residue::ResidueState;
use crate::core::models::system::MolecularSystem;
use crate::core::models::template::{ResidueTemplate, TemplateAtom};
use crate::core::models::topology::BondOrder;
use nalgebra::{Isometry3, Point3, Vector3};
use std::collections::HashMap;

struct Placement {
    name: &'static str,
    element: Element,
    refs: [&'static str; 3],
    bond: f64,
    angle: f64,
    torsion: f64,
    ff_type: &'static str,
    charge: f64,
}

const fn p(
    name: &'static str,
    element: Element,
    refs: [&'static str; 3],
    geometry: (f64, f64, f64),
    ff_type: &'static str,
    charge: f64,
) -> Placement {
    Placement {
        name,
        element,
        refs,
        bond: geometry.0,
        angle: geometry.1,
        torsion: geometry.2,
        ff_type,
        charge,
    }
}

use Element::{C, H, N, O, S};

const BACKBONE_TAIL: &[Placement] = &[
    p("O", O, ["N", "CA", "C"], (1.229, 120.5, 180.0), "O", -0.57),
    p("H", H, ["C", "CA", "N"], (1.01, 119.0, 180.0), "H", 0.27),
];
const CB: Placement = p("CB", C, ["C", "N", "CA"], (1.53, 110.5, -122.5), "CT", -0.1);
const HA: Placement = p("HA", H, ["C", "N", "CA"], (1.09, 109.5, 118.0), "H1", 0.09);

fn side_chain(name: &str) -> Vec<Placement> {
    let hb = |n, torsion| p(n, H, ["N", "CA", "CB"], (1.09, 109.5, torsion), "HC", 0.05);
    match name {
        "ALA" => vec![CB, HA, hb("HB1", 60.0), hb("HB2", 180.0), hb("HB3", -60.0)],
        "GLY" => vec![
            p("HA2", H, ["C", "N", "CA"], (1.09, 109.5, -121.0), "H1", 0.07),
            p("HA3", H, ["C", "N", "CA"], (1.09, 109.5, 121.0), "H1", 0.07),
        ],
        "SER" => vec![
            CB,
            HA,
            p("OG", O, ["N", "CA", "CB"], (1.417, 110.8, -60.0), "OH", -0.65),
            hb("HB2", 60.0),
            hb("HB3", 180.0),
            p("HG", H, ["CA", "CB", "OG"], (0.96, 109.5, 180.0), "HO", 0.42),
        ],
        "CYS" => vec![
            CB,
            HA,
            p("SG", S, ["N", "CA", "CB"], (1.81, 114.0, -60.0), "SH", -0.31),
            hb("HB2", 60.0),
            hb("HB3", 180.0),
            p("HG", H, ["CA", "CB", "SG"], (1.34, 96.0, 180.0), "HS", 0.19),
        ],
        "TRP" => vec![
            CB,
            HA,
            hb("HB2", 60.0),
            hb("HB3", 180.0),
            p("CG", C, ["N", "CA", "CB"], (1.50, 114.1, -60.0), "C*", -0.14),
            p("CD1", C, ["CA", "CB", "CG"], (1.365, 126.9, 90.0), "CW", -0.16),
            p("CD2", C, ["CA", "CB", "CG"], (1.433, 126.6, -90.0), "CB", 0.12),
            p("NE1", N, ["CB", "CG", "CD1"], (1.374, 110.2, 180.0), "NA", -0.34),
            p("HE1", H, ["CG", "CD1", "NE1"], (1.01, 125.0, 180.0), "H", 0.34),
            p("CE2", C, ["CB", "CG", "CD2"], (1.409, 107.2, 180.0), "CN", 0.14),
            p("CE3", C, ["CB", "CG", "CD2"], (1.398, 133.9, 0.0), "CA", -0.24),
            p("CZ2", C, ["CG", "CD2", "CE2"], (1.394, 122.4, 180.0), "CA", -0.26),
            p("CZ3", C, ["CG", "CD2", "CE3"], (1.382, 118.7, 180.0), "CA", -0.2),
            p("CH2", C, ["CD2", "CE2", "CZ2"], (1.368, 117.5, 0.0), "CA", -0.11),
        ],
        "PRO" => vec![
            CB,
            HA,
            p("CG", C, ["N", "CA", "CB"], (1.50, 104.5, 30.0), "CT", 0.02),
            p("CD", C, ["CA", "CB", "CG"], (1.50, 105.0, -35.0), "CT", 0.02),
        ],
        other => panic!("no fixture geometry for {other}"),
    }
}

fn ring_closures(name: &str) -> &'static [(&'static str, &'static str)] {
    match name {
        "TRP" => &[("NE1", "CE2"), ("CZ3", "CH2")],
        "PRO" => &[("N", "CD")],
        _ => &[],
    }
}

/// Places an atom bonded to `c` with the given bond length, angle b-c-d and torsion a-b-c-d.
pub(crate) fn place_atom(
    a: &Point3<f64>,
    b: &Point3<f64>,
    c: &Point3<f64>,
    bond: f64,
    angle_degrees: f64,
    torsion_degrees: f64,
) -> Point3<f64> {
    let bc = (c - b).normalize();
    let n = (b - a).cross(&bc).normalize();
    let m = n.cross(&bc);
    let (angle, torsion) = (angle_degrees.to_radians(), torsion_degrees.to_radians());
    let d = Vector3::new(
        -bond * angle.cos(),
        bond * angle.sin() * torsion.cos(),
        bond * angle.sin() * torsion.sin(),
    );
    c + bc * d.x + m * d.y + n * d.z
}

/// Atoms of `name` in the standard frame (N at the origin, CA on +x, C in the xy plane),
/// with the index of the atom each one is bonded to.
fn build_atoms(name: &str) -> Vec<(TemplateAtom, Option<usize>)> {
    let n = Point3::origin();
    let ca = Point3::new(1.458, 0.0, 0.0);
    let angle = 111.0_f64.to_radians();
    let c = ca + Vector3::new(-angle.cos(), angle.sin(), 0.0) * 1.525;

    let mut atoms = vec![
        (
            TemplateAtom::new("N", N, n)
                .with_force_field_type("N")
                .with_partial_charge(-0.42),
            None,
        ),
        (
            TemplateAtom::new("CA", C, ca)
                .with_force_field_type("CT")
                .with_partial_charge(0.03),
            Some(0),
        ),
        (
            TemplateAtom::new("C", C, c)
                .with_force_field_type("C")
                .with_partial_charge(0.6),
            Some(1),
        ),
    ];

    let mut placements: Vec<&Placement> = BACKBONE_TAIL.iter().collect();
    let side = side_chain(name);
    placements.extend(side.iter());
    if name == "PRO" {
        placements.retain(|pl| pl.name != "H");
    }

    for pl in placements {
        let index = |n: &str| {
            atoms
                .iter()
                .position(|(a, _)| a.name == n)
                .unwrap_or_else(|| panic!("reference {n} not placed before {}", pl.name))
        };
        let [ia, ib, ic] = pl.refs.map(index);
        let position = place_atom(
            &atoms[ia].0.position,
            &atoms[ib].0.position,
            &atoms[ic].0.position,
            pl.bond,
            pl.angle,
            pl.torsion,
        );
        atoms.push((
            TemplateAtom::new(pl.name, pl.element, position)
                .with_force_field_type(pl.ff_type)
                .with_partial_charge(pl.charge),
            Some(ic),
        ));
    }
    atoms
}

pub(crate) fn template(name: &str) -> ResidueTemplate {
    let atoms = build_atoms(name);
    let mut template = ResidueTemplate::new(name, ResidueState::Standard);
    for (atom, _) in &atoms {
        template.add_atom(atom.clone());
    }
    for (atom, parent) in &atoms {
        if let Some(parent) = parent {
            template
                .add_bond(&atoms[*parent].0.name, &atom.name, BondOrder::Single)
                .unwrap();
        }
    }
    for (a, b) in ring_closures(name) {
        template.add_bond(a, b, BondOrder::Single).unwrap();
    }
    template
}

/// Adds residue `name` to the system with its standard geometry moved by `frame`.
pub(crate) fn add_residue(
    system: &mut MolecularSystem,
    chain_id: ChainId,
    number: isize,
    name: &str,
    frame: &Isometry3<f64>,
) -> ResidueId {
    let residue_id = system
        .add_residue(chain_id, number, name, ResidueState::Standard)
        .unwrap();
    let atoms = build_atoms(name);
    let mut ids = Vec::with_capacity(atoms.len());
    let mut by_name = HashMap::new();
    for (template_atom, _) in &atoms {
        let atom = Atom::new(
            &template_atom.name,
            template_atom.element,
            residue_id,
            frame * template_atom.position,
        )
        .with_force_field_type(&template_atom.force_field_type)
        .with_partial_charge(template_atom.partial_charge);
        let id = system.add_atom_to_residue(residue_id, atom).unwrap();
        by_name.insert(template_atom.name.clone(), id);
        ids.push(id);
    }
    for (i, (_, parent)) in atoms.iter().enumerate() {
        if let Some(parent) = parent {
            system.add_bond(ids[*parent], ids[i], BondOrder::Single).unwrap();
        }
    }
    for (a, b) in ring_closures(name) {
        system
            .add_bond(by_name[*a], by_name[*b], BondOrder::Single)
            .unwrap();
    }
    residue_id
}

/// Adds a single-oxygen water residue at `position`.
pub(crate) fn add_water(
    system: &mut MolecularSystem,
    chain_id: ChainId,
    number: isize,
    position: Point3<f64>,
) -> ResidueId {
    let residue_id = system
        .add_residue(chain_id, number, "HOH", ResidueState::Water)
        .unwrap();
    let oxygen = Atom::new("O", O, residue_id, position).with_force_field_type("OW");
    system.add_atom_to_residue(residue_id, oxygen).unwrap();
    residue_id
}

/// A rigid motion that is neither the identity nor axis-aligned.
pub(crate) fn skewed_frame() -> Isometry3<f64> {
    Isometry3::new(Vector3::new(3.0, -2.0, 5.0), Vector3::new(0.3, 1.1, -0.4))
}

pub(crate) fn position_of(
    system: &MolecularSystem,
    residue_id: ResidueId,
    atom_name: &str,
) -> Point3<f64> {
    system
        .residue_atom(residue_id, atom_name)
        .map(|(_, atom)| atom.position)
        .unwrap_or_else(|| panic!("atom {atom_name} missing"))
}
