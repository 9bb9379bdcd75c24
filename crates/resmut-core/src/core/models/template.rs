use super::atom::Element;
use super::residue::ResidueState;
use super::topology::BondOrder;
use nalgebra::{Point3, Rotation3, Vector3};

#[derive(Debug, Clone, PartialEq)]
pub struct TemplateAtom {
    pub name: String,
    pub element: Element,
    pub position: Point3<f64>,
    pub partial_charge: f64,
    pub force_field_type: String,
}

impl TemplateAtom {
    pub fn new(name: &str, element: Element, position: Point3<f64>) -> Self {
        Self {
            name: name.to_string(),
            element,
            position,
            partial_charge: 0.0,
            force_field_type: String::new(),
        }
    }

    pub fn with_force_field_type(mut self, force_field_type: &str) -> Self {
        self.force_field_type = force_field_type.to_string();
        self
    }

    pub fn with_partial_charge(mut self, charge: f64) -> Self {
        self.partial_charge = charge;
        self
    }
}

/// A replacement residue in its own coordinate frame.
///
/// Templates are owned by the caller; mutation works on an aligned clone.
#[derive(Debug, Clone, PartialEq)]
pub struct ResidueTemplate {
    pub name: String,
    pub state: ResidueState,
    atoms: Vec<TemplateAtom>,
    bonds: Vec<(usize, usize, BondOrder)>,
}

impl ResidueTemplate {
    pub fn new(name: &str, state: ResidueState) -> Self {
        Self {
            name: name.to_string(),
            state,
            atoms: Vec::new(),
            bonds: Vec::new(),
        }
    }

    /// Appends an atom and returns its index. A duplicate name replaces nothing; lookups
    /// by name return the first atom.
    pub fn add_atom(&mut self, atom: TemplateAtom) -> usize {
        self.atoms.push(atom);
        self.atoms.len() - 1
    }

    /// Records an internal bond between two named atoms. Returns `None` if either is absent.
    pub fn add_bond(&mut self, name1: &str, name2: &str, order: BondOrder) -> Option<()> {
        let i = self.index_of(name1)?;
        let j = self.index_of(name2)?;
        if i == j {
            return None;
        }
        if !self
            .bonds
            .iter()
            .any(|&(a, b, _)| (a, b) == (i, j) || (a, b) == (j, i))
        {
            self.bonds.push((i, j, order));
        }
        Some(())
    }

    pub fn atoms(&self) -> &[TemplateAtom] {
        &self.atoms
    }

    pub fn bonds(&self) -> &[(usize, usize, BondOrder)] {
        &self.bonds
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.atoms.iter().position(|atom| atom.name == name)
    }

    pub fn atom(&self, name: &str) -> Option<&TemplateAtom> {
        self.index_of(name).map(|i| &self.atoms[i])
    }

    pub fn translate(&mut self, offset: &Vector3<f64>) {
        for atom in &mut self.atoms {
            atom.position += offset;
        }
    }

    /// Rotates every atom about an axis through `origin`.
    pub fn rotate_about(&mut self, origin: &Point3<f64>, rotation: &Rotation3<f64>) {
        for atom in &mut self.atoms {
            atom.position = origin + rotation * (atom.position - origin);
        }
    }
}
