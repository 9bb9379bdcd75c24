use super::ids::ResidueId;
use nalgebra::Point3;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Chemical element of an atom.
///
/// Only the elements that occur in proteins, common cofactors and crystallisation
/// additives are enumerated; [`Element::Unknown`] stands in for anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Element {
    H,
    C,
    N,
    O,
    F,
    P,
    S,
    Cl,
    Se,
    Br,
    I,
    Na,
    K,
    Mg,
    Ca,
    Mn,
    Fe,
    Zn,
    #[default]
    Unknown,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown element symbol '{0}'")]
pub struct ParseElementError(pub String);

impl Element {
    /// The IUPAC symbol, with the canonical capitalisation (`"Cl"`, `"Se"`).
    pub fn symbol(&self) -> &'static str {
        match self {
            Element::H => "H",
            Element::C => "C",
            Element::N => "N",
            Element::O => "O",
            Element::F => "F",
            Element::P => "P",
            Element::S => "S",
            Element::Cl => "Cl",
            Element::Se => "Se",
            Element::Br => "Br",
            Element::I => "I",
            Element::Na => "Na",
            Element::K => "K",
            Element::Mg => "Mg",
            Element::Ca => "Ca",
            Element::Mn => "Mn",
            Element::Fe => "Fe",
            Element::Zn => "Zn",
            Element::Unknown => "X",
        }
    }

    pub fn is_hydrogen(&self) -> bool {
        matches!(self, Element::H)
    }
}

impl FromStr for Element {
    type Err = ParseElementError;

    /// Case-insensitive symbol parsing (`"CL"`, `"cl"` and `"Cl"` are all chlorine).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "H" | "D" => Ok(Element::H),
            "C" => Ok(Element::C),
            "N" => Ok(Element::N),
            "O" => Ok(Element::O),
            "F" => Ok(Element::F),
            "P" => Ok(Element::P),
            "S" => Ok(Element::S),
            "CL" => Ok(Element::Cl),
            "SE" => Ok(Element::Se),
            "BR" => Ok(Element::Br),
            "I" => Ok(Element::I),
            "NA" => Ok(Element::Na),
            "K" => Ok(Element::K),
            "MG" => Ok(Element::Mg),
            "CA" => Ok(Element::Ca),
            "MN" => Ok(Element::Mn),
            "FE" => Ok(Element::Fe),
            "ZN" => Ok(Element::Zn),
            _ => Err(ParseElementError(s.to_string())),
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// An atom of a [`MolecularSystem`](super::system::MolecularSystem).
///
/// Positions are in Angstroms, charges in elementary charge units. The force field type
/// is the label used to look up non-bonded parameters (e.g. `"CT"`, `"HC"`).
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// The name of the atom (e.g., "CA", "CB", "HG21").
    pub name: String,
    pub element: Element,
    /// The ID of the parent residue this atom belongs to.
    pub residue_id: ResidueId,
    pub force_field_type: String,
    pub partial_charge: f64,
    pub position: Point3<f64>,
}

impl Atom {
    /// Creates an uncharged, untyped atom.
    pub fn new(name: &str, element: Element, residue_id: ResidueId, position: Point3<f64>) -> Self {
        Self {
            name: name.to_string(),
            element,
            residue_id,
            force_field_type: String::new(),
            partial_charge: 0.0,
            position,
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

    /// `true` when every coordinate is finite.
    pub fn has_valid_position(&self) -> bool {
        self.position.coords.iter().all(|c| c.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_atom_has_expected_default_fields() {
        let residue_id = ResidueId::default();
        let atom = Atom::new("CA", Element::C, residue_id, Point3::new(1.0, 2.0, 3.0));

        assert_eq!(atom.name, "CA");
        assert_eq!(atom.element, Element::C);
        assert_eq!(atom.residue_id, residue_id);
        assert_eq!(atom.position, Point3::new(1.0, 2.0, 3.0));
        assert_eq!(atom.force_field_type, "");
        assert_eq!(atom.partial_charge, 0.0);
    }

    #[test]
    fn builder_style_setters_fill_in_parameters() {
        let atom = Atom::new("OG", Element::O, ResidueId::default(), Point3::origin())
            .with_force_field_type("OH")
            .with_partial_charge(-0.65);
        assert_eq!(atom.force_field_type, "OH");
        assert_eq!(atom.partial_charge, -0.65);
    }

    #[test]
    fn nan_coordinates_are_not_a_valid_position() {
        let mut atom = Atom::new("C", Element::C, ResidueId::default(), Point3::origin());
        assert!(atom.has_valid_position());
        atom.position.y = f64::NAN;
        assert!(!atom.has_valid_position());
        atom.position.y = f64::INFINITY;
        assert!(!atom.has_valid_position());
    }

    #[test]
    fn from_str_parses_symbols_case_insensitively() {
        assert_eq!(Element::from_str("c"), Ok(Element::C));
        assert_eq!(Element::from_str("CL"), Ok(Element::Cl));
        assert_eq!(Element::from_str("Se"), Ok(Element::Se));
        assert_eq!(Element::from_str(" zn "), Ok(Element::Zn));
        assert_eq!(Element::from_str("D"), Ok(Element::H));
    }

    #[test]
    fn from_str_returns_err_for_unknown_symbol() {
        assert_eq!(
            Element::from_str("Xx"),
            Err(ParseElementError("Xx".to_string()))
        );
    }

    #[test]
    fn display_uses_canonical_symbol() {
        assert_eq!(Element::Cl.to_string(), "Cl");
        assert_eq!(Element::N.to_string(), "N");
        assert!(Element::H.is_hydrogen());
        assert!(!Element::C.is_hydrogen());
    }
}
