use super::ids::AtomId;
use serde::Deserialize;
use std::fmt;

/// Bond order as reported by a [`BondClassifier`](crate::core::topology::bonding::BondClassifier).
///
/// Variants are ordered from the longest to the shortest typical bond length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BondOrder {
    #[default]
    Single,
    Aromatic,
    Double,
    Triple,
}

impl BondOrder {
    pub const ALL: [BondOrder; 4] = [
        BondOrder::Single,
        BondOrder::Aromatic,
        BondOrder::Double,
        BondOrder::Triple,
    ];
}

impl fmt::Display for BondOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Single => "Single",
                Self::Aromatic => "Aromatic",
                Self::Double => "Double",
                Self::Triple => "Triple",
            }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bond {
    pub atom1_id: AtomId,
    pub atom2_id: AtomId,
    pub order: BondOrder,
}

impl Bond {
    pub fn new(atom1_id: AtomId, atom2_id: AtomId, order: BondOrder) -> Self {
        Self {
            atom1_id,
            atom2_id,
            order,
        }
    }

    pub fn contains(&self, atom_id: AtomId) -> bool {
        self.atom1_id == atom_id || self.atom2_id == atom_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::KeyData;

    fn dummy_atom_id(n: u64) -> AtomId {
        AtomId::from(KeyData::from_ffi(n))
    }

    #[test]
    fn bond_order_deserializes_from_lowercase_names() {
        #[derive(Deserialize)]
        struct Wrapper {
            order: BondOrder,
        }
        let parsed: Wrapper = toml::from_str("order = \"aromatic\"").unwrap();
        assert_eq!(parsed.order, BondOrder::Aromatic);
    }

    #[test]
    fn bond_contains_both_ends_only() {
        let a1 = dummy_atom_id(10);
        let a2 = dummy_atom_id(20);
        let bond = Bond::new(a1, a2, BondOrder::Single);
        assert!(bond.contains(a1));
        assert!(bond.contains(a2));
        assert!(!bond.contains(dummy_atom_id(30)));
    }
}
