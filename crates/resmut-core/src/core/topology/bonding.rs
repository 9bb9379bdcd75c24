use crate::core::models::atom::{Element, ParseElementError};
use crate::core::models::topology::BondOrder;
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Extra distance (Å) added to the longest known bond length of a pair.
pub const DEFAULT_BOND_LEEWAY: f64 = 0.1;

/// Classifies an atom pair as bonded (with an order) or non-bonded from its distance.
///
/// The same classifier is used to build connectivity and to detect steric clashes, so a
/// pair the classifier would bond is, by definition, too close to be a non-bonded contact.
pub trait BondClassifier: Send + Sync {
    fn classify(&self, a: Element, b: Element, distance_squared: f64) -> Option<BondOrder>;
}

/// Squared distance thresholds for one element pair, indexed like [`BondOrder::ALL`].
///
/// A pair at squared distance `d2` has the order of the last index whose threshold it
/// does not exceed; exceeding the first threshold means no bond.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BondThresholds {
    squared: [f64; 4],
}

impl BondThresholds {
    /// Builds thresholds from ideal bond lengths (longest order first).
    ///
    /// The longest defined length gets `leeway` added. Every shorter defined order starts
    /// halfway between its own length and the next longer defined one. Undefined orders
    /// inherit the threshold of the next shorter order so they can never be selected.
    /// Returns `None` if no length is defined.
    pub fn from_lengths(lengths: [Option<f64>; 4], leeway: f64) -> Option<Self> {
        let first = lengths.iter().position(Option::is_some)?;
        let mut thresholds = [0.0_f64; 4];
        let mut longer: Option<f64> = None;

        for (i, length) in lengths.iter().enumerate() {
            if let Some(length) = *length {
                thresholds[i] = match longer {
                    _ if i == first => length + leeway,
                    Some(previous) => (length + previous) / 2.0,
                    None => length,
                };
                longer = Some(length);
            }
        }
        for i in (0..3).rev() {
            if lengths[i].is_none() {
                thresholds[i] = thresholds[i + 1];
            }
        }

        Some(Self {
            squared: thresholds.map(|t| t * t),
        })
    }

    /// The largest distance still classified as bonded.
    pub fn bonded_cutoff(&self) -> f64 {
        self.squared[0].sqrt()
    }

    pub fn classify(&self, distance_squared: f64) -> Option<BondOrder> {
        if distance_squared > self.squared[0] {
            return None;
        }
        BondOrder::ALL
            .iter()
            .zip(self.squared.iter().skip(1).chain(std::iter::once(&f64::NEG_INFINITY)))
            .find(|(_, next)| distance_squared > **next)
            .map(|(order, _)| *order)
    }
}

#[derive(Debug, Error)]
pub enum BondTableError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error(transparent)]
    UnknownElement(#[from] ParseElementError),
    #[error("Bond entry {a}-{b} defines no bond length")]
    EmptyPair { a: Element, b: Element },
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct BondTableFile {
    leeway: Option<f64>,
    #[serde(default)]
    pair: Vec<BondPairEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct BondPairEntry {
    elements: [String; 2],
    single: Option<f64>,
    aromatic: Option<f64>,
    double: Option<f64>,
    triple: Option<f64>,
}

// Ideal lengths (Å) as [single, aromatic, double, triple].
const STANDARD_BOND_LENGTHS: &[(Element, Element, [Option<f64>; 4])] = &[
    (Element::C, Element::C, [Some(1.54), Some(1.40), Some(1.34), Some(1.20)]),
    (Element::C, Element::N, [Some(1.47), Some(1.34), Some(1.28), Some(1.16)]),
    (Element::C, Element::O, [Some(1.43), None, Some(1.23), Some(1.13)]),
    (Element::C, Element::S, [Some(1.82), None, Some(1.60), None]),
    (Element::C, Element::H, [Some(1.09), None, None, None]),
    (Element::C, Element::F, [Some(1.35), None, None, None]),
    (Element::C, Element::Cl, [Some(1.77), None, None, None]),
    (Element::C, Element::Se, [Some(1.95), None, None, None]),
    (Element::C, Element::P, [Some(1.84), None, None, None]),
    (Element::N, Element::N, [Some(1.45), Some(1.35), Some(1.25), Some(1.10)]),
    (Element::N, Element::O, [Some(1.40), None, Some(1.21), None]),
    (Element::N, Element::H, [Some(1.01), None, None, None]),
    (Element::N, Element::S, [Some(1.68), None, None, None]),
    (Element::O, Element::O, [Some(1.48), None, Some(1.21), None]),
    (Element::O, Element::H, [Some(0.96), None, None, None]),
    (Element::O, Element::S, [Some(1.57), None, Some(1.43), None]),
    (Element::O, Element::P, [Some(1.61), None, Some(1.48), None]),
    (Element::S, Element::S, [Some(2.05), None, None, None]),
    (Element::S, Element::H, [Some(1.34), None, None, None]),
    (Element::Se, Element::Se, [Some(2.32), None, None, None]),
    (Element::Se, Element::H, [Some(1.46), None, None, None]),
    (Element::P, Element::H, [Some(1.42), None, None, None]),
    (Element::H, Element::H, [Some(0.74), None, None, None]),
];

static BUILTIN: Lazy<BondDistanceTable> =
    Lazy::new(|| BondDistanceTable::from_lengths(STANDARD_BOND_LENGTHS, DEFAULT_BOND_LEEWAY));

/// Distance-based [`BondClassifier`] over a per-element-pair table of bond lengths.
///
/// Pairs missing from the table are never bonded.
#[derive(Debug, Clone, Default)]
pub struct BondDistanceTable {
    pairs: HashMap<(Element, Element), BondThresholds>,
}

fn pair_key(a: Element, b: Element) -> (Element, Element) {
    if a <= b { (a, b) } else { (b, a) }
}

impl BondDistanceTable {
    /// Table of common organic and protein bonds with the default leeway.
    pub fn builtin() -> &'static BondDistanceTable {
        &BUILTIN
    }

    fn from_lengths(entries: &[(Element, Element, [Option<f64>; 4])], leeway: f64) -> Self {
        let pairs = entries
            .iter()
            .filter_map(|&(a, b, lengths)| {
                BondThresholds::from_lengths(lengths, leeway).map(|t| (pair_key(a, b), t))
            })
            .collect();
        Self { pairs }
    }

    pub fn load(path: &Path) -> Result<Self, BondTableError> {
        let content = std::fs::read_to_string(path).map_err(|e| BondTableError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        let file: BondTableFile = toml::from_str(&content).map_err(|e| BondTableError::Toml {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;

        let leeway = file.leeway.unwrap_or(DEFAULT_BOND_LEEWAY);
        let mut pairs = HashMap::with_capacity(file.pair.len());
        for entry in file.pair {
            let a: Element = entry.elements[0].parse()?;
            let b: Element = entry.elements[1].parse()?;
            let lengths = [entry.single, entry.aromatic, entry.double, entry.triple];
            let thresholds = BondThresholds::from_lengths(lengths, leeway)
                .ok_or(BondTableError::EmptyPair { a, b })?;
            pairs.insert(pair_key(a, b), thresholds);
        }
        Ok(Self { pairs })
    }

    pub fn thresholds(&self, a: Element, b: Element) -> Option<&BondThresholds> {
        self.pairs.get(&pair_key(a, b))
    }
}

impl BondClassifier for BondDistanceTable {
    fn classify(&self, a: Element, b: Element, distance_squared: f64) -> Option<BondOrder> {
        self.thresholds(a, b)?.classify(distance_squared)
    }
}
