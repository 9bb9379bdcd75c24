use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// Identifies a residue by chain letter and sequence number, written `A:42`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResidueSpecifier {
    pub chain_id: char,
    pub residue_number: isize,
}

impl ResidueSpecifier {
    pub fn new(chain_id: char, residue_number: isize) -> Self {
        Self {
            chain_id,
            residue_number,
        }
    }
}

impl fmt::Display for ResidueSpecifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.chain_id, self.residue_number)
    }
}

impl FromStr for ResidueSpecifier {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (chain, number) = s
            .trim()
            .split_once(':')
            .ok_or(ConfigError::MissingParameter("residue_number"))?;
        let mut chars = chain.chars();
        let chain_id = match (chars.next(), chars.next()) {
            (Some(c), None) => c,
            _ => {
                return Err(ConfigError::InvalidParameter {
                    name: "chain_id",
                    reason: format!("expected a single character, got '{chain}'"),
                });
            }
        };
        let residue_number = number
            .parse()
            .map_err(|_| ConfigError::InvalidParameter {
                name: "residue_number",
                reason: format!("'{number}' is not an integer"),
            })?;
        Ok(Self::new(chain_id, residue_number))
    }
}

/// How the rotatable side-chain torsions are searched after replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OptimizationMethod {
    /// Replace the side chain only.
    None,
    /// Pruned search that carries local minima of each torsion forward.
    #[default]
    Tree,
    /// Every combination of torsion steps, pruning only on clashes.
    BruteForce,
    /// Tree search, falling back to brute force when it finds nothing.
    TreeThenBruteForce,
}

impl FromStr for OptimizationMethod {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "none" => Ok(Self::None),
            "tree" => Ok(Self::Tree),
            "brute-force" => Ok(Self::BruteForce),
            "tree-then-brute-force" => Ok(Self::TreeThenBruteForce),
            other => Err(ConfigError::InvalidParameter {
                name: "method",
                reason: format!("unknown optimization method '{other}'"),
            }),
        }
    }
}

impl fmt::Display for OptimizationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "none",
            Self::Tree => "tree",
            Self::BruteForce => "brute-force",
            Self::TreeThenBruteForce => "tree-then-brute-force",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanConfig {
    /// Rotation increment between consecutive sweep positions, in degrees.
    pub step_degrees: f64,
    /// Total angle swept per torsion, in degrees.
    pub range_degrees: f64,
    /// Context pairs farther apart than this (Å) contribute no energy.
    pub nonbonded_cutoff: f64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            step_degrees: 20.0,
            range_degrees: 360.0,
            nonbonded_cutoff: 15.0,
        }
    }
}

impl ScanConfig {
    /// Number of sampled positions per sweep. The first sits one increment before the
    /// unrotated geometry, the second is the unrotated geometry.
    pub fn steps(&self) -> usize {
        (self.range_degrees / self.step_degrees).floor() as usize + 1
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.step_degrees > 0.0) || !self.step_degrees.is_finite() {
            return Err(ConfigError::InvalidParameter {
                name: "step_degrees",
                reason: format!("must be positive, got {}", self.step_degrees),
            });
        }
        if !(self.range_degrees >= self.step_degrees) || !self.range_degrees.is_finite() {
            return Err(ConfigError::InvalidParameter {
                name: "range_degrees",
                reason: format!(
                    "must be at least the step ({}), got {}",
                    self.step_degrees, self.range_degrees
                ),
            });
        }
        if !(self.nonbonded_cutoff >= 0.0) {
            return Err(ConfigError::InvalidParameter {
                name: "nonbonded_cutoff",
                reason: format!("must not be negative, got {}", self.nonbonded_cutoff),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MutationConfig {
    pub scan: ScanConfig,
    /// Residues whose centroid lies within this distance (Å) of the mutated residue's
    /// centroid form the static context of the scan.
    pub context_radius: f64,
    pub method: OptimizationMethod,
}

impl Default for MutationConfig {
    fn default() -> Self {
        Self {
            scan: ScanConfig::default(),
            context_radius: 8.0,
            method: OptimizationMethod::default(),
        }
    }
}

#[derive(Default)]
pub struct MutationConfigBuilder {
    step_degrees: Option<f64>,
    range_degrees: Option<f64>,
    nonbonded_cutoff: Option<f64>,
    context_radius: Option<f64>,
    method: Option<OptimizationMethod>,
}

impl MutationConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step_degrees(mut self, degrees: f64) -> Self {
        self.step_degrees = Some(degrees);
        self
    }
    pub fn range_degrees(mut self, degrees: f64) -> Self {
        self.range_degrees = Some(degrees);
        self
    }
    pub fn nonbonded_cutoff(mut self, cutoff: f64) -> Self {
        self.nonbonded_cutoff = Some(cutoff);
        self
    }
    pub fn context_radius(mut self, radius: f64) -> Self {
        self.context_radius = Some(radius);
        self
    }
    pub fn method(mut self, method: OptimizationMethod) -> Self {
        self.method = Some(method);
        self
    }

    pub fn build(self) -> Result<MutationConfig, ConfigError> {
        let defaults = MutationConfig::default();
        let scan = ScanConfig {
            step_degrees: self.step_degrees.unwrap_or(defaults.scan.step_degrees),
            range_degrees: self.range_degrees.unwrap_or(defaults.scan.range_degrees),
            nonbonded_cutoff: self
                .nonbonded_cutoff
                .unwrap_or(defaults.scan.nonbonded_cutoff),
        };
        scan.validate()?;

        let context_radius = self.context_radius.unwrap_or(defaults.context_radius);
        if !(context_radius >= 0.0) {
            return Err(ConfigError::InvalidParameter {
                name: "context_radius",
                reason: format!("must not be negative, got {context_radius}"),
            });
        }

        Ok(MutationConfig {
            scan,
            context_radius,
            method: self.method.unwrap_or(defaults.method),
        })
    }
}
