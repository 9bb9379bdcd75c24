use crate::core::models::atom::Element;
use once_cell::sync::Lazy;
use phf::{Map, phf_map};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Well depth (kcal/mol) used when neither an atom's type nor its element has parameters.
pub const DEFAULT_WELL_DEPTH: f64 = 0.1;
/// Radius (Å) used when neither an atom's type nor its element has parameters.
pub const DEFAULT_RADIUS: f64 = 2.0;

/// Van der Waals parameters of one force-field type.
///
/// `radius` is the like-pair equilibrium distance in Angstroms and `well_depth` is in
/// kcal/mol.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct VdwParam {
    pub radius: f64,
    pub well_depth: f64,
}

impl VdwParam {
    pub const DEFAULT: VdwParam = VdwParam {
        radius: DEFAULT_RADIUS,
        well_depth: DEFAULT_WELL_DEPTH,
    };
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct GlobalParams {
    #[serde(default = "default_dielectric")]
    pub dielectric_constant: f64,
}

impl Default for GlobalParams {
    fn default() -> Self {
        Self {
            dielectric_constant: default_dielectric(),
        }
    }
}

fn default_dielectric() -> f64 {
    1.0
}

/// Where a resolved set of van der Waals parameters came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamSource {
    /// The atom's own force-field type.
    Type,
    /// The element symbol used as a fallback type.
    Element,
    /// Neither was present; [`VdwParam::DEFAULT`] was used.
    Default,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VdwResolution {
    pub param: VdwParam,
    pub source: ParamSource,
}

/// Non-bonded parameter table.
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct Forcefield {
    #[serde(default)]
    pub globals: GlobalParams,
    #[serde(default)]
    pub vdw: HashMap<String, VdwParam>,
}

#[derive(Debug, Error)]
pub enum ParamLoadError {
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
}

// AMBER parm99 van der Waals set, radius given as 2 * R*.
static BUILTIN_VDW: Map<&'static str, (f64, f64)> = phf_map! {
    "C" => (3.8160, 0.0860), "CA" => (3.8160, 0.0860), "CB" => (3.8160, 0.0860),
    "CC" => (3.8160, 0.0860), "CN" => (3.8160, 0.0860), "CR" => (3.8160, 0.0860),
    "CV" => (3.8160, 0.0860), "CW" => (3.8160, 0.0860), "C*" => (3.8160, 0.0860),
    "CT" => (3.8160, 0.1094),
    "N" => (3.6480, 0.1700), "NA" => (3.6480, 0.1700), "NB" => (3.6480, 0.1700),
    "N2" => (3.6480, 0.1700), "N3" => (3.7500, 0.1700),
    "O" => (3.3224, 0.2100), "O2" => (3.3224, 0.2100), "OH" => (3.4420, 0.2104),
    "OW" => (3.5366, 0.1520),
    "S" => (4.0000, 0.2500), "SH" => (4.0000, 0.2500),
    "P" => (4.2000, 0.2000), "F" => (3.5000, 0.0610), "Cl" => (3.8960, 0.2650),
    "H" => (1.2000, 0.0157), "HO" => (0.0000, 0.0000), "HW" => (0.0000, 0.0000),
    "HS" => (1.2000, 0.0157), "HC" => (2.9740, 0.0157), "H1" => (2.7740, 0.0157),
    "HP" => (2.2000, 0.0157), "HA" => (2.9180, 0.0150), "H4" => (2.8180, 0.0150),
    "H5" => (2.7180, 0.0150),
    "Na" => (3.7360, 0.00277), "K" => (5.3160, 0.000328), "Mg" => (1.5852, 0.8947),
    "Zn" => (2.2000, 0.0125),
};

static BUILTIN: Lazy<Forcefield> = Lazy::new(|| Forcefield {
    globals: GlobalParams::default(),
    vdw: BUILTIN_VDW
        .entries()
        .map(|(name, &(radius, well_depth))| (name.to_string(), VdwParam { radius, well_depth }))
        .collect(),
});

impl Forcefield {
    /// The process-wide default table, used when a system carries no parameters.
    pub fn builtin() -> &'static Forcefield {
        &BUILTIN
    }

    pub fn load(path: &Path) -> Result<Self, ParamLoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| ParamLoadError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ParamLoadError::Toml {
            path: path.to_string_lossy().to_string(),
            source: e,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.vdw.is_empty()
    }

    pub fn dielectric_constant(&self) -> f64 {
        self.globals.dielectric_constant
    }

    pub fn vdw(&self, force_field_type: &str) -> Option<&VdwParam> {
        self.vdw.get(force_field_type)
    }

    /// Resolves parameters for an atom: its type first, then its element symbol, then
    /// [`VdwParam::DEFAULT`].
    pub fn resolve_vdw(&self, force_field_type: &str, element: Element) -> VdwResolution {
        if let Some(param) = self.vdw(force_field_type) {
            return VdwResolution {
                param: *param,
                source: ParamSource::Type,
            };
        }
        if let Some(param) = self.vdw(element.symbol()) {
            return VdwResolution {
                param: *param,
                source: ParamSource::Element,
            };
        }
        VdwResolution {
            param: VdwParam::DEFAULT,
            source: ParamSource::Default,
        }
    }
}
