//! # Force Field Module
//!
//! Non-bonded parameters and the pair potentials used to score side-chain conformations.
//!
//! ## Key Components
//!
//! - [`params`] - The van der Waals parameter table, its TOML loader and the process-wide
//!   built-in defaults used when a system carries no parameters of its own.
//! - [`potentials`] - The AMBER 12-6 van der Waals term and the squared-distance
//!   electrostatic term, both evaluated directly on squared distances.
//!
//! ```ignore
//! use resmut::core::forcefield::params::Forcefield;
//!
//! let ff = Forcefield::builtin();
//! let ct = ff.resolve_vdw("CT", Element::C);
//! ```

pub mod params;
pub mod potentials;
