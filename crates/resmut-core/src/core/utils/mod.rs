//! Geometry and atom-name helpers shared by the engine and the mutation workflow.

pub mod geometry;
pub mod identifiers;
