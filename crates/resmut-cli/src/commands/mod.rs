pub mod check_config;
pub mod classify;
pub mod dihedrals;
pub mod params;
