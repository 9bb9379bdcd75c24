//! # Engine Module
//!
//! The clash-avoiding side-chain search.
//!
//! ## Overview
//!
//! A residue and its surroundings are snapshotted into clash groups
//! ([`clash_group`]). The [`scoring`] module turns a set of positions into an energy or a
//! clash, and the [`scanner`] sweeps each rotatable torsion in turn, carrying only the local
//! minima of one torsion into the sweep of the next.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Scan step, range and cutoff, context radius and search method
//! - **Shared Tables** ([`context`]) - Topology, bond classifier and parameter resolution
//! - **Progress Monitoring** ([`progress`]) - Progress events and cooperative cancellation
//! - **Error Handling** ([`error`]) - Engine-specific error types and error propagation

pub mod clash_group;
pub mod config;
pub mod context;
pub mod error;
pub mod progress;
pub mod scanner;
pub mod scoring;
