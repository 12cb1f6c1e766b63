//! Repograph - interactive 3D repository activity graph
//!
//! Files are nodes sized and colored by activity, connected when they change
//! together, laid out by a force simulation or ranked by length.

pub mod cli;
pub mod config;
pub mod error;
pub mod git;
pub mod models;
pub mod visualization;
