//! Deterministic, tick-based simulation engine for Pac-Man and Ms. Pac-Man.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

#[cfg_attr(coverage_nightly, coverage(off))]
pub mod error;
#[cfg_attr(coverage_nightly, coverage(off))]
pub mod events;
#[cfg_attr(coverage_nightly, coverage(off))]
pub mod formatter;

pub mod config;
pub mod constants;
pub mod game;
pub mod map;
pub mod systems;
pub mod timer;
pub mod variant;
