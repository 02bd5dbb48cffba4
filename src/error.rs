//! Centralized error types for the simulation engine.
//!
//! This module defines all error types used throughout the crate,
//! providing a consistent error handling approach.

use bevy_ecs::event::Event;
use glam::IVec2;

/// Main error type for the simulation.
///
/// This is the primary error type that should be used in public APIs.
/// It can represent any error that can occur while building or running a level.
#[derive(thiserror::Error, Debug, Event)]
pub enum GameError {
    #[error("Map parsing error: {0}")]
    MapParse(#[from] ParseError),

    #[error("Map error: {0}")]
    Map(#[from] MapError),

    #[error("Ghost error: {0}")]
    Ghost(#[from] GhostError),

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

/// Error type for board parsing operations.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unknown character in board: {0:?}")]
    UnknownCharacter(char),
    #[error("Board row {row} has {found} columns, expected {expected}")]
    RaggedRow { row: usize, expected: usize, found: usize },
    #[error("Board is empty")]
    EmptyBoard,
}

/// Errors related to the world map and its landmarks.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum MapError {
    #[error("Missing required landmark: {0}")]
    MissingLandmark(&'static str),

    #[error("Landmark {name} at {tile} lies outside the map")]
    LandmarkOutOfBounds { name: &'static str, tile: IVec2 },

    #[error("Invalid map configuration: {0}")]
    InvalidConfig(String),
}

/// Errors related to ghost identity and state.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum GhostError {
    #[error("Invalid ghost id: {0}")]
    InvalidId(u8),

    #[error("Invalid ghost state: {0}")]
    InvalidState(u8),
}

/// Result type for simulation operations.
pub type GameResult<T> = Result<T, GameError>;
