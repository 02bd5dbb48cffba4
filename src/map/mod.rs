//! The tile-grid world: board parsing, geometry, terrain queries and the food layer.

pub mod direction;
pub mod food;
pub mod parser;
pub mod tile;
pub mod world;
