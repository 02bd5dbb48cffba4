//! The Entity-Component-System (ECS) module.
//!
//! Components and resources of the simulation, together with the systems that the
//! game's schedule runs once per tick.

pub mod blinking;
pub mod bonus;
pub mod collision;
pub mod food;
pub mod gate;
pub mod ghost;
pub mod hunting;
pub mod level;
pub mod movement;
pub mod player;
pub mod power;
pub mod score;
pub mod stage;
pub mod state;
pub mod steering;
