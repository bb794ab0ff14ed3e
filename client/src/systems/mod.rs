//! Client-side game systems

mod player;
mod world;

pub use player::*;
pub use world::*;
