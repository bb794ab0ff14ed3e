//! UI module

pub mod crosshair;
pub mod inventory;
pub mod styles;

pub use crosshair::CrosshairPlugin;
pub use inventory::{toggle_inventory, InventoryOpen, InventoryPlugin};
