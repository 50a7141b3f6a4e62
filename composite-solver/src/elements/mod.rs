//! Materials, plies and laminate stacks

mod layup;
mod material;
mod ply;
mod stack;

pub use layup::LayupSequence;
pub use material::{MaterialProperties, ThroughThickness};
pub use ply::PlyDefinition;
pub use stack::{LaminateStack, MaterialTable, MAX_PLIES};
