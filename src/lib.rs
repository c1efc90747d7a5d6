//! Falling boxes, a floor, and a sinkhole that follows the pointer.
//!
//! Physics runs on rapier3d. The sinkhole is a kinematic cylinder sensor;
//! every tick it pulls the boxes inside it a little further down.

pub mod core;
pub mod engine;
pub mod game;
