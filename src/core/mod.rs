// Shared math helpers

pub mod math;
