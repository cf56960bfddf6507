//! Optional extensions to the base camera controller.

pub mod terrain_avoidance;
pub mod tether;
pub mod viewpoint;
