#![cfg_attr(target_arch = "spirv", no_std)]

pub mod color_deterministic;
pub mod color_monte_carlo;
pub mod frame_composition;
pub mod surface_attributes;
