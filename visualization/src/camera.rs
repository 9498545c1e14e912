//! Camera placement per step
//!
//! Steps showing spatial structures (trees, graphs, linked lists) orbit the
//! camera around the scene as the step index advances; everything else is
//! viewed from the resting position.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use glam::Vec3;

use algolens_core::trace::Step;

pub const RESTING_POSITION: Vec3 = Vec3::new(0.0, 0.0, 10.0);

const ORBIT_RADIUS: f32 = 15.0;

/// Point on the orbit path for step `index`
pub fn orbit_position(index: usize) -> Vec3 {
    let i = index as f32;
    Vec3::new(
        (i * 0.5).sin() * ORBIT_RADIUS,
        (i * 0.3).cos() * 5.0 + 5.0,
        (i * 0.5).cos() * ORBIT_RADIUS,
    )
}

/// Camera position for showing `step` at `index`
pub fn camera_position(step: &Step, index: usize) -> Vec3 {
    if step.visual_elements.iter().any(|e| e.is_spatial()) {
        orbit_position(index)
    } else {
        RESTING_POSITION
    }
}
