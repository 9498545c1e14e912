//! Call stack layout: frames stacked top to bottom, current frame marked
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use glam::Vec3;

use algolens_core::trace::{display_value, RecursionElement};

use crate::scene::{palette, Anchor, SceneFragment, SceneNode, Shape};

pub const FRAME_SPACING: f32 = 0.9;
pub const VARIABLE_SPACING: f32 = 0.15;

pub fn render(recursion: &RecursionElement) -> SceneFragment {
    let mut fragment = SceneFragment::new("recursion");
    let top = (recursion.stack_frames.len() as f32 * FRAME_SPACING) / 2.0;

    for (i, frame) in recursion.stack_frames.iter().enumerate() {
        let center = Vec3::new(0.0, top - i as f32 * FRAME_SPACING, 0.0);
        fragment.push(SceneNode::mesh(
            Shape::Box {
                size: Vec3::new(1.5, 0.8, 0.2),
            },
            center,
            palette::fill(recursion.current_frame == Some(i)),
        ));
        fragment.push(SceneNode::label(
            frame.name.as_str(),
            center + Vec3::new(0.0, 0.0, 0.15),
            0.3,
            palette::TEXT,
        ));

        for (j, (name, value)) in frame.variables.iter().enumerate() {
            fragment.push(
                SceneNode::label(
                    format!("{name}: {}", display_value(value)),
                    center + Vec3::new(-0.6, -0.2 - j as f32 * VARIABLE_SPACING, 0.16),
                    0.2,
                    palette::VARIABLE,
                )
                .anchored(Anchor::Left),
            );
        }
    }

    fragment
}
