//! Array layout: a centred row of cells with pointer markers below
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use glam::Vec3;

use algolens_core::trace::ArrayElement;

use crate::scene::{palette, SceneFragment, SceneNode, Shape};

pub const CELL_SIZE: Vec3 = Vec3::new(0.8, 0.8, 0.2);
pub const CELL_SPACING: f32 = 0.9;

/// Pointer group sits this far below the row
const POINTER_DROP: f32 = 1.5;

pub fn render(array: &ArrayElement) -> SceneFragment {
    let mut fragment = SceneFragment::new("array");
    let origin = -(array.value.len() as f32 * CELL_SPACING) / 2.0;

    for (i, value) in array.value.iter().enumerate() {
        let center = Vec3::new(origin + i as f32 * CELL_SPACING, 0.0, 0.0);
        fragment.push(SceneNode::mesh(
            Shape::Box { size: CELL_SIZE },
            center,
            palette::fill(array.is_highlighted(i)),
        ));
        fragment.push(SceneNode::label(
            value.to_string(),
            center + Vec3::new(0.0, 0.0, 0.15),
            0.5,
            palette::TEXT,
        ));

        for name in array.pointers_at(i) {
            let base = center - Vec3::new(0.0, POINTER_DROP, 0.0);
            fragment.push(SceneNode::mesh(
                Shape::Cone {
                    radius: 0.2,
                    height: 0.8,
                },
                base + Vec3::new(0.0, 0.5, 0.0),
                palette::ACCENT,
            ));
            fragment.push(SceneNode::label(
                name,
                base + Vec3::new(0.0, 1.2, 0.0),
                0.3,
                palette::ACCENT,
            ));
        }
    }

    fragment
}
