//! Hash table layout: a row of buckets with entries stacked beneath
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use glam::Vec3;

use algolens_core::trace::HashTableElement;

use crate::scene::{palette, SceneFragment, SceneNode, Shape};

pub const BUCKET_SPACING: f32 = 1.5;
pub const ENTRY_SPACING: f32 = 0.4;

pub fn render(table: &HashTableElement) -> SceneFragment {
    let mut fragment = SceneFragment::new("hashTable");
    let origin = -(table.buckets.len() as f32 * BUCKET_SPACING) / 2.0;

    for (i, bucket) in table.buckets.iter().enumerate() {
        let center = Vec3::new(origin + i as f32 * BUCKET_SPACING, 0.0, 0.0);
        fragment.push(SceneNode::mesh(
            Shape::Box {
                size: Vec3::new(1.2, 0.2, 0.8),
            },
            center,
            palette::fill(table.is_highlighted(i)),
        ));
        fragment.push(SceneNode::label(
            format!("Bucket {i}"),
            center + Vec3::new(0.0, 0.2, 0.5),
            0.3,
            palette::TEXT,
        ));

        for (j, entry) in bucket.entries.iter().enumerate() {
            let slot = center - Vec3::new(0.0, 0.3 + j as f32 * ENTRY_SPACING, 0.0);
            fragment.push(SceneNode::mesh(
                Shape::Box {
                    size: Vec3::new(1.0, 0.3, 0.6),
                },
                slot,
                palette::ENTRY,
            ));
            fragment.push(SceneNode::label(
                format!("{}: {}", entry.key, entry.value),
                slot + Vec3::new(0.0, 0.0, 0.35),
                0.2,
                palette::TEXT,
            ));
        }
    }

    fragment
}
