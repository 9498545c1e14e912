//! Text layout: one centred caption
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use glam::Vec3;

use algolens_core::trace::TextElement;

use crate::scene::{palette, SceneFragment, SceneNode};

/// A single centred caption
pub fn render(text: &TextElement) -> SceneFragment {
    let mut fragment = SceneFragment::new("text");
    fragment.push(SceneNode::label(
        text.value.as_str(),
        Vec3::ZERO,
        0.4,
        palette::TEXT,
    ));
    fragment
}
