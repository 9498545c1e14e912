//! Linked list layout: a centred row of boxes joined by arrows
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::f32::consts::FRAC_PI_2;

use glam::{Quat, Vec3};

use algolens_core::trace::LinkedListElement;

use crate::scene::{palette, SceneFragment, SceneNode, Shape};

pub const NODE_SPACING: f32 = 1.5;

const NODE_SIZE: Vec3 = Vec3::new(0.8, 0.8, 0.2);

pub fn render(list: &LinkedListElement) -> SceneFragment {
    let mut fragment = SceneFragment::new("linkedList");
    let origin = -(list.nodes.len() as f32 * NODE_SPACING) / 2.0;
    // Connectors point along +X
    let along_x = Quat::from_rotation_z(-FRAC_PI_2);

    for (i, node) in list.nodes.iter().enumerate() {
        let center = Vec3::new(origin + i as f32 * NODE_SPACING, 0.0, 0.0);
        fragment.push(SceneNode::mesh(
            Shape::Box { size: NODE_SIZE },
            center,
            palette::fill(list.highlight.contains(&node.id)),
        ));
        fragment.push(SceneNode::label(
            node.value.to_string(),
            center + Vec3::new(0.0, 0.0, 0.15),
            0.4,
            palette::TEXT,
        ));

        if node.next.is_some() {
            let link = center + Vec3::new(0.8, 0.0, 0.0);
            fragment.push(
                SceneNode::mesh(
                    Shape::Cylinder {
                        radius: 0.05,
                        length: 1.0,
                    },
                    link + Vec3::new(0.4, 0.0, 0.0),
                    palette::EDGE,
                )
                .rotated(along_x),
            );
            fragment.push(
                SceneNode::mesh(
                    Shape::Cone {
                        radius: 0.1,
                        height: 0.2,
                    },
                    link + Vec3::new(0.9, 0.0, 0.0),
                    palette::EDGE,
                )
                .rotated(along_x),
            );
        }
    }

    fragment
}

#[cfg(test)]
mod tests {
    use super::*;
    use algolens_core::trace::VisualElement;
    use serde_json::json;

    fn list(raw: serde_json::Value) -> LinkedListElement {
        match VisualElement::from_value(raw) {
            VisualElement::LinkedList(list) => list,
            other => panic!("not a list: {other:?}"),
        }
    }

    #[test]
    fn test_connectors_only_for_linked_nodes() {
        let fragment = render(&list(json!({
            "type": "linkedList",
            "nodes": [
                {"id": 1, "value": 5, "next": 2},
                {"id": 2, "value": 9, "next": null}
            ],
            "highlight": [2]
        })));

        let boxes: Vec<_> = fragment
            .meshes()
            .filter(|m| matches!(m, SceneNode::Mesh { shape: Shape::Box { .. }, .. }))
            .collect();
        assert_eq!(boxes.len(), 2);
        assert_eq!(boxes[0].position(), Vec3::new(-1.5, 0.0, 0.0));
        assert_eq!(boxes[1].color(), palette::HIGHLIGHT);

        let connectors = fragment.meshes().count() - boxes.len();
        assert_eq!(connectors, 2);
    }

    #[test]
    fn test_connector_points_right() {
        let fragment = render(&list(json!({
            "type": "linkedList",
            "nodes": [{"id": "a", "value": 1, "next": "b"}]
        })));
        let cone = fragment
            .meshes()
            .find(|m| matches!(m, SceneNode::Mesh { shape: Shape::Cone { .. }, .. }))
            .unwrap();
        let SceneNode::Mesh { rotation, position, .. } = cone else {
            unreachable!()
        };
        assert!((*rotation * Vec3::Y - Vec3::X).length() < 1e-5);
        assert!((position.x - 0.95).abs() < 1e-6);
    }
}
