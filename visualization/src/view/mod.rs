//! Element layouts
//!
//! One pure function per element kind. Each returns a `SceneFragment` and
//! never fails: kinds without a layout, and payloads that did not decode,
//! become a red marker label instead.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod array_view;
pub mod graph_view;
pub mod hash_table_view;
pub mod linked_list_view;
pub mod recursion_view;
pub mod text_view;

use glam::Vec3;
use log::debug;
use rayon::prelude::*;

use algolens_core::trace::{Step, VisualElement};

use crate::scene::{palette, SceneFragment, SceneNode};

pub use self::graph_view::NodeLinkStyle;

/// Lay out a single element
pub fn render_element(element: &VisualElement) -> SceneFragment {
    match element {
        VisualElement::Array(array) => array_view::render(array),
        VisualElement::Tree(tree) => graph_view::render(tree, NodeLinkStyle::Tree),
        VisualElement::Graph(graph) => graph_view::render(graph, NodeLinkStyle::Graph),
        VisualElement::LinkedList(list) => linked_list_view::render(list),
        VisualElement::HashTable(table) => hash_table_view::render(table),
        VisualElement::Recursion(recursion) => recursion_view::render(recursion),
        VisualElement::Text(text) => text_view::render(text),
        VisualElement::Unsupported { kind, .. } => {
            marker(kind, format!("Unsupported visualization type: {kind}"))
        }
        VisualElement::Malformed { kind, reason, .. } => {
            marker(kind, format!("Invalid {kind} element: {reason}"))
        }
    }
}

/// Lay out every element of `step`, preserving element order
pub fn render_step(step: &Step) -> Vec<SceneFragment> {
    step.visual_elements
        .par_iter()
        .map(render_element)
        .collect()
}

fn marker(kind: &str, text: String) -> SceneFragment {
    debug!("No layout for visual element of kind {kind}");
    let mut fragment = SceneFragment::new(kind);
    fragment.push(SceneNode::label(text, Vec3::ZERO, 0.5, palette::ERROR));
    fragment
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unknown_kind_renders_marker() {
        let element = VisualElement::from_value(json!({"type": "heap", "value": [1]}));
        let fragment = render_element(&element);

        assert_eq!(fragment.kind, "heap");
        assert_eq!(fragment.nodes.len(), 1);
        assert_eq!(
            fragment.nodes[0].text(),
            Some("Unsupported visualization type: heap")
        );
        assert_eq!(fragment.nodes[0].color(), palette::ERROR);
    }

    #[test]
    fn test_malformed_marker_carries_reason() {
        let element = VisualElement::from_value(json!({"type": "tree", "nodes": [{"id": 1}]}));
        let fragment = render_element(&element);
        let text = fragment.nodes[0].text().unwrap();
        assert!(text.starts_with("Invalid tree element: "), "{text}");
    }

    #[test]
    fn test_loose_payloads_still_get_layouts() {
        for element in [
            json!({"type": "array", "value": [[0, 1], [1, 1]]}),
            json!({"type": "array", "value": [4, 5], "pointers": {"left": 0, "right": null}}),
            json!({"type": "array", "value": [4, 5], "highlight": [-1]}),
            json!({"type": "hashTable", "buckets": [{"entries": [{"key": "a", "value": [1, 2]}]}]}),
        ] {
            let fragment = render_element(&VisualElement::from_value(element.clone()));
            assert!(
                fragment.labels().all(|label| label.color() != palette::ERROR),
                "marker for {element}"
            );
        }
    }

    #[test]
    fn test_render_step_keeps_element_order() {
        let step: Step = serde_json::from_value(json!({
            "description": "mixed",
            "visualElements": [
                {"type": "text", "value": "a"},
                {"type": "array", "value": [1, 2]},
                {"type": "mystery"},
                {"type": "text", "value": "b"}
            ]
        }))
        .unwrap();

        let kinds: Vec<_> = render_step(&step).into_iter().map(|f| f.kind).collect();
        assert_eq!(kinds, ["text", "array", "mystery", "text"]);
    }
}
