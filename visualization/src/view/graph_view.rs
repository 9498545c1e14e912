//! Node-link layout for trees and graphs
//!
//! Nodes sit at their data-supplied `(x, y)` with y flipped so larger y is
//! lower on screen. Edges are cylinders spanning node centres. An edge that
//! names a node absent from the element is left out and reported in the
//! fragment's `skipped` list.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use glam::Vec3;
use log::debug;

use algolens_core::trace::{NodeId, NodeLinkElement, PositionedNode};

use crate::scene::{align_y, palette, Color, SceneFragment, SceneNode, Shape};

pub const NODE_RADIUS: f32 = 0.4;

/// Which flavour of node-link element is being drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeLinkStyle {
    Tree,
    Graph,
}

impl NodeLinkStyle {
    fn kind(self) -> &'static str {
        match self {
            Self::Tree => "tree",
            Self::Graph => "graph",
        }
    }

    fn edge_radius(self) -> f32 {
        match self {
            Self::Tree => 0.05,
            Self::Graph => 0.03,
        }
    }

    /// Secondary marking: traversal path for trees, visited set for graphs
    fn is_marked(self, element: &NodeLinkElement, id: &NodeId) -> bool {
        match self {
            Self::Tree => element.traversal_path.contains(id),
            Self::Graph => element.visited.contains(id),
        }
    }
}

fn world_position(node: &PositionedNode) -> Vec3 {
    Vec3::new(node.x, -node.y, 0.0)
}

fn node_color(style: NodeLinkStyle, element: &NodeLinkElement, id: &NodeId) -> Color {
    if element.is_highlighted(id) {
        palette::HIGHLIGHT
    } else if style.is_marked(element, id) {
        palette::ACCENT
    } else {
        palette::DEFAULT
    }
}

pub fn render(element: &NodeLinkElement, style: NodeLinkStyle) -> SceneFragment {
    let mut fragment = SceneFragment::new(style.kind());

    for edge in &element.edges {
        let (Some(from), Some(to)) = (element.node(&edge.from), element.node(&edge.to)) else {
            debug!("Skipping dangling {} edge {} -> {}", style.kind(), edge.from, edge.to);
            fragment.skip(format!("edge {} -> {}", edge.from, edge.to));
            continue;
        };

        let start = world_position(from);
        let end = world_position(to);
        let rotation = align_y(start, end);
        let color = if element.is_highlighted(&edge.from) || element.is_highlighted(&edge.to) {
            palette::HIGHLIGHT
        } else {
            palette::EDGE
        };

        fragment.push(
            SceneNode::mesh(
                Shape::Cylinder {
                    radius: style.edge_radius(),
                    length: start.distance(end),
                },
                start.lerp(end, 0.5),
                color,
            )
            .rotated(rotation),
        );

        if style == NodeLinkStyle::Graph && element.directed {
            fragment.push(
                SceneNode::mesh(
                    Shape::Cone {
                        radius: 0.1,
                        height: 0.2,
                    },
                    end,
                    color,
                )
                .rotated(rotation),
            );
        }
    }

    for node in &element.nodes {
        let center = world_position(node);
        fragment.push(SceneNode::mesh(
            Shape::Sphere {
                radius: NODE_RADIUS,
            },
            center,
            node_color(style, element, &node.id),
        ));
        fragment.push(SceneNode::label(
            node.value.to_string(),
            center + Vec3::new(0.0, 0.0, 0.5),
            0.3,
            palette::TEXT,
        ));
    }

    fragment
}

#[cfg(test)]
mod tests {
    use super::*;
    use algolens_core::trace::VisualElement;
    use serde_json::json;

    fn node_link(raw: serde_json::Value) -> NodeLinkElement {
        match VisualElement::from_value(raw) {
            VisualElement::Tree(element) | VisualElement::Graph(element) => element,
            other => panic!("not a node-link element: {other:?}"),
        }
    }

    fn spheres(fragment: &SceneFragment) -> Vec<&SceneNode> {
        fragment
            .meshes()
            .filter(|m| matches!(m, SceneNode::Mesh { shape: Shape::Sphere { .. }, .. }))
            .collect()
    }

    fn cylinders(fragment: &SceneFragment) -> Vec<&SceneNode> {
        fragment
            .meshes()
            .filter(|m| matches!(m, SceneNode::Mesh { shape: Shape::Cylinder { .. }, .. }))
            .collect()
    }

    #[test]
    fn test_tree_nodes_flip_y_and_colour_by_priority() {
        let tree = node_link(json!({
            "type": "tree",
            "nodes": [
                {"id": 1, "value": 50, "x": 0, "y": 0},
                {"id": 2, "value": 30, "x": -2, "y": 2},
                {"id": 3, "value": 70, "x": 2, "y": 2}
            ],
            "edges": [{"from": 1, "to": 2}, {"from": 1, "to": 3}],
            "highlight": [2],
            "traversalPath": [1, 2]
        }));
        let fragment = render(&tree, NodeLinkStyle::Tree);

        let nodes = spheres(&fragment);
        assert_eq!(nodes[1].position(), Vec3::new(-2.0, -2.0, 0.0));
        assert_eq!(nodes[0].color(), palette::ACCENT);
        assert_eq!(nodes[1].color(), palette::HIGHLIGHT);
        assert_eq!(nodes[2].color(), palette::DEFAULT);

        let edges = cylinders(&fragment);
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[0].color(), palette::HIGHLIGHT);
        assert_eq!(edges[1].color(), palette::EDGE);
        match edges[1] {
            SceneNode::Mesh {
                shape: Shape::Cylinder { radius, length },
                position,
                ..
            } => {
                assert_eq!(*radius, 0.05);
                assert!((length - 8.0_f32.sqrt()).abs() < 1e-5);
                assert_eq!(*position, Vec3::new(1.0, -1.0, 0.0));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_dangling_edge_skipped() {
        let graph = node_link(json!({
            "type": "graph",
            "nodes": [{"id": "A", "x": 0, "y": 0}, {"id": "B", "x": 1, "y": 0}],
            "edges": [{"from": "A", "to": "B"}, {"from": "A", "to": "Z"}]
        }));
        let fragment = render(&graph, NodeLinkStyle::Graph);

        assert_eq!(cylinders(&fragment).len(), 1);
        assert_eq!(fragment.skipped, ["edge A -> Z"]);
        assert_eq!(spheres(&fragment).len(), 2);
    }

    #[test]
    fn test_directed_graph_adds_arrowheads() {
        let graph = node_link(json!({
            "type": "graph",
            "nodes": [{"id": 1, "x": 0, "y": 0}, {"id": 2, "x": 0, "y": 3}],
            "edges": [{"from": 1, "to": 2, "weight": 4}],
            "visited": [1],
            "directed": true
        }));
        let fragment = render(&graph, NodeLinkStyle::Graph);

        let cone = fragment
            .meshes()
            .find(|m| matches!(m, SceneNode::Mesh { shape: Shape::Cone { .. }, .. }))
            .unwrap();
        assert_eq!(cone.position(), Vec3::new(0.0, -3.0, 0.0));
        assert_eq!(spheres(&fragment)[0].color(), palette::ACCENT);

        let undirected = NodeLinkElement {
            directed: false,
            ..graph
        };
        let fragment = render(&undirected, NodeLinkStyle::Graph);
        assert!(!fragment
            .meshes()
            .any(|m| matches!(m, SceneNode::Mesh { shape: Shape::Cone { .. }, .. })));
    }

    #[test]
    fn test_visited_ignored_for_trees() {
        let tree = node_link(json!({
            "type": "tree",
            "nodes": [{"id": 1, "x": 0, "y": 0}],
            "visited": [1]
        }));
        let fragment = render(&tree, NodeLinkStyle::Tree);
        assert_eq!(spheres(&fragment)[0].color(), palette::DEFAULT);
    }
}
