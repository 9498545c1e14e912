//! Scene description primitives
//!
//! Layout output is plain data: meshes and labels in world space, ready for
//! any renderer (or a JSON dump) to consume.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::fmt;

use glam::{Quat, Vec3};
use serde::{Serialize, Serializer};

/// sRGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Colour from a `0xRRGGBB` literal
    pub const fn hex(value: u32) -> Self {
        Self::rgb((value >> 16) as u8, (value >> 8) as u8, value as u8)
    }

    /// Linear `[r, g, b, a]` in 0..=1
    pub fn to_rgba(self) -> [f32; 4] {
        [
            f32::from(self.r) / 255.0,
            f32::from(self.g) / 255.0,
            f32::from(self.b) / 255.0,
            1.0,
        ]
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Colours shared by every layout
pub mod palette {
    use super::Color;

    pub const HIGHLIGHT: Color = Color::hex(0xf59e0b);
    pub const DEFAULT: Color = Color::hex(0x3b82f6);
    /// Pointers, visited nodes, traversal paths
    pub const ACCENT: Color = Color::hex(0x10b981);
    pub const EDGE: Color = Color::hex(0x6b7280);
    pub const ENTRY: Color = Color::hex(0x4b5563);
    pub const TEXT: Color = Color::hex(0xffffff);
    pub const VARIABLE: Color = Color::hex(0xd1d5db);
    pub const ERROR: Color = Color::hex(0xff0000);

    /// Highlight colour when `highlighted`, else the default fill
    pub fn fill(highlighted: bool) -> Color {
        if highlighted {
            HIGHLIGHT
        } else {
            DEFAULT
        }
    }
}

/// Mesh geometry; cylinders and cones extend along +Y before rotation
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Shape {
    Box { size: Vec3 },
    Sphere { radius: f32 },
    Cylinder { radius: f32, length: f32 },
    Cone { radius: f32, height: f32 },
}

/// Horizontal text anchoring
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Anchor {
    #[default]
    Center,
    Left,
}

/// Drawable item in world space
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "node", rename_all = "camelCase")]
pub enum SceneNode {
    Mesh {
        shape: Shape,
        position: Vec3,
        rotation: Quat,
        color: Color,
    },
    Label {
        text: String,
        position: Vec3,
        size: f32,
        color: Color,
        anchor: Anchor,
    },
}

impl SceneNode {
    pub fn mesh(shape: Shape, position: Vec3, color: Color) -> Self {
        Self::Mesh {
            shape,
            position,
            rotation: Quat::IDENTITY,
            color,
        }
    }

    /// Centred label
    pub fn label(text: impl Into<String>, position: Vec3, size: f32, color: Color) -> Self {
        Self::Label {
            text: text.into(),
            position,
            size,
            color,
            anchor: Anchor::Center,
        }
    }

    /// Same node with `rotation` applied to a mesh; labels are unchanged
    pub fn rotated(mut self, by: Quat) -> Self {
        if let Self::Mesh { rotation, .. } = &mut self {
            *rotation = by;
        }
        self
    }

    pub fn anchored(mut self, to: Anchor) -> Self {
        if let Self::Label { anchor, .. } = &mut self {
            *anchor = to;
        }
        self
    }

    pub fn position(&self) -> Vec3 {
        match self {
            Self::Mesh { position, .. } | Self::Label { position, .. } => *position,
        }
    }

    pub fn color(&self) -> Color {
        match self {
            Self::Mesh { color, .. } | Self::Label { color, .. } => *color,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Label { text, .. } => Some(text),
            Self::Mesh { .. } => None,
        }
    }
}

/// Layout of one visual element
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SceneFragment {
    /// `type` tag of the source element
    pub kind: String,

    pub nodes: Vec<SceneNode>,

    /// Parts of the element that could not be drawn, e.g. dangling edges
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<String>,
}

impl SceneFragment {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Self::default()
        }
    }

    pub fn push(&mut self, node: SceneNode) {
        self.nodes.push(node);
    }

    pub fn skip(&mut self, reason: impl Into<String>) {
        self.skipped.push(reason.into());
    }

    pub fn meshes(&self) -> impl Iterator<Item = &SceneNode> {
        self.nodes
            .iter()
            .filter(|node| matches!(node, SceneNode::Mesh { .. }))
    }

    pub fn labels(&self) -> impl Iterator<Item = &SceneNode> {
        self.nodes
            .iter()
            .filter(|node| matches!(node, SceneNode::Label { .. }))
    }
}

/// Rotation taking +Y onto the direction from `start` to `end`
pub fn align_y(start: Vec3, end: Vec3) -> Quat {
    let direction = (end - start).normalize_or_zero();
    if direction == Vec3::ZERO {
        Quat::IDENTITY
    } else {
        Quat::from_rotation_arc(Vec3::Y, direction)
    }
}
