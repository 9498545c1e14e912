//! Visual element variants
//!
//! Each step carries a list of typed shape descriptions. The JSON form is
//! tagged on a `type` field; decoding never fails on an individual element:
//! unknown kinds and known kinds with broken payloads are kept as inert
//! variants so the renderer can show a marker in their place.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::collections::BTreeMap;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Kind reported for elements that carry no `type` field at all
pub const MISSING_KIND: &str = "unknown";

/// Display value of a cell or node
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    #[default]
    Null,

    /// Arrays and objects, e.g. a DP table row or a chained bucket value
    Nested(Value),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Text(v) => f.write_str(v),
            Self::Null => f.write_str("null"),
            Self::Nested(v) => f.write_str(&display_value(v)),
        }
    }
}

/// Identifier of a tree, graph or list node
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeId {
    Int(i64),
    Name(String),
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Name(v) => f.write_str(v),
        }
    }
}

impl From<i64> for NodeId {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self::Name(value.to_owned())
    }
}

/// Text form of an arbitrary JSON value as shown in variable labels
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrayElement {
    pub value: Vec<Scalar>,

    /// Highlighted cell indices; negative entries never match
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub highlight: Vec<i64>,

    /// Named pointers to cell indices; anything but an in-range number never matches
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub pointers: BTreeMap<String, Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation: Option<String>,
}

impl ArrayElement {
    pub fn is_highlighted(&self, index: usize) -> bool {
        index_listed(&self.highlight, index)
    }

    /// Pointer names that point at `index`
    pub fn pointers_at(&self, index: usize) -> impl Iterator<Item = &str> {
        let target = index as f64;
        self.pointers
            .iter()
            .filter(move |(_, at)| at.as_f64() == Some(target))
            .map(|(name, _)| name.as_str())
    }
}

/// Node placed at data-supplied coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionedNode {
    pub id: NodeId,

    #[serde(default)]
    pub value: Scalar,

    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

/// Payload shared by `tree` and `graph` elements
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeLinkElement {
    pub nodes: Vec<PositionedNode>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub edges: Vec<Edge>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub highlight: Vec<NodeId>,

    /// Nodes already processed (graph searches)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub visited: Vec<NodeId>,

    /// Nodes on the traversal so far (tree walks)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub traversal_path: Vec<NodeId>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub directed: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation: Option<String>,
}

impl NodeLinkElement {
    pub fn node(&self, id: &NodeId) -> Option<&PositionedNode> {
        self.nodes.iter().find(|node| &node.id == id)
    }

    pub fn is_highlighted(&self, id: &NodeId) -> bool {
        self.highlight.contains(id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListNode {
    pub id: NodeId,

    #[serde(default)]
    pub value: Scalar,

    #[serde(default)]
    pub next: Option<NodeId>,

    #[serde(default)]
    pub prev: Option<NodeId>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinkedListElement {
    pub nodes: Vec<ListNode>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub highlight: Vec<NodeId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableEntry {
    pub key: Scalar,

    #[serde(default)]
    pub value: Scalar,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    #[serde(default)]
    pub entries: Vec<TableEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HashTableElement {
    pub buckets: Vec<Bucket>,

    /// Highlighted bucket indices; negative entries never match
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub highlight: Vec<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation: Option<String>,
}

impl HashTableElement {
    pub fn is_highlighted(&self, bucket: usize) -> bool {
        index_listed(&self.highlight, bucket)
    }
}

fn index_listed(listed: &[i64], index: usize) -> bool {
    i64::try_from(index).is_ok_and(|index| listed.contains(&index))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecursionFrame {
    pub name: String,

    /// Bindings in declaration order
    #[serde(default)]
    pub variables: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecursionElement {
    pub stack_frames: Vec<RecursionFrame>,

    /// Index of the executing frame
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_frame: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextElement {
    pub value: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation: Option<String>,
}

/// One typed shape description within a step
#[derive(Debug, Clone, PartialEq)]
pub enum VisualElement {
    Array(ArrayElement),
    Tree(NodeLinkElement),
    Graph(NodeLinkElement),
    LinkedList(LinkedListElement),
    HashTable(HashTableElement),
    Recursion(RecursionElement),
    Text(TextElement),

    /// Kind this crate has no layout for; the raw JSON is kept verbatim
    Unsupported { kind: String, raw: Value },

    /// Known kind whose payload failed to decode
    Malformed {
        kind: String,
        reason: String,
        raw: Value,
    },
}

impl VisualElement {
    /// The JSON `type` tag of this element
    pub fn kind(&self) -> &str {
        match self {
            Self::Array(_) => "array",
            Self::Tree(_) => "tree",
            Self::Graph(_) => "graph",
            Self::LinkedList(_) => "linkedList",
            Self::HashTable(_) => "hashTable",
            Self::Recursion(_) => "recursion",
            Self::Text(_) => "text",
            Self::Unsupported { kind, .. } | Self::Malformed { kind, .. } => kind,
        }
    }

    /// Whether the element is laid out from explicit node coordinates
    pub fn is_spatial(&self) -> bool {
        matches!(self, Self::Tree(_) | Self::Graph(_) | Self::LinkedList(_))
    }

    /// Decode an element from raw JSON without ever failing
    pub fn from_value(raw: Value) -> Self {
        let kind = match raw.get("type").and_then(Value::as_str) {
            Some(kind) => kind.to_owned(),
            None => {
                return Self::Unsupported {
                    kind: MISSING_KIND.to_owned(),
                    raw,
                }
            }
        };

        let decoded = match kind.as_str() {
            "array" => decode(&raw).map(Self::Array),
            "tree" => decode(&raw).map(Self::Tree),
            "graph" => decode(&raw).map(Self::Graph),
            "linkedList" => decode(&raw).map(Self::LinkedList),
            "hashTable" => decode(&raw).map(Self::HashTable),
            "recursion" => decode(&raw).map(Self::Recursion),
            "text" => decode(&raw).map(Self::Text),
            _ => return Self::Unsupported { kind, raw },
        };

        decoded.unwrap_or_else(|err| {
            log::debug!("Visual element of kind {kind} is malformed: {err}");
            Self::Malformed {
                kind,
                reason: err.to_string(),
                raw,
            }
        })
    }

    /// Encode back into the tagged JSON form
    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        let payload = match self {
            Self::Array(e) => serde_json::to_value(e)?,
            Self::Tree(e) | Self::Graph(e) => serde_json::to_value(e)?,
            Self::LinkedList(e) => serde_json::to_value(e)?,
            Self::HashTable(e) => serde_json::to_value(e)?,
            Self::Recursion(e) => serde_json::to_value(e)?,
            Self::Text(e) => serde_json::to_value(e)?,
            Self::Unsupported { raw, .. } | Self::Malformed { raw, .. } => return Ok(raw.clone()),
        };

        let mut tagged = Map::new();
        tagged.insert("type".to_owned(), Value::String(self.kind().to_owned()));
        if let Value::Object(fields) = payload {
            tagged.extend(fields);
        }
        Ok(Value::Object(tagged))
    }
}

fn decode<T: DeserializeOwned>(raw: &Value) -> Result<T, serde_json::Error> {
    T::deserialize(raw)
}

impl Serialize for VisualElement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value()
            .map_err(serde::ser::Error::custom)?
            .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for VisualElement {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::from_value)
    }
}
