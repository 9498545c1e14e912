//! Problem trace data model
//!
//! A `ProblemTrace` is the complete, immutable description of one algorithm
//! run as produced by the generative model or the built-in sample table:
//! metadata for the info panels, an optional annotated code listing, and the
//! ordered steps that the player walks through.
//!
//! The JSON layout is shared by model output, sample files and persisted
//! history, so every type here uses camelCase field names.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

mod element;

pub use element::{
    display_value, ArrayElement, Bucket, Edge, HashTableElement, LinkedListElement, ListNode,
    NodeId, NodeLinkElement, PositionedNode, RecursionElement, RecursionFrame, Scalar,
    TableEntry, TextElement, VisualElement,
};

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors raised while decoding or validating a trace
#[derive(Debug, Error)]
pub enum TraceError {
    #[error("Trace JSON could not be decoded: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Trace has no steps")]
    EmptySteps,

    #[error("Unknown difficulty: {0}")]
    UnknownDifficulty(String),
}

/// Difficulty rating shown next to the title
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl FromStr for Difficulty {
    type Err = TraceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            other => Err(TraceError::UnknownDifficulty(other.to_owned())),
        }
    }
}

impl<'de> Deserialize<'de> for Difficulty {
    // Model output is free text ("easy", "Medium", "Easy/Medium"), so anything
    // unrecognised falls back to the default rating instead of failing the trace.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = Option::<String>::deserialize(deserializer)?;
        Ok(text.and_then(|t| t.parse().ok()).unwrap_or_default())
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        };
        f.write_str(label)
    }
}

/// Asymptotic cost summary
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeComplexity {
    pub best: String,
    pub average: String,
    pub worst: String,
    pub space: String,
}

/// Source listing with per-line explanations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CodeListing {
    /// Language tag used for syntax highlighting
    pub language: String,

    /// Full source text
    pub content: String,

    /// Explanation keyed by 1-based line number
    pub line_mapping: BTreeMap<u32, String>,
}

impl CodeListing {
    /// Text of a 1-based line
    pub fn line(&self, number: u32) -> Option<&str> {
        let index = usize::try_from(number).ok()?.checked_sub(1)?;
        self.content.lines().nth(index)
    }

    /// Explanation attached to a 1-based line
    pub fn annotation(&self, number: u32) -> Option<&str> {
        self.line_mapping.get(&number).map(String::as_str)
    }
}

/// One line of the code panel for a particular step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeLine<'a> {
    /// 1-based line number
    pub number: u32,

    /// Line text
    pub text: &'a str,

    /// Explanation from the line mapping
    pub annotation: Option<&'a str>,

    /// Whether the step is executing this line
    pub highlighted: bool,
}

/// Call stack frame in a memory snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameRecord {
    pub frame: String,
    pub variables: Map<String, Value>,
}

/// Heap cell in a memory snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeapRecord {
    pub address: String,
    pub value: Value,
}

/// Global binding in a memory snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalRecord {
    pub name: String,
    pub value: Value,
}

/// Memory layout at one step
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryModel {
    pub stack: Vec<FrameRecord>,
    pub heap: Vec<HeapRecord>,
    pub global: Vec<GlobalRecord>,
}

impl MemoryModel {
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty() && self.heap.is_empty() && self.global.is_empty()
    }
}

/// One discrete point in the algorithm's execution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    /// Narration for this step
    #[serde(default)]
    pub description: String,

    /// 1-based line of `code.content` executing at this step
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_line: Option<u32>,

    /// Shapes composing the scene; required, possibly empty
    pub visual_elements: Vec<VisualElement>,

    /// Optional memory snapshot
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_model: Option<MemoryModel>,
}

/// Complete result of one visualization request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemTrace {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub difficulty: Difficulty,

    #[serde(default)]
    pub category: String,

    #[serde(default)]
    pub time_complexity: TimeComplexity,

    #[serde(default)]
    pub key_points: Vec<String>,

    #[serde(default)]
    pub pseudocode: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<CodeListing>,

    pub steps: Vec<Step>,
}

impl ProblemTrace {
    /// Decode and validate a trace from JSON text
    pub fn from_json_str(text: &str) -> Result<Self, TraceError> {
        let trace: ProblemTrace = serde_json::from_str(text)?;
        trace.validate()?;
        Ok(trace)
    }

    /// Check the structural invariants a playable trace must satisfy
    ///
    /// The presence of `visualElements` on every step is already enforced
    /// by decoding; what remains is that there is something to play.
    pub fn validate(&self) -> Result<(), TraceError> {
        if self.steps.is_empty() {
            return Err(TraceError::EmptySteps);
        }
        Ok(())
    }

    pub fn step(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Code panel lines for the given step, empty when the trace has no code
    pub fn code_view(&self, step_index: usize) -> Vec<CodeLine<'_>> {
        let Some(code) = &self.code else {
            return Vec::new();
        };
        let active = self.step(step_index).and_then(|step| step.code_line);

        code.content
            .lines()
            .zip(1u32..)
            .map(|(text, number)| CodeLine {
                number,
                text,
                annotation: code.annotation(number),
                highlighted: active == Some(number),
            })
            .collect()
    }
}
