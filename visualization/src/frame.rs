//! Frame composition
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use glam::Vec3;
use serde::Serialize;

use algolens_core::playback::PlaybackState;
use algolens_core::trace::ProblemTrace;

use crate::camera::{camera_position, RESTING_POSITION};
use crate::scene::SceneFragment;
use crate::view::render_step;

/// Everything needed to draw the current step
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneDescription {
    pub step_index: usize,
    pub step_count: usize,
    pub description: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_line: Option<u32>,

    pub camera: Vec3,

    /// One fragment per visual element, in element order
    pub fragments: Vec<SceneFragment>,
}

impl SceneDescription {
    pub fn empty() -> Self {
        Self {
            step_index: 0,
            step_count: 0,
            description: String::new(),
            code_line: None,
            camera: RESTING_POSITION,
            fragments: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Names of undrawable parts across all fragments
    pub fn skipped(&self) -> impl Iterator<Item = &str> {
        self.fragments
            .iter()
            .flat_map(|fragment| fragment.skipped.iter().map(String::as_str))
    }
}

/// Scene for the step `state` points at
pub fn render_frame(trace: &ProblemTrace, state: &PlaybackState) -> SceneDescription {
    let Some(step) = trace.step(state.current_step_index) else {
        return SceneDescription {
            step_count: trace.step_count(),
            ..SceneDescription::empty()
        };
    };

    SceneDescription {
        step_index: state.current_step_index,
        step_count: trace.step_count(),
        description: step.description.clone(),
        code_line: step.code_line,
        camera: camera_position(step, state.current_step_index),
        fragments: render_step(step),
    }
}
