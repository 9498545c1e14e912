//! AlgoLens visualization
//! Scene layout for trace steps: element views, frame composition and camera path
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod camera;
pub mod frame;
pub mod scene;
pub mod view;

pub use self::frame::{render_frame, SceneDescription};
pub use self::scene::{Color, SceneFragment, SceneNode, Shape};
pub use self::view::{render_element, render_step};
