//! # Scene Stage
//!
//! An interactive 3D scene stage: pick, highlight, drag and drag-and-drop
//! interaction over a minimal scene graph, with batched context refresh and
//! camera auto-framing.
//!
//! ## Features
//!
//! - **Controller Lifecycle**: Attachable interaction controllers with
//!   deferred init, two-phase updates and leak-checked disposal
//! - **Dirty-Flag Context**: Any number of scene mutations per tick coalesce
//!   into one bounds recomputation
//! - **Ghost Followers**: Preview nodes converging exponentially onto their
//!   targets, frame by frame
//! - **Auto-Framing**: Reframe, retarget and refocus an orbit camera onto
//!   scene content through bounded transitions
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scene_stage::prelude::*;
//!
//! let mut stage = Stage::new(StageConfig::default());
//! stage.create_default_environment();
//! stage.set_moving(true);
//! stage.set_highlighting(true);
//!
//! loop {
//!     // feed pointer/keyboard/drag events, then once per tick:
//!     stage.pump();
//!     stage.render_tick(1.0 / 60.0);
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod behaviors;
pub mod camera;
pub mod config;
pub mod context;
pub mod controllers;
pub mod events;
pub mod factory;
pub mod foundation;
pub mod ghost;
pub mod input;
pub mod scene;

mod error;
mod stage;

pub use error::StageError;
pub use stage::{Pick, Stage, StageCore};

/// Common imports for stage users
pub mod prelude {
    pub use crate::{
        camera::{ArcCamera, CameraFrame, CameraFramer},
        config::{Config, StageConfig},
        context::SceneContext,
        controllers::{Controller, ControllerId, DroppingController, KillingController},
        events::{StageEvent, StageEventKind},
        factory::{Shape, ShapeFactory, ShapeParams},
        foundation::math::{Bounds, Transform, Vec3},
        ghost::GhostFollower,
        input::{DragEvent, KeyInfo, PickHit, PointerInfo, Viewport},
        scene::{Node, NodeKey, NodeTag, Scene, TagMask},
        Pick, Stage, StageCore, StageError,
    };
}
