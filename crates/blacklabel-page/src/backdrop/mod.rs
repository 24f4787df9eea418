//! Background Animation Component.
//!
//! Mounts a slowly drifting, lit 3D scene into a host container:
//! [`BackgroundAnimation::activate`] builds the scene and the rendering
//! surface, each animation frame advances [`motion::sample`] and submits a
//! frame, resize notifications keep the surface and camera in step with the
//! container, and [`BackgroundAnimation::deactivate`] (also run on drop)
//! releases exactly the resources activation created.
//!
//! The 3D engine is injected. Without one, or without a container, activation
//! is a logged no-op.

mod component;
mod compose;
mod config;
mod error;
mod ledger;
pub mod motion;

pub use component::{Activation, BackgroundAnimation};
pub use compose::SceneRig;
pub use config::{
    BackdropConfig, CameraSpec, FloorSpec, HemisphereSpec, LightRig, MotionConfig, PointSpec,
    PropSpec, SpotSpec,
};
pub use error::{BackdropError, Prerequisite};
pub use ledger::ResourceLedger;
