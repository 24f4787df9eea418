//! 3D scene abstraction.
//!
//! A small retained model of what the backdrop animation draws: geometry and
//! material resources owned by an [`Engine`], a [`Scene`] of lights and mesh
//! instances, and a [`PerspectiveCamera`]. Backends implement [`Engine`]:
//! `render::mesh::WgpuEngine` draws on the GPU, [`HeadlessEngine`] records
//! everything in memory.
//!
//! Every resource an engine creates must be handed back through
//! [`Engine::dispose`] exactly once.

mod camera;
mod engine;
mod error;
mod geometry;
mod headless;
mod ids;
mod light;
mod material;
mod registry;
mod scene;

pub use camera::PerspectiveCamera;
pub use engine::{Engine, RendererOptions, SharedEngine};
pub use error::EngineError;
pub use geometry::{Geometry, MeshData, MeshVertex};
pub use headless::{HeadlessEngine, RenderRecord};
pub use ids::{GeometryId, MaterialId, RendererId, Resource};
pub use light::{Light, LightKind};
pub use material::StandardMaterial;
pub use scene::{Fog, LightKey, Mesh, MeshKey, Scene, Transform};

pub(crate) use registry::Registry;
