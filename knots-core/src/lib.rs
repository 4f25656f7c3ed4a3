//! Knots Core Library - scene, input and loading logic for the knot viewer
//!
//! Two chiral trefoil knots are loaded from OBJ/MTL pairs, placed side by
//! side and turned independently by dragging on either half of the screen.
//! Host shells (browser, terminal) supply a renderer and forward events to a
//! [`Session`].

pub mod config;
pub mod error;
pub mod geometry;
pub mod loader;
pub mod mtl;
pub mod obj;
pub mod projection;
pub mod scene;
pub mod session;
pub mod touch;
pub mod transform;
pub mod viewport;

// Re-export commonly used types
pub use config::{ModelSource, MODEL_SOURCES};
pub use error::{LoadError, LoadResult};
pub use geometry::{Color, Mesh, Triangle, Vertex};
pub use projection::Camera;
pub use scene::{HemisphereLight, Model, Scene, Shape, Side};
pub use session::Session;
pub use touch::{TouchPoint, TouchTracker};
pub use transform::{RotationState, Transform};
pub use viewport::{OrbitControls, RenderTarget, Viewport};
