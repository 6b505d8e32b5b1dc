//! CPU side of the backdrop: every piece of per-frame state and the
//! orchestrator that advances it.
//!
//! Nothing here touches the GPU directly. Frames leave through
//! [`RenderBackend`], which `gpu::WgpuBackend` implements for real windows
//! and tests implement with recording mocks.

mod ambient;
mod backend;
mod background;
mod objects;
mod orchestrator;
mod pipeline;
mod shapes;
mod trail;

pub use ambient::AmbientField;
pub use backend::{FrameSnapshot, RenderBackend};
pub use background::{BackgroundSurface, SurfaceGeometry};
pub use objects::{default_objects, DecorativeObject};
pub use orchestrator::{create_backdrop, ActiveBackdrop, Backdrop, DisabledBackdrop};
pub use pipeline::{BloomSettings, ImagePipeline, Pass};
pub use shapes::{Outline, ShapeKind};
pub use trail::{PointerTrail, TRAIL_SENTINEL};
