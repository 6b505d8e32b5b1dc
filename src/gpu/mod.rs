//! wgpu implementation of the render backend.

mod backend;
mod context;
mod post;
mod scene_pass;

pub use backend::WgpuBackend;
pub use context::GpuContext;
pub use post::{PostChain, HDR_FORMAT};
pub use scene_pass::ScenePass;
