pub mod camera;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod gpu;
pub mod math;
pub mod scene;
pub mod types;

pub use config::BackdropConfig;
pub use error::{BackdropError, Result};
pub use scene::{create_backdrop, ActiveBackdrop, Backdrop, DisabledBackdrop, RenderBackend};
