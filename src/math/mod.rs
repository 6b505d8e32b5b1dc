mod color;
mod projection;

pub use color::{hsv_to_rgb, rgba};
pub use projection::{intersect_z_plane, Projector};
