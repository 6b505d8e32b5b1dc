mod clock;
mod viewport;

pub use clock::{Clock, Interval};
pub use viewport::Viewport;
