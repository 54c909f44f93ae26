//! Pure domain types with minimal dependencies
//!
//! Nothing here knows about surfaces, scenes or the event loop; the
//! renderers receive these values explicitly on every redraw.

pub mod geometry;
pub mod input;
pub mod range;
pub mod scale;
pub mod tick;

pub use geometry::*;
pub use range::*;
pub use scale::*;
pub use tick::*;
