//! Hardware abstraction traits
//!
//! These traits define the interface between the console logic and the
//! board that samples its controls and presents its state.

pub mod input;
pub mod render;

pub use input::InputSource;
pub use render::RenderSurface;
