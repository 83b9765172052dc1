//! Terminal front end for the terrace finder.

pub mod render;
pub mod text_surface;

pub use text_surface::TextSurface;
