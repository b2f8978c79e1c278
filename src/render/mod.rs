pub mod braille;
pub mod canvas;
pub mod halfblock;

pub use canvas::{Blend, Canvas, ColorMode, RenderMode};
