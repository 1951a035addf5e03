mod bsp;
pub use bsp::*;
mod geometry;
pub use geometry::*;
pub mod walk;
pub use walk::layout_tree;
