//! Draw-command rendering module
//!
//! The core never touches pixels. Each frame it fills a [`Frame`] with
//! rectangles, circles, lines and text in pixel space; an external rasterizer
//! turns them into output.

pub mod frame;
pub mod palette;

pub use frame::{DrawCommand, Frame};
pub use palette::Color;
