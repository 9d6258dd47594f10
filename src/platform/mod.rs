//! Platform abstraction layer
//!
//! The frame driver owns the window and event pump. Once per tick it hands
//! the core:
//! - An input snapshot (held keys, key-down edges, pointer, click edge)
//! - A time delta
//!
//! The core never polls input state itself.

pub mod input;

pub use input::{FrameInput, Key, KeyRepeat};
