//! Renderer-agnostic helpers shared by drawing and input handling.

pub mod layout;
