// src/wgpu_utils/mod.rs
//! WGPU utility functions and helpers
//!
//! Binding layout shorthands and typed buffer wrappers shared by the compute
//! and render pipelines.

pub mod binding_types;
pub mod uniform_buffer;

// Re-export main types
pub use binding_types::*;
pub use uniform_buffer::{ArrayBuffer, UniformBuffer};
