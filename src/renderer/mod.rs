//! WebGPU rendering module
//!
//! Flat-colored triangle lists built on the CPU; the pipeline does the
//! coordinate mapping and nothing else.

pub mod pipeline;
pub mod scene;
pub mod vertex;

pub use pipeline::RenderState;
pub use scene::build_scene;
pub use vertex::Vertex;
