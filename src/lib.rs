//! Per-fragment Phong shading and point-light planar shadow projection,
//! driven by a small multithreaded software rasterizer.
//!
//! The shading math lives in [`pipeline::shaders`]; everything else is the
//! host pipeline that feeds it vertices and consumes its outputs.

pub mod core;
pub mod io;
pub mod pipeline;
pub mod scene;
