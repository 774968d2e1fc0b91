//! Programmable stages: the Phong shading path and the planar shadow path.

pub mod phong;
pub mod shadow;
