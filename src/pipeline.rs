pub mod mode;
pub mod passes;
pub mod renderer;
pub mod shaders;
