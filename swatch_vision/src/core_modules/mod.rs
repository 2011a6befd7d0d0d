pub mod collaborators;
pub mod color_math;
pub mod color_sample;
pub mod pixel;
pub mod position_planner;
pub mod raster;
pub mod region_sampler;
