pub mod ease;
pub mod motion;
pub mod path;
pub mod sampler;
pub mod transform;
