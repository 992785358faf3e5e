pub mod composite;
pub mod compositor;
pub mod frame;
pub mod raster;
pub mod sprite;
