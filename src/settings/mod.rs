pub mod enrich;
pub mod sprite;
