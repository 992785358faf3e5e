pub mod manifest;
pub mod render_job;
pub mod request;
