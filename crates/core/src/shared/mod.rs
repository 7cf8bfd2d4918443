pub mod constants;
pub mod image;
pub mod job_params;
pub mod pixel;
