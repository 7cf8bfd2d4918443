pub mod blur_job_use_case;
pub mod coordinator;
pub mod job_error;
pub mod job_logger;
