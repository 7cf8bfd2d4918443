pub mod distribution_channel;
pub mod domain;
pub mod halo_exchange;
pub mod infrastructure;
