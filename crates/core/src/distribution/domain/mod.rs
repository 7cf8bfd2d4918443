pub mod communicator;
pub mod rank_group;
