pub mod convolution_step;
pub mod local_block;
pub mod weight_table;
