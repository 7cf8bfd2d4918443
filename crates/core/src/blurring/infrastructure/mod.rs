pub mod gaussian;
pub mod separable_convolution;
