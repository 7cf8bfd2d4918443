//! Row-partitioned distributed Gaussian blur.
//!
//! The root rank reads an image, splits its rows across a fixed group of
//! ranks (equal shares through a collective, the residue through
//! point-to-point messages), each rank filters its rows with halo context
//! from its neighbours, and the root reassembles and writes the result.

pub mod blurring;
pub mod distribution;
pub mod imaging;
pub mod partition;
pub mod pipeline;
pub mod shared;
