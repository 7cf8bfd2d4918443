use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::shared::image::Image;

#[derive(Error, Debug)]
pub enum ImageWriteError {
    #[error("failed to create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write image {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("pixel buffer does not match image dimensions")]
    Buffer,
}

/// Encodes a whole image to a file. Used only by the root rank.
pub trait ImageWriter: Send + Sync {
    fn write(&self, path: &Path, image: &Image) -> Result<(), ImageWriteError>;
}
