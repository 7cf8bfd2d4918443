use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::shared::image::Image;

#[derive(Error, Debug)]
pub enum ImageReadError {
    #[error("failed to read image {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("too large maximum color-component value {max_value} in {path}")]
    ColorDepth { path: PathBuf, max_value: u64 },
}

/// Decodes a whole image file into memory. Used only by the root rank.
pub trait ImageReader: Send + Sync {
    fn read(&self, path: &Path) -> Result<Image, ImageReadError>;
}
