// THEORY:
// This file is the main entry point for the `pixelizer` library crate. It exports the
// `Pixelizer` (and its parallel sibling) as the high-level interface for turning an
// image into a grid of flat-colored blocks, together with the error type every
// fallible operation returns.
//
// The internal modules (`core_modules`) hold the pixel, block and grid building
// blocks. `utils` holds the file and naming helpers the command line driver uses
// around the transform.

pub mod core_modules;
pub mod parallel_pixelizer;
pub mod pixelizer;
pub mod utils;

pub use parallel_pixelizer::ParallelPixelizer;
pub use pixelizer::{Pixelizer, PixelizerConfig, pixelize};

pub type PixelizeResult<T> = Result<T, PixelizeError>;

#[derive(thiserror::Error, Debug)]
pub enum PixelizeError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    #[error(
        "Block size {block_width}x{block_height} is larger than the {width}x{height} image"
    )]
    ParameterTooLarge {
        block_width: u32,
        block_height: u32,
        width: u32,
        height: u32,
    },
    #[error("Worker error: {0}")]
    Worker(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}
