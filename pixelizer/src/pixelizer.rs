// THEORY:
// The `pixelizer` module is the top-level API of the crate. It wraps the block grid's
// three passes (accumulate, average, paint) behind a single call that takes an image
// and a block size and returns a new, flat-colored image.
//
// The transform is a pure function of (image, block_width, block_height). It reads the
// source without mutating it, allocates its own accumulators and output, and keeps
// nothing once it returns. Loading and saving images are not its concern.

use image::{DynamicImage, RgbaImage};
use log::{debug, info};

use crate::core_modules::block_grid::{BlockGrid, GridGeometry};
use crate::PixelizeResult;

/// Configuration for the Pixelizer: the size of one output block in source pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelizerConfig {
    pub block_width: i32,
    pub block_height: i32,
}

impl Default for PixelizerConfig {
    fn default() -> Self {
        Self {
            block_width: 2,
            block_height: 2,
        }
    }
}

impl PixelizerConfig {
    pub fn new(block_width: i32, block_height: i32) -> Self {
        Self {
            block_width,
            block_height,
        }
    }

    /// Validates this block size against an image size.
    pub fn geometry(&self, width: u32, height: u32) -> PixelizeResult<GridGeometry> {
        GridGeometry::new(width, height, self.block_width, self.block_height)
    }

    /// Output size for an image of `width` x `height`.
    pub fn effective_dimensions(&self, width: u32, height: u32) -> PixelizeResult<(u32, u32)> {
        let geometry = self.geometry(width, height)?;
        Ok((geometry.effective_width, geometry.effective_height))
    }

    /// Number of blocks across and down for an image of `width` x `height`.
    pub fn grid_dimensions(&self, width: u32, height: u32) -> PixelizeResult<(u32, u32)> {
        let geometry = self.geometry(width, height)?;
        Ok((geometry.grid_width, geometry.grid_height))
    }
}

/// Repaints an image as a grid of flat-colored blocks.
#[derive(Debug, Clone, Default)]
pub struct Pixelizer {
    config: PixelizerConfig,
}

impl Pixelizer {
    pub fn new(config: PixelizerConfig) -> Self {
        Self { config }
    }

    /// Pixelizes an 8-bit RGBA image.
    ///
    /// The output is cropped to whole blocks, so it may be smaller than `image`.
    pub fn pixelize(&self, image: &RgbaImage) -> PixelizeResult<RgbaImage> {
        let geometry = self.config.geometry(image.width(), image.height())?;
        log_geometry(image, &geometry);

        let mut grid = BlockGrid::new(geometry);
        grid.accumulate(image);
        let averages = grid.averages();
        debug!("Finished averaging {} blocks", averages.len());

        let mut output = RgbaImage::new(geometry.effective_width, geometry.effective_height);
        grid.paint_into(&averages, &mut output);
        debug!("Finished pixelizing image");

        Ok(output)
    }

    /// Pixelizes any decoded image, normalizing its channels to 8-bit RGBA first.
    pub fn pixelize_dynamic(&self, image: &DynamicImage) -> PixelizeResult<RgbaImage> {
        match image {
            DynamicImage::ImageRgba8(rgba) => self.pixelize(rgba),
            other => self.pixelize(&other.to_rgba8()),
        }
    }
}

/// One-shot pixelization of `image` with blocks of `block_width` x `block_height`.
pub fn pixelize(image: &RgbaImage, block_width: i32, block_height: i32) -> PixelizeResult<RgbaImage> {
    Pixelizer::new(PixelizerConfig::new(block_width, block_height)).pixelize(image)
}

pub(crate) fn log_geometry(image: &RgbaImage, geometry: &GridGeometry) {
    info!(
        "Original image dimensions: {}x{}",
        image.width(),
        image.height()
    );
    info!(
        "Blocks: {}x{} of {}x{} pixels, output {}x{}",
        geometry.grid_width,
        geometry.grid_height,
        geometry.block_width,
        geometry.block_height,
        geometry.effective_width,
        geometry.effective_height
    );
}
