// THEORY:
// The `BlockGrid` is the central data structure of the pixelizer. It owns the 2D
// grid of `BlockAccumulator`s for one transform and drives the three passes that
// turn a source image into a mosaic.
//
// Key architectural principles:
// 1.  **Validated Geometry**: `GridGeometry` is the only place block sizes are
//     checked. Non-positive sizes and sizes larger than the image are rejected here,
//     before a single accumulator is allocated.
// 2.  **Direct Mapping**: A pixel's owning block is `(x / block_width, y / block_height)`.
//     No searching over block boundaries, so each pixel costs O(1).
// 3.  **Cropping**: The effective region is the image truncated down to whole blocks.
//     Pixels to the right of or below it are never read and never painted.
// 4.  **Bands**: A grid may cover only a horizontal band of block rows. A full grid
//     is simply the band spanning every row. Bands never share accumulators, which
//     is what lets the parallel pixelizer hand each band to its own worker.

use std::ops::Range;

use image::RgbaImage;

use crate::core_modules::block::block::BlockAccumulator;
use crate::core_modules::pixel::pixel::Pixel;
use crate::{PixelizeError, PixelizeResult};

/// The block layout of one image, derived from its size and a block size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridGeometry {
    /// The width of a single block in pixels.
    pub block_width: u32,
    /// The height of a single block in pixels.
    pub block_height: u32,
    /// The source width truncated down to a multiple of `block_width`.
    pub effective_width: u32,
    /// The source height truncated down to a multiple of `block_height`.
    pub effective_height: u32,
    /// The width of the grid in blocks (effective_width / block_width).
    pub grid_width: u32,
    /// The height of the grid in blocks (effective_height / block_height).
    pub grid_height: u32,
}

impl GridGeometry {
    /// Validates a block size against an image size and derives the grid layout.
    pub fn new(
        image_width: u32,
        image_height: u32,
        block_width: i32,
        block_height: i32,
    ) -> PixelizeResult<Self> {
        if block_width <= 0 || block_height <= 0 {
            return Err(PixelizeError::InvalidParameter(format!(
                "block size must be positive, got {block_width}x{block_height}"
            )));
        }
        let (block_width, block_height) = (block_width as u32, block_height as u32);

        let grid_width = image_width / block_width;
        let grid_height = image_height / block_height;
        if grid_width == 0 || grid_height == 0 {
            return Err(PixelizeError::ParameterTooLarge {
                block_width,
                block_height,
                width: image_width,
                height: image_height,
            });
        }

        Ok(Self {
            block_width,
            block_height,
            effective_width: grid_width * block_width,
            effective_height: grid_height * block_height,
            grid_width,
            grid_height,
        })
    }

    /// Number of source pixels in one block.
    pub fn block_area(&self) -> u64 {
        self.block_width as u64 * self.block_height as u64
    }

    /// The block that owns pixel `(x, y)`, or `None` if the pixel is cropped out.
    #[inline]
    pub fn block_of(&self, x: u32, y: u32) -> Option<(u32, u32)> {
        if x >= self.effective_width || y >= self.effective_height {
            return None;
        }
        Some((x / self.block_width, y / self.block_height))
    }
}

/// Accumulators for a band of block rows, plus the passes that fill and drain them.
#[derive(Debug, Clone)]
pub struct BlockGrid {
    geometry: GridGeometry,
    /// Block rows covered by this grid.
    block_rows: Range<u32>,
    /// Row-major accumulators, `grid_width` per block row.
    blocks: Vec<BlockAccumulator>,
}

impl BlockGrid {
    /// A grid covering every block row of the geometry.
    pub fn new(geometry: GridGeometry) -> Self {
        Self::for_band(geometry, 0..geometry.grid_height)
    }

    /// A grid covering only `block_rows`, clipped to the geometry.
    pub fn for_band(geometry: GridGeometry, block_rows: Range<u32>) -> Self {
        let end = block_rows.end.min(geometry.grid_height);
        let start = block_rows.start.min(end);
        let num_blocks = (end - start) as usize * geometry.grid_width as usize;

        Self {
            geometry,
            block_rows: start..end,
            blocks: vec![BlockAccumulator::new(); num_blocks],
        }
    }

    pub fn block_rows(&self) -> Range<u32> {
        self.block_rows.clone()
    }

    pub fn blocks(&self) -> &[BlockAccumulator] {
        &self.blocks
    }

    /// Source pixel rows spanned by this band.
    fn pixel_rows(&self) -> Range<u32> {
        self.block_rows.start * self.geometry.block_height
            ..self.block_rows.end * self.geometry.block_height
    }

    /// Index into `blocks` for pixel `(x, y)`, or `None` outside this band.
    #[inline]
    pub fn block_index(&self, x: u32, y: u32) -> Option<usize> {
        let (block_x, block_y) = self.geometry.block_of(x, y)?;
        if !self.block_rows.contains(&block_y) {
            return None;
        }
        let local_row = (block_y - self.block_rows.start) as usize;
        Some(local_row * self.geometry.grid_width as usize + block_x as usize)
    }

    /// Accumulation pass: folds every in-band, non-cropped source pixel into its block.
    pub fn accumulate(&mut self, image: &RgbaImage) {
        for y in self.pixel_rows() {
            for x in 0..self.geometry.effective_width {
                if let Some(index) = self.block_index(x, y) {
                    self.blocks[index].add(&Pixel::from(image.get_pixel(x, y)));
                }
            }
        }
    }

    /// Averaging pass: one flat color per block, in the same order as `blocks`.
    pub fn averages(&self) -> Vec<Pixel> {
        let area = self.geometry.block_area();
        self.blocks.iter().map(|block| block.average(area)).collect()
    }

    /// Paint pass: writes this band's averages into `output`.
    ///
    /// `output` must be at least the effective size of the geometry.
    pub fn paint_into(&self, averages: &[Pixel], output: &mut RgbaImage) {
        for y in self.pixel_rows() {
            for x in 0..self.geometry.effective_width {
                if let Some(index) = self.block_index(x, y) {
                    output.put_pixel(x, y, averages[index].into());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Block lookup by walking block boundaries until one lies past the coordinate.
    fn scan_block_coordinate(coordinate: u32, block: u32, extent: u32) -> Option<u32> {
        let mut counter = 0u32;
        let mut boundary = 0u32;
        while boundary <= extent {
            counter += 1;
            if coordinate < boundary {
                return Some(counter - 2);
            }
            boundary += block;
        }
        None
    }

    #[test]
    fn rejects_non_positive_block_sizes() {
        for (w, h) in [(0, 2), (2, 0), (-1, 2), (2, -5), (0, 0)] {
            let result = GridGeometry::new(10, 10, w, h);
            assert!(
                matches!(result, Err(PixelizeError::InvalidParameter(_))),
                "{w}x{h} should be rejected, got {result:?}"
            );
        }
    }

    #[test]
    fn rejects_blocks_larger_than_image() {
        assert!(matches!(
            GridGeometry::new(10, 10, 11, 2),
            Err(PixelizeError::ParameterTooLarge { block_width: 11, .. })
        ));
        assert!(matches!(
            GridGeometry::new(10, 10, 2, 11),
            Err(PixelizeError::ParameterTooLarge { block_height: 11, .. })
        ));
        assert!(matches!(
            GridGeometry::new(0, 10, 1, 1),
            Err(PixelizeError::ParameterTooLarge { .. })
        ));
    }

    #[test]
    fn truncates_to_whole_blocks() {
        let geometry = GridGeometry::new(10, 7, 3, 2).unwrap();
        assert_eq!(geometry.effective_width, 9);
        assert_eq!(geometry.effective_height, 6);
        assert_eq!((geometry.grid_width, geometry.grid_height), (3, 3));
        assert_eq!(geometry.block_of(9, 0), None);
        assert_eq!(geometry.block_of(8, 5), Some((2, 2)));
    }

    #[test]
    fn band_only_sees_its_rows() {
        let geometry = GridGeometry::new(4, 6, 2, 2).unwrap();
        let band = BlockGrid::for_band(geometry, 1..2);
        assert_eq!(band.blocks().len(), 2);
        assert_eq!(band.block_index(0, 1), None);
        assert_eq!(band.block_index(3, 2), Some(1));
        assert_eq!(band.block_index(0, 4), None);
    }

    #[test]
    fn band_is_clipped_to_grid() {
        let geometry = GridGeometry::new(4, 4, 2, 2).unwrap();
        let band = BlockGrid::for_band(geometry, 1..10);
        assert_eq!(band.block_rows(), 1..2);
        assert_eq!(band.blocks().len(), 2);
    }

    #[test]
    fn accumulates_every_effective_pixel_once() {
        let image = RgbaImage::from_pixel(5, 5, image::Rgba([1, 2, 3, 4]));
        let geometry = GridGeometry::new(5, 5, 2, 2).unwrap();
        let mut grid = BlockGrid::new(geometry);
        grid.accumulate(&image);

        for block in grid.blocks() {
            assert_eq!(block.pixel_count, 4);
            assert_eq!(block.weighted_red, 16);
            assert_eq!(block.weighted_blue, 48);
            assert_eq!(block.sum_alpha, 16);
        }
    }

    proptest! {
        #[test]
        fn direct_mapping_matches_boundary_scan(
            width in 1u32..200,
            height in 1u32..200,
            block_width in 1i32..50,
            block_height in 1i32..50,
            x_seed in any::<u32>(),
            y_seed in any::<u32>(),
        ) {
            prop_assume!(block_width as u32 <= width && block_height as u32 <= height);
            let geometry = GridGeometry::new(width, height, block_width, block_height).unwrap();
            let x = x_seed % geometry.effective_width;
            let y = y_seed % geometry.effective_height;

            let scanned = (
                scan_block_coordinate(x, geometry.block_width, geometry.effective_width),
                scan_block_coordinate(y, geometry.block_height, geometry.effective_height),
            );
            let (block_x, block_y) = geometry.block_of(x, y).unwrap();
            prop_assert_eq!(scanned, (Some(block_x), Some(block_y)));

            let grid = BlockGrid::new(geometry);
            let expected_index = scanned.1.unwrap() as usize * geometry.grid_width as usize
                + scanned.0.unwrap() as usize;
            prop_assert_eq!(grid.block_index(x, y), Some(expected_index));
        }
    }
}
