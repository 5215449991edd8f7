// THEORY:
// The `ParallelPixelizer` runs the same block-averaging transform as `Pixelizer`,
// spread over a pool of blocking tasks. The grid is cut into horizontal bands of
// block rows and each band goes to exactly one worker. Every block belongs to one
// band, so no two workers ever touch the same accumulator and no locking is needed.
// Painting happens on the caller's task once every band has reported back.
//
// The output is byte-identical to the sequential pixelizer for every input.

use std::sync::Arc;

use futures::future::try_join_all;
use image::RgbaImage;
use log::debug;

use crate::core_modules::block_grid::BlockGrid;
use crate::core_modules::pixel::pixel::Pixel;
use crate::pixelizer::{PixelizerConfig, log_geometry};
use crate::{PixelizeError, PixelizeResult};

/// A band of the grid after accumulation and averaging.
struct BandResult {
    grid: BlockGrid,
    averages: Vec<Pixel>,
}

pub struct ParallelPixelizer {
    config: PixelizerConfig,
    workers: usize,
}

impl ParallelPixelizer {
    /// Creates a pixelizer with one worker per logical CPU.
    pub fn new(config: PixelizerConfig) -> Self {
        Self {
            config,
            workers: num_cpus::get().max(1),
        }
    }

    /// Overrides the number of workers (at least one).
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Pixelizes `image` with up to `workers` bands processed concurrently.
    pub async fn pixelize(&self, image: impl Into<Arc<RgbaImage>>) -> PixelizeResult<RgbaImage> {
        let image: Arc<RgbaImage> = image.into();
        let geometry = self.config.geometry(image.width(), image.height())?;
        log_geometry(&image, &geometry);

        let workers = self.workers.min(geometry.grid_height as usize).max(1) as u32;
        let rows_per_band = geometry.grid_height.div_ceil(workers);
        debug!(
            "Splitting {} block rows into bands of {} across {} workers",
            geometry.grid_height, rows_per_band, workers
        );

        let tasks = (0..geometry.grid_height)
            .step_by(rows_per_band as usize)
            .map(|start| {
                let image = Arc::clone(&image);
                let band = start..(start + rows_per_band);
                tokio::task::spawn_blocking(move || {
                    let mut grid = BlockGrid::for_band(geometry, band);
                    grid.accumulate(&image);
                    let averages = grid.averages();
                    BandResult { grid, averages }
                })
            });

        let bands = try_join_all(tasks)
            .await
            .map_err(|e| PixelizeError::Worker(e.to_string()))?;

        let mut output = RgbaImage::new(geometry.effective_width, geometry.effective_height);
        for band in &bands {
            band.grid.paint_into(&band.averages, &mut output);
        }
        debug!("Finished pixelizing image in {} bands", bands.len());

        Ok(output)
    }
}
