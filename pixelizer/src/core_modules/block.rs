// THEORY:
// The `Block` module represents the running state of a single "fake pixel": one
// rectangular cell of the source image that will be repainted as a flat color.
//
// Key architectural principles:
// 1.  **Streaming Accumulation**: A block never stores the pixels it covers. It only
//     keeps per-channel running sums, so memory is four integers per block no matter
//     how large the block is.
// 2.  **Alpha Weighting**: Color channels are summed weighted by their pixel's alpha
//     (`color * alpha`), and divided back by the summed alpha. A fully transparent
//     pixel adds nothing to its block's color, only to its coverage. The block's
//     alpha is the plain average of the alphas.
// 3.  **Overflow Headroom**: Sums are `u64`. A weighted sum is at most 255 * 255 * area,
//     which stays in range for any block up to ~2.8e14 pixels, far past any image
//     that fits in memory. A block the size of the whole image is safe.
// 4.  **Truncating Average**: Every division truncates toward zero. Rounding would
//     shift exact pixel values.

pub mod block {
    use crate::core_modules::pixel::pixel::{Pixel, WideChannel};

    pub type ChannelSum = u64;

    /// Running per-channel sums for one block of the grid.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct BlockAccumulator {
        /// Sum of `red * alpha` over the block.
        pub weighted_red: ChannelSum,
        /// Sum of `green * alpha` over the block.
        pub weighted_green: ChannelSum,
        /// Sum of `blue * alpha` over the block.
        pub weighted_blue: ChannelSum,
        pub sum_alpha: ChannelSum,
        /// Number of source pixels folded into the sums.
        pub pixel_count: u64,
    }

    impl BlockAccumulator {
        pub fn new() -> Self {
            Self::default()
        }

        /// Adds one source pixel to the running sums.
        #[inline]
        pub fn add(&mut self, pixel: &Pixel) {
            let alpha = pixel.alpha as ChannelSum;
            self.weighted_red += pixel.red as ChannelSum * alpha;
            self.weighted_green += pixel.green as ChannelSum * alpha;
            self.weighted_blue += pixel.blue as ChannelSum * alpha;
            self.sum_alpha += alpha;
            self.pixel_count += 1;
        }

        /// Averages the block over `area` pixels (block width * block height).
        ///
        /// Color is `weighted / sum_alpha`, alpha is `sum_alpha / area`, both truncating,
        /// and every channel is clamped to the byte range before the pixel is built.
        /// An empty area or a fully transparent block yields transparent black.
        pub fn average(&self, area: u64) -> Pixel {
            if area == 0 || self.sum_alpha == 0 {
                return Pixel::default();
            }
            debug_assert_eq!(
                self.pixel_count, area,
                "block averaged over a different area than it accumulated"
            );

            Pixel::clamped(
                (self.weighted_red / self.sum_alpha) as WideChannel,
                (self.weighted_green / self.sum_alpha) as WideChannel,
                (self.weighted_blue / self.sum_alpha) as WideChannel,
                (self.sum_alpha / area) as WideChannel,
            )
        }
    }
}
