// THEORY:
// The `Pixel` module is the most fundamental unit of the pixelizer. It is a "dumb"
// data container for a single RGBA pixel, with no knowledge of its neighbors or of
// the block it belongs to.
//
// Key architectural principles:
// 1.  **Byte Channels**: Every channel is an 8-bit value in [0, 255]. Whatever the
//     source bit depth was, it has been normalized to this range before a `Pixel`
//     exists.
// 2.  **Gamma-Encoded**: Channels are stored exactly as encoded in the image. No
//     linearization happens here, so averaging works on the encoded values.
// 3.  **Safe Construction**: Wide intermediate values (block sums, averages) only
//     become a `Pixel` through `Pixel::clamped`, which pins each channel into the
//     byte range before narrowing.

pub mod pixel {
    use image::Rgba;

    pub type Byte = u8;
    pub type Channel = Byte;
    /// A channel value wider than a byte, as produced by accumulation or averaging.
    pub type WideChannel = i64;

    /// A "dumb" data container representing a single RGBA pixel.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Pixel {
        /// The red channel value (0-255).
        pub red: Channel,
        /// The green channel value (0-255).
        pub green: Channel,
        /// The blue channel value (0-255).
        pub blue: Channel,
        /// The alpha (transparency) channel value (0-255).
        pub alpha: Channel,
    }

    impl Pixel {
        pub fn new(red: Channel, green: Channel, blue: Channel, alpha: Channel) -> Self {
            Pixel {
                red,
                green,
                blue,
                alpha,
            }
        }

        /// Builds a pixel from wide channel values, clamping each into [0, 255].
        pub fn clamped(
            red: WideChannel,
            green: WideChannel,
            blue: WideChannel,
            alpha: WideChannel,
        ) -> Self {
            Pixel {
                red: Self::clamp_channel(red),
                green: Self::clamp_channel(green),
                blue: Self::clamp_channel(blue),
                alpha: Self::clamp_channel(alpha),
            }
        }

        #[inline]
        fn clamp_channel(value: WideChannel) -> Channel {
            value.clamp(Channel::MIN as WideChannel, Channel::MAX as WideChannel) as Channel
        }
    }

    impl From<&Rgba<Byte>> for Pixel {
        fn from(rgba: &Rgba<Byte>) -> Self {
            let [red, green, blue, alpha] = rgba.0;
            Pixel::new(red, green, blue, alpha)
        }
    }

    impl From<Pixel> for Rgba<Byte> {
        fn from(pixel: Pixel) -> Self {
            Rgba([pixel.red, pixel.green, pixel.blue, pixel.alpha])
        }
    }
}
