// Collaborators around the pixelizer: decoding source files, encoding results as PNG,
// generating the sample gradient and naming output files. The transform itself never
// calls into this module.

pub mod image_helper {
    use std::fs::File;
    use std::io::BufWriter;
    use std::path::Path;

    use image::{DynamicImage, ImageEncoder, ImageReader, Rgba, RgbaImage};
    use log::debug;
    use rand::Rng;
    use rand::distr::Alphanumeric;

    use crate::core_modules::pixel::pixel::Pixel;
    use crate::PixelizeResult;

    /// Decodes a PNG or JPEG (or any format `image` recognizes) from `path`.
    pub fn load(path: impl AsRef<Path>) -> PixelizeResult<DynamicImage> {
        let path = path.as_ref();
        let image = ImageReader::open(path)?.with_guessed_format()?.decode()?;
        debug!(
            "Loaded {} ({}x{})",
            path.display(),
            image.width(),
            image.height()
        );
        Ok(image)
    }

    /// Encodes `image` as an 8-bit RGBA PNG at `path`, creating parent directories.
    pub fn save(path: impl AsRef<Path>, image: &RgbaImage) -> PixelizeResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let output = BufWriter::new(File::create(path)?);
        let encoder = image::codecs::png::PngEncoder::new(output);
        encoder.write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            image::ExtendedColorType::Rgba8,
        )?;

        debug!("Saved {}", path.display());
        Ok(())
    }

    /// A diagonal grayscale gradient: pixel (x, y) is gray level x + y, saturating at white.
    pub fn create_sample_image(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| {
            let level = x as i64 + y as i64;
            Rgba::from(Pixel::clamped(level, level, level, 255))
        })
    }

    /// A random alphanumeric identifier of `length` characters.
    pub fn random_identifier(length: usize) -> String {
        rand::rng()
            .sample_iter(&Alphanumeric)
            .take(length)
            .map(char::from)
            .collect()
    }

    /// File name for a pixelized output: `<identifier>_<block width>_<block height>.png`.
    pub fn output_file_name(identifier: &str, block_width: i32, block_height: i32) -> String {
        format!("{identifier}_{block_width}_{block_height}.png")
    }
}
