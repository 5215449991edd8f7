use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use log::info;
use pixelizer::utils::image_helper::image_helper;
use pixelizer::{ParallelPixelizer, Pixelizer, PixelizerConfig};

const SAMPLE_FILE_NAME: &str = "sample.png";
const IDENTIFIER_LENGTH: usize = 8;

/// Pixelize the input image by averaging it over rectangular blocks.
#[derive(Parser, Debug, Clone)]
#[command(name = "pixelize", version, about)]
struct Args {
    /// Source image (PNG or JPEG). A missing `sample.png` is generated first.
    #[arg(long, value_name = "FILE", default_value = SAMPLE_FILE_NAME)]
    filename: PathBuf,

    /// Width of one block in source pixels.
    #[arg(
        long = "pixel-width",
        visible_alias = "pixelWidth",
        value_name = "INT",
        default_value_t = 2,
        allow_negative_numbers = true
    )]
    pixel_width: i32,

    /// Height of one block in source pixels.
    #[arg(
        long = "pixel-height",
        visible_alias = "pixelHeight",
        value_name = "INT",
        default_value_t = 2,
        allow_negative_numbers = true
    )]
    pixel_height: i32,

    /// Directory the pixelized PNG is written to.
    #[arg(long, value_name = "DIR", default_value = "output")]
    output_dir: PathBuf,

    /// Side length of the generated sample image.
    #[arg(long, value_name = "UINT", default_value_t = 100)]
    sample_size: u32,

    /// Spread the work over one worker per CPU.
    #[arg(long)]
    parallel: bool,

    /// Prints debug information verbosely.
    #[arg(short, long)]
    verbose: bool,
}

fn init_logger(verbose: bool) {
    use std::io::Write;

    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format(|buf, record| {
            let style = buf.default_level_style(record.level());
            writeln!(
                buf,
                "[{style}{}{style:#} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}

fn is_sample_path(path: &Path) -> bool {
    path.file_name().is_some_and(|name| name == SAMPLE_FILE_NAME)
}

async fn run(args: &Args) -> anyhow::Result<PathBuf> {
    // --- 1. Source Preparation ---
    if !args.filename.exists() && is_sample_path(&args.filename) {
        info!(
            "Generating {}x{} sample image at {}",
            args.sample_size,
            args.sample_size,
            args.filename.display()
        );
        let sample = image_helper::create_sample_image(args.sample_size, args.sample_size);
        image_helper::save(&args.filename, &sample)
            .with_context(|| format!("failed to write sample image {}", args.filename.display()))?;
    }

    info!("Using input file: {}", args.filename.display());
    let source = image_helper::load(&args.filename)
        .with_context(|| format!("failed to load {}", args.filename.display()))?;

    // --- 2. Pixelization ---
    let config = PixelizerConfig::new(args.pixel_width, args.pixel_height);
    let pixelized = if args.parallel {
        let pixelizer = ParallelPixelizer::new(config);
        info!("Using {} workers", pixelizer.workers());
        pixelizer.pixelize(source.into_rgba8()).await?
    } else {
        Pixelizer::new(config).pixelize_dynamic(&source)?
    };

    // --- 3. Output ---
    let output_path = args.output_dir.join(image_helper::output_file_name(
        &image_helper::random_identifier(IDENTIFIER_LENGTH),
        args.pixel_width,
        args.pixel_height,
    ));
    image_helper::save(&output_path, &pixelized)
        .with_context(|| format!("failed to write {}", output_path.display()))?;

    info!("Output saved to {}", output_path.display());
    Ok(output_path)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logger(args.verbose);

    run(&args).await?;
    Ok(())
}
