use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use log::{error, info};
use qr_reader::enhance::{
    DEFAULT_MIN_SIZE, adjust_brightness, enhance, enhance_contrast, needs_enhancement,
    remove_noise, resize_to_min, sharpen,
};
use qr_reader::logging::{self, LogLevel};
use qr_reader::tools::loader::{dataset_iter, image_info, load_from_camera, load_from_file};
use qr_reader::tools::report::{Visualizer, console_summary, save_batch_results, save_to_text_file};
use qr_reader::utils::grayscale::{luminance, mean_luminance};
use qr_reader::{DetectionResult, DetectorConfig, QrDetector, RqrrDecoder, quality_score};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "qrtool", version, about = "QR reader CLI tools")]
struct Cli {
    /// Minimum log level (debug, info, warning, error)
    #[arg(long, global = true, default_value = "info")]
    log_level: LogLevel,
    /// Skip the enhancement retry
    #[arg(long, global = true)]
    no_preprocessing: bool,
    /// Set the reserved multi-symbol flag
    #[arg(long, global = true)]
    multi_qr: bool,
    /// Directory for debug_original.png / debug_enhanced.png
    #[arg(long, global = true)]
    debug_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run QR detection on a single image
    Detect {
        #[arg(long)]
        image: PathBuf,
        /// Write qr_result.txt and qr_visualization.png here on success
        #[arg(long)]
        output_dir: Option<PathBuf>,
        /// TTF/OTF font used for visualization labels
        #[arg(long)]
        font: Option<PathBuf>,
    },
    /// Run detection over every image under a directory
    Batch {
        #[arg(long)]
        root: PathBuf,
        #[arg(long)]
        limit: Option<usize>,
        /// Report written to `<output>_batch.txt`
        #[arg(long, default_value = "qr_results")]
        output: PathBuf,
    },
    /// Print image info, sharpness and brightness
    Inspect {
        #[arg(long)]
        image: PathBuf,
    },
    /// Apply one enhancement and save the result
    Enhance {
        #[arg(long)]
        image: PathBuf,
        #[arg(long)]
        output: PathBuf,
        #[arg(long, value_enum, default_value_t = EnhanceOp::Full)]
        op: EnhanceOp,
        /// Gain for `--op brightness`
        #[arg(long, default_value_t = 1.0)]
        alpha: f32,
        /// Offset for `--op brightness`
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        beta: i32,
        /// Minimum side for `--op resize`
        #[arg(long, default_value_t = DEFAULT_MIN_SIZE)]
        min_size: u32,
    },
    /// Try to capture and decode from a camera
    Webcam {
        #[arg(long, default_value_t = 0)]
        device: u32,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum EnhanceOp {
    /// The detector's retry pipeline
    Full,
    Contrast,
    Denoise,
    Sharpen,
    Resize,
    Brightness,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_level);

    let mut config = DetectorConfig::from_env();
    if cli.no_preprocessing {
        config.preprocessing_enabled = false;
    }
    if cli.multi_qr {
        config.multiple_qr_enabled = true;
    }
    if let Some(dir) = cli.debug_dir {
        config.debug_dir = dir;
    }

    match cli.command {
        Command::Detect {
            image,
            output_dir,
            font,
        } => detect_cmd(config, &image, output_dir.as_deref(), font.as_deref()),
        Command::Batch {
            root,
            limit,
            output,
        } => batch_cmd(config, &root, limit, &output),
        Command::Inspect { image } => inspect_cmd(&image),
        Command::Enhance {
            image,
            output,
            op,
            alpha,
            beta,
            min_size,
        } => enhance_cmd(&image, &output, op, alpha, beta, min_size),
        Command::Webcam { device } => webcam_cmd(config, device),
    }
}

fn new_detector(config: DetectorConfig) -> QrDetector {
    QrDetector::with_decoder(RqrrDecoder::new(), config)
}

fn print_stats(detector: &QrDetector) {
    info!("Detection statistics:");
    info!("  Total detections: {}", detector.total_detections());
    info!("  Successful: {}", detector.successful_detections());
    info!(
        "  Success rate: {}%",
        (detector.success_rate() * 100.0) as i32
    );
}

fn detect_cmd(
    config: DetectorConfig,
    image: &Path,
    output_dir: Option<&Path>,
    font: Option<&Path>,
) -> Result<()> {
    let loaded = load_from_file(image)
        .with_context(|| format!("Failed to load image {}", image.display()))?;
    let mut detector = new_detector(config);

    let start = Instant::now();
    let result = detector.detect(&loaded.image);
    let elapsed = start.elapsed();

    print!("{}", console_summary(&result));
    println!("Time: {:.2}ms", elapsed.as_secs_f64() * 1000.0);

    if let (Some(dir), DetectionResult::Success(_)) = (output_dir, &result) {
        let visualizer = match font {
            Some(path) => Visualizer::with_font_file(path)?,
            None => Visualizer::new(),
        };
        save_to_text_file(&result, dir.join("qr_result.txt"))?;
        visualizer.save(&result, dir.join("qr_visualization.png"))?;
    }

    print_stats(&detector);
    Ok(())
}

fn batch_cmd(
    config: DetectorConfig,
    root: &Path,
    limit: Option<usize>,
    output: &Path,
) -> Result<()> {
    if !root.exists() {
        bail!("Dataset root not found: {}", root.display());
    }

    let mut detector = new_detector(config);
    let mut results = Vec::new();
    let start = Instant::now();

    for path in dataset_iter(root, limit) {
        let loaded = match load_from_file(&path) {
            Ok(loaded) => loaded,
            Err(err) => {
                error!("Skipping {}: {err}", path.display());
                continue;
            }
        };
        let result = detector.detect(&loaded.image);
        let status = if result.is_success() { "OK  " } else { "MISS" };
        println!("[{status}] {}", path.display());
        results.push(result);
    }

    if results.is_empty() {
        println!("No images found under {}", root.display());
        return Ok(());
    }

    let report = save_batch_results(&results, output)?;
    println!(
        "Processed {} images in {:.2}s, report: {}",
        results.len(),
        start.elapsed().as_secs_f64(),
        report.display()
    );
    print_stats(&detector);
    Ok(())
}

fn inspect_cmd(image: &Path) -> Result<()> {
    let loaded = load_from_file(image)
        .with_context(|| format!("Failed to load image {}", image.display()))?;
    let gray = luminance(&loaded.image);

    println!("Image: {}", loaded.source);
    println!("Info: {}", image_info(&loaded.image));
    println!("Mean luminance: {:.1}", mean_luminance(&gray));
    println!("Quality score: {:.2}", quality_score(&loaded.image));
    println!("Needs enhancement: {}", needs_enhancement(&loaded.image));
    Ok(())
}

fn enhance_cmd(
    image: &Path,
    output: &Path,
    op: EnhanceOp,
    alpha: f32,
    beta: i32,
    min_size: u32,
) -> Result<()> {
    let loaded = load_from_file(image)
        .with_context(|| format!("Failed to load image {}", image.display()))?;
    let source = &loaded.image;

    let processed = match op {
        EnhanceOp::Full => enhance(source),
        EnhanceOp::Contrast => enhance_contrast(source),
        EnhanceOp::Denoise => remove_noise(source),
        EnhanceOp::Sharpen => sharpen(source),
        EnhanceOp::Resize => resize_to_min(source, min_size),
        EnhanceOp::Brightness => adjust_brightness(source, alpha, beta),
    };

    processed
        .save(output)
        .with_context(|| format!("Failed to save {}", output.display()))?;
    println!("Saved {} ({})", output.display(), image_info(&processed));
    Ok(())
}

fn webcam_cmd(config: DetectorConfig, device: u32) -> Result<()> {
    let mut detector = new_detector(config);
    match load_from_camera(device) {
        Ok(loaded) => {
            let result = detector.detect(&loaded.image);
            print!("{}", console_summary(&result));
        }
        Err(err) => {
            error!("{err}");
            let result = detector.detect_from_webcam();
            print!("{}", console_summary(&result));
        }
    }
    Ok(())
}
