use crate::error::LoadError;
use image::{ColorType, DynamicImage};
use log::{debug, error, info};
use std::fs;
use std::path::{Path, PathBuf};

/// Extensions accepted by [`load_from_file`], lower-case with the dot
pub const SUPPORTED_FORMATS: &[&str] = &[".jpg", ".jpeg", ".png", ".bmp", ".tiff", ".tif", ".webp"];

/// A decoded image and where it came from
#[derive(Debug, Clone)]
pub struct LoadedImage {
    /// Decoded pixels
    pub image: DynamicImage,
    /// File path, or `webcam_device_<n>` for captures
    pub source: String,
}

/// Lower-cased extension of `path` including the dot, or empty
pub fn file_extension(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}

/// Whether `extension` (as returned by [`file_extension`]) is accepted
pub fn is_supported_format(extension: &str) -> bool {
    SUPPORTED_FORMATS.contains(&extension)
}

/// Load an image from disk.
///
/// Checks existence first, then the extension whitelist, then decodes.
pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<LoadedImage, LoadError> {
    let path = path.as_ref();
    debug!("Starting: Loading image from file: {}", path.display());

    if !path.exists() {
        error!("File does not exist: {}", path.display());
        return Err(LoadError::NotFound(path.to_path_buf()));
    }

    let extension = file_extension(path);
    if !is_supported_format(&extension) {
        error!("Unsupported image format: {extension}");
        return Err(LoadError::UnsupportedFormat(extension));
    }

    let image = image::open(path).map_err(|source| {
        error!("Failed to load image (may be corrupted): {}", path.display());
        LoadError::Corrupted {
            path: path.to_path_buf(),
            source,
        }
    })?;
    if !is_valid_image(&image) {
        return Err(LoadError::Empty(path.to_path_buf()));
    }

    info!("Image loaded successfully: {}", image_info(&image));
    debug!("Completed: Loading image from file");
    Ok(LoadedImage {
        image,
        source: path.display().to_string(),
    })
}

/// Camera capture is not wired to any backend; always fails
pub fn load_from_camera(index: u32) -> Result<LoadedImage, LoadError> {
    debug!("Starting: Loading image from webcam (device {index})");
    error!("Failed to open webcam device: {index}");
    Err(LoadError::CameraUnavailable(index))
}

/// Non-empty image
pub fn is_valid_image(image: &DynamicImage) -> bool {
    image.width() > 0 && image.height() > 0
}

/// `"WxH, <kind>, Channels: n"`, or `"Invalid image"` for an empty image
pub fn image_info(image: &DynamicImage) -> String {
    if !is_valid_image(image) {
        return "Invalid image".to_string();
    }
    let color = image.color();
    let kind = match color {
        ColorType::L8 | ColorType::L16 => "Grayscale",
        ColorType::La8 | ColorType::La16 => "Grayscale+Alpha",
        ColorType::Rgb8 | ColorType::Rgb16 | ColorType::Rgb32F => "RGB Color",
        ColorType::Rgba8 | ColorType::Rgba16 | ColorType::Rgba32F => "RGBA Color",
        _ => "Unknown type",
    };
    format!(
        "{}x{}, {}, Channels: {}",
        image.width(),
        image.height(),
        kind,
        color.channel_count()
    )
}

/// Recursively collect supported image files under `root`, sorted
pub fn collect_images<P: AsRef<Path>>(root: P) -> Vec<PathBuf> {
    let mut stack = vec![root.as_ref().to_path_buf()];
    let mut images = Vec::new();

    while let Some(dir) = stack.pop() {
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(_) => continue,
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
                continue;
            }
            if is_supported_format(&file_extension(&path)) {
                images.push(path);
            }
        }
    }

    images.sort();
    images
}

/// Iterate image paths under `root`, truncated to `limit` when given
pub fn dataset_iter<P: AsRef<Path>>(
    root: P,
    limit: Option<usize>,
) -> impl Iterator<Item = PathBuf> {
    let mut images = collect_images(root);
    if let Some(limit) = limit {
        images.truncate(limit);
    }
    images.into_iter()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, RgbImage};

    #[test]
    fn extension_is_case_insensitive() {
        assert_eq!(file_extension(Path::new("a/B.PNG")), ".png");
        assert_eq!(file_extension(Path::new("noext")), "");
        assert!(is_supported_format(".tif"));
        assert!(!is_supported_format(".gif"));
    }

    #[test]
    fn image_info_formats() {
        let rgb = DynamicImage::ImageRgb8(RgbImage::new(640, 480));
        assert_eq!(image_info(&rgb), "640x480, RGB Color, Channels: 3");
        let gray = DynamicImage::ImageLuma8(GrayImage::new(3, 2));
        assert_eq!(image_info(&gray), "3x2, Grayscale, Channels: 1");
        assert_eq!(image_info(&DynamicImage::new_rgb8(0, 5)), "Invalid image");
    }

    #[test]
    fn camera_is_unavailable() {
        let err = load_from_camera(2).unwrap_err();
        assert!(matches!(err, LoadError::CameraUnavailable(2)));
        assert_eq!(err.to_string(), "Failed to open webcam device: 2");
    }

    #[test]
    fn load_checks_existence_then_format() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.gif");
        assert!(matches!(
            load_from_file(&missing),
            Err(LoadError::NotFound(_))
        ));

        let gif = dir.path().join("present.gif");
        fs::write(&gif, b"GIF89a").unwrap();
        match load_from_file(&gif) {
            Err(LoadError::UnsupportedFormat(ext)) => assert_eq!(ext, ".gif"),
            other => panic!("unexpected: {other:?}"),
        }

        let broken = dir.path().join("broken.png");
        fs::write(&broken, b"not a png").unwrap();
        assert!(matches!(
            load_from_file(&broken),
            Err(LoadError::Corrupted { .. })
        ));
    }

    #[test]
    fn load_round_trips_a_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Frame.PNG");
        GrayImage::from_pixel(7, 5, image::Luma([90]))
            .save_with_format(&path, image::ImageFormat::Png)
            .unwrap();
        let loaded = load_from_file(&path).unwrap();
        assert_eq!(loaded.image.width(), 7);
        assert_eq!(loaded.image.height(), 5);
        assert!(loaded.source.ends_with("Frame.PNG"));
    }

    #[test]
    fn collects_sorted_supported_files() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested");
        fs::create_dir(&nested).unwrap();
        for name in ["b.jpg", "a.png", "notes.txt"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }
        fs::write(nested.join("c.webp"), b"x").unwrap();

        let found = collect_images(dir.path());
        let names: Vec<_> = found
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            names,
            vec![
                PathBuf::from("a.png"),
                PathBuf::from("b.jpg"),
                PathBuf::from("nested").join("c.webp"),
            ]
        );
        assert_eq!(dataset_iter(dir.path(), Some(1)).count(), 1);
    }
}
