//! I/O helpers around the detector: image loading and result reporting

/// Image loading and dataset walking
pub mod loader;
/// Text reports and visual overlays
pub mod report;

pub use loader::{LoadedImage, collect_images, dataset_iter, image_info, load_from_file};
pub use report::{Visualizer, console_summary, format_result, save_batch_results, save_to_text_file};
