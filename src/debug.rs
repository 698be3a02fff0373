use image::DynamicImage;
use log::debug;
use std::path::{Path, PathBuf};

/// Side-channel image dumps written when a decode attempt fails
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugArtifact {
    /// The clone of the caller's image
    Original,
    /// The enhanced retry image
    Enhanced,
}

impl DebugArtifact {
    /// Fixed file name; each failing run overwrites the previous dump
    pub fn file_name(self) -> &'static str {
        match self {
            DebugArtifact::Original => "debug_original.png",
            DebugArtifact::Enhanced => "debug_enhanced.png",
        }
    }
}

/// Best-effort writer for [`DebugArtifact`]s
#[derive(Debug, Clone)]
pub(crate) struct DebugSink {
    dir: PathBuf,
}

impl DebugSink {
    pub(crate) fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub(crate) fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write the artifact; failures are logged and otherwise ignored
    pub(crate) fn write(&self, artifact: DebugArtifact, image: &DynamicImage) {
        let path = self.dir.join(artifact.file_name());
        match image.save(&path) {
            Ok(()) => debug!("Saved debug image: {}", path.display()),
            Err(err) => debug!("Could not save debug image {}: {err}", path.display()),
        }
    }
}
