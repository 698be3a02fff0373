//! Detector configuration
//!
//! Defaults match the documented behaviour; `from_env` lets batch scripts
//! flip them without touching the command line.

use std::path::PathBuf;

fn parse_env_bool(name: &str, default: bool) -> bool {
    match std::env::var(name) {
        Ok(value) => match value.trim() {
            "1" | "true" | "TRUE" | "yes" | "YES" | "on" => true,
            "0" | "false" | "FALSE" | "no" | "NO" | "off" => false,
            _ => default,
        },
        Err(_) => default,
    }
}

fn parse_env_path(name: &str, default: PathBuf) -> PathBuf {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or(default)
}

/// Settings for [`crate::QrDetector`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectorConfig {
    /// Retry failed raw decodes on an enhanced image
    pub preprocessing_enabled: bool,
    /// Reserved for multi-symbol support; currently has no effect
    pub multiple_qr_enabled: bool,
    /// Directory receiving `debug_original.png` / `debug_enhanced.png`
    pub debug_dir: PathBuf,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            preprocessing_enabled: true,
            multiple_qr_enabled: false,
            debug_dir: PathBuf::from("."),
        }
    }
}

impl DetectorConfig {
    /// Defaults overridden by `QR_PREPROCESSING`, `QR_MULTIPLE_QR` and `QR_DEBUG_DIR`
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            preprocessing_enabled: parse_env_bool(
                "QR_PREPROCESSING",
                defaults.preprocessing_enabled,
            ),
            multiple_qr_enabled: parse_env_bool("QR_MULTIPLE_QR", defaults.multiple_qr_enabled),
            debug_dir: parse_env_path("QR_DEBUG_DIR", defaults.debug_dir),
        }
    }

    /// Builder-style override of the debug artifact directory
    pub fn with_debug_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.debug_dir = dir.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = DetectorConfig::default();
        assert!(config.preprocessing_enabled);
        assert!(!config.multiple_qr_enabled);
        assert_eq!(config.debug_dir, PathBuf::from("."));
    }

    #[test]
    fn unknown_env_values_keep_default() {
        // Unset variables fall back to the default
        assert!(parse_env_bool("QR_READER_TEST_UNSET_FLAG", true));
        assert!(!parse_env_bool("QR_READER_TEST_UNSET_FLAG", false));
        assert_eq!(
            parse_env_path("QR_READER_TEST_UNSET_DIR", PathBuf::from("x")),
            PathBuf::from("x")
        );
    }

    #[test]
    fn with_debug_dir_overrides() {
        let config = DetectorConfig::default().with_debug_dir("/tmp/qr");
        assert_eq!(config.debug_dir, PathBuf::from("/tmp/qr"));
    }
}
