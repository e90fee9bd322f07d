use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::error::{Result, SentinelError};
use crate::overlay::OverlayStyle;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub camera_id: i32,
    pub model_path: String,
    /// Square input edge of the landmark model, in pixels.
    pub model_input_size: u32,
    /// Canvas size used when no camera frame sets it.
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub pose: PoseOptions,
    pub overlay: OverlayStyle,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            camera_id: 0,
            model_path: "models/pose_landmark_full.onnx".to_string(),
            model_input_size: 256,
            canvas_width: 640,
            canvas_height: 480,
            pose: PoseOptions::default(),
            overlay: OverlayStyle::default(),
        }
    }
}

/// Options handed to the pose estimator untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoseOptions {
    pub model_complexity: u8,
    pub smooth_landmarks: bool,
    pub min_detection_confidence: f32,
    pub min_tracking_confidence: f32,
}

impl Default for PoseOptions {
    fn default() -> Self {
        Self {
            model_complexity: 1,
            smooth_landmarks: true,
            min_detection_confidence: 0.6,
            min_tracking_confidence: 0.6,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| SentinelError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&content)?)
    }

    /// Loads `path` when given, built-in defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let config = Self::load(path)?;
                info!(path = %path.display(), "loaded config");
                Ok(config)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).map_err(|source| SentinelError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::Rgb;

    #[test]
    fn save_then_load_preserves_everything() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sentinel.toml");

        let mut config = Config::default();
        config.camera_id = 2;
        config.pose.min_detection_confidence = 0.75;
        config.overlay.head_box.color = Rgb(255, 0, 0);
        config.save(&path).unwrap();

        assert_eq!(Config::load(&path).unwrap(), config);
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.toml");
        fs::write(
            &path,
            "camera_id = 1\n\n[pose]\nsmooth_landmarks = false\n\n[overlay.gravity_line]\ncolor = \"#ff00ff\"\nwidth = 1\n",
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.camera_id, 1);
        assert!(!config.pose.smooth_landmarks);
        assert_eq!(config.pose.min_tracking_confidence, 0.6);
        assert_eq!(config.overlay.gravity_line.color, Rgb(255, 0, 255));
        assert_eq!(config.overlay.gravity_line.dash, None);
        assert_eq!(config.overlay.head_box, OverlayStyle::default().head_box);
        assert_eq!(config.model_input_size, 256);
    }

    #[test]
    fn bad_colour_is_rejected() {
        let err = toml::from_str::<Config>("[overlay.skeleton]\ncolor = \"blue\"\nwidth = 3\n")
            .unwrap_err();
        assert!(err.to_string().contains("#rrggbb"), "{err}");
    }

    #[test]
    fn missing_file_reports_path() {
        let err = Config::load(Path::new("/nonexistent/sentinel.toml")).unwrap_err();
        assert!(matches!(err, SentinelError::Read { .. }));
        assert!(err.to_string().contains("/nonexistent/sentinel.toml"));
    }

    #[test]
    fn no_path_means_defaults() {
        assert_eq!(Config::load_or_default(None).unwrap(), Config::default());
    }
}
