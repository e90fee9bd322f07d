use anyhow::{Context, Result};
use ndarray::Array4;
use opencv::core::{AlgorithmHint, Mat, Size, Vec3f, CV_32FC3};
use opencv::imgproc;
use opencv::prelude::*;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Tensor;
use tracing::{info, warn};

use crate::config::PoseOptions;
use crate::landmark::{Landmark, LANDMARK_COUNT};

/// Values per landmark row in the model output: x, y, z, visibility, presence.
const LANDMARK_STRIDE: usize = 5;

/// Single-person BlazePose landmark model run through ONNX Runtime.
pub struct PoseDetector {
    session: Session,
    input_size: i32,
    options: PoseOptions,
    tracking: bool,
}

impl PoseDetector {
    pub fn new(model_path: &str, input_size: u32, options: PoseOptions) -> Result<Self> {
        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .commit_from_file(model_path)
            .with_context(|| format!("Failed to load pose model {model_path}"))?;

        info!(
            model = model_path,
            complexity = options.model_complexity,
            detection = options.min_detection_confidence,
            tracking = options.min_tracking_confidence,
            "pose model loaded"
        );
        if options.smooth_landmarks {
            warn!("smooth_landmarks is set but this backend has no temporal filter");
        }

        Ok(Self {
            session,
            input_size: input_size as i32,
            options,
            tracking: false,
        })
    }

    /// Landmarks for `frame`, or `None` when no person is found.
    pub fn detect(&mut self, frame: &Mat) -> Result<Option<Vec<Landmark>>> {
        let input = Tensor::from_array(self.preprocess(frame)?)?;
        let (values, presence) = {
            let outputs = self
                .session
                .run(ort::inputs![input])
                .context("Pose inference failed")?;

            let raw = outputs[0]
                .try_extract_array::<f32>()
                .context("Failed to extract landmarks")?;
            let flag = outputs[1]
                .try_extract_array::<f32>()
                .context("Failed to extract pose flag")?;
            (
                raw.iter().copied().collect::<Vec<f32>>(),
                flag.iter().copied().next().unwrap_or(0.0),
            )
        };

        let threshold = if self.tracking {
            self.options.min_tracking_confidence
        } else {
            self.options.min_detection_confidence
        };
        self.tracking = presence >= threshold;
        if !self.tracking {
            return Ok(None);
        }

        Ok(Some(self.postprocess(&values)?))
    }

    fn preprocess(&self, frame: &Mat) -> Result<Array4<f32>> {
        let mut rgb = Mat::default();
        imgproc::cvt_color(frame, &mut rgb, imgproc::COLOR_BGR2RGB, 0, AlgorithmHint::ALGO_HINT_DEFAULT)?;

        let mut resized = Mat::default();
        imgproc::resize(
            &rgb,
            &mut resized,
            Size::new(self.input_size, self.input_size),
            0.0,
            0.0,
            imgproc::INTER_LINEAR,
        )?;

        let mut float_img = Mat::default();
        resized.convert_to(&mut float_img, CV_32FC3, 1.0 / 255.0, 0.0)?;

        let side = self.input_size as usize;
        let pixels = float_img.data_typed::<Vec3f>()?;
        let mut tensor = Array4::<f32>::zeros((1, side, side, 3));
        for (i, px) in pixels.iter().enumerate() {
            let (y, x) = (i / side, i % side);
            for c in 0..3 {
                tensor[[0, y, x, c]] = px[c];
            }
        }
        Ok(tensor)
    }

    fn postprocess(&self, values: &[f32]) -> Result<Vec<Landmark>> {
        if values.len() < LANDMARK_COUNT * LANDMARK_STRIDE {
            anyhow::bail!(
                "landmark output too short: {} values, need {}",
                values.len(),
                LANDMARK_COUNT * LANDMARK_STRIDE
            );
        }
        Ok(decode_landmarks(values, self.input_size as f32))
    }
}

/// Converts model rows in input-pixel units to normalized landmarks.
pub fn decode_landmarks(values: &[f32], input_size: f32) -> Vec<Landmark> {
    values
        .chunks_exact(LANDMARK_STRIDE)
        .take(LANDMARK_COUNT)
        .map(|row| Landmark {
            x: row[0] / input_size,
            y: row[1] / input_size,
            z: row[2] / input_size,
            visibility: sigmoid(row[3]),
        })
        .collect()
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}
