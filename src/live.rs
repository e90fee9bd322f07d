//! Webcam capture, ONNX pose inference and an OpenCV preview window.

use anyhow::Result;
use opencv::core::{Mat, Point, Rect, Scalar, CV_8UC3};
use opencv::prelude::*;
use opencv::{highgui, imgproc};
use tracing::info;

use crate::camera::Camera;
use crate::inference::PoseDetector;
use crate::overlay::{dash_segments, PixelRect, Rgb, Stroke, Surface};
use crate::source::{FrameSource, SourceFrame};

const ESC: i32 = 27;

pub struct LiveSource {
    camera: Camera,
    detector: PoseDetector,
}

impl LiveSource {
    pub fn new(camera: Camera, detector: PoseDetector) -> Self {
        Self { camera, detector }
    }
}

impl FrameSource for LiveSource {
    type Image = Mat;

    fn start(&mut self) -> Result<()> {
        self.camera.start()
    }

    fn next_frame(&mut self) -> Result<Option<SourceFrame<Mat>>> {
        let frame = self.camera.read_frame()?;
        let landmarks = self.detector.detect(&frame)?;
        Ok(Some(SourceFrame {
            image: Some(frame),
            landmarks,
            offset: None,
        }))
    }
}

/// Draws onto a copy of the camera frame and shows it in a window.
pub struct WindowSurface {
    title: String,
    canvas: Mat,
}

impl WindowSurface {
    pub fn new(title: &str, width: u32, height: u32) -> Result<Self> {
        highgui::named_window(title, highgui::WINDOW_NORMAL)?;
        let canvas = Mat::zeros(height as i32, width as i32, CV_8UC3)?.to_mat()?;
        info!(title, "preview window opened");
        Ok(Self {
            title: title.to_string(),
            canvas,
        })
    }
}

fn bgr(c: Rgb) -> Scalar {
    Scalar::new(c.2 as f64, c.1 as f64, c.0 as f64, 0.0)
}

fn px(p: (f32, f32)) -> Point {
    Point::new(p.0.round() as i32, p.1.round() as i32)
}

impl Surface for WindowSurface {
    type Image = Mat;

    fn size(&self) -> (u32, u32) {
        (self.canvas.cols().max(0) as u32, self.canvas.rows().max(0) as u32)
    }

    fn clear(&mut self, backdrop: Option<&Mat>) -> Result<()> {
        match backdrop {
            Some(frame) => frame.copy_to(&mut self.canvas)?,
            None => {
                self.canvas.set_to(&Scalar::all(0.0), &Mat::default())?;
            }
        }
        Ok(())
    }

    fn stroke_rect(&mut self, rect: PixelRect, stroke: &Stroke) -> Result<()> {
        let rect = Rect::new(
            rect.x.round() as i32,
            rect.y.round() as i32,
            rect.width.round() as i32,
            rect.height.round() as i32,
        );
        imgproc::rectangle(
            &mut self.canvas,
            rect,
            bgr(stroke.color),
            stroke.width as i32,
            imgproc::LINE_8,
            0,
        )?;
        Ok(())
    }

    fn stroke_line(&mut self, from: (f32, f32), to: (f32, f32), stroke: &Stroke) -> Result<()> {
        for (a, b) in dash_segments(from, to, stroke.dash) {
            imgproc::line(
                &mut self.canvas,
                px(a),
                px(b),
                bgr(stroke.color),
                stroke.width as i32,
                imgproc::LINE_8,
                0,
            )?;
        }
        Ok(())
    }

    fn present(&mut self) -> Result<bool> {
        highgui::imshow(&self.title, &self.canvas)?;
        Ok(highgui::wait_key(1)? != ESC)
    }
}
