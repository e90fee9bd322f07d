use opencv::{
    prelude::*,
    videoio::{self, VideoCapture},
};
use anyhow::Result;
use tracing::info;

pub struct Camera {
    device_id: i32,
    capture: Option<VideoCapture>,
}

impl Camera {
    pub fn new(device_id: i32) -> Self {
        Self {
            device_id,
            capture: None,
        }
    }

    /// Opens the device. Frames can only be read after this.
    pub fn start(&mut self) -> Result<()> {
        let capture = VideoCapture::new(self.device_id, videoio::CAP_ANY)?;

        if !capture.is_opened()? {
            anyhow::bail!("Failed to open camera {}", self.device_id);
        }

        info!(device = self.device_id, "camera started");
        self.capture = Some(capture);
        Ok(())
    }

    pub fn read_frame(&mut self) -> Result<Mat> {
        let capture = self
            .capture
            .as_mut()
            .ok_or_else(|| anyhow::anyhow!("camera {} not started", self.device_id))?;

        let mut frame = Mat::default();
        capture.read(&mut frame)?;

        if frame.empty() {
            anyhow::bail!("Empty frame");
        }

        Ok(frame)
    }
}
