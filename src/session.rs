use std::time::Instant;

use anyhow::Result;
use tracing::{debug, info};

use crate::feedback::FeedbackSink;
use crate::overlay::{Overlay, Surface};
use crate::posture::{Feedback, FrameResult, PostureMonitor};
use crate::source::FrameSource;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub frames: u64,
    pub skipped: u64,
    /// Index of the frame on which the baseline was captured.
    pub calibrated_at: Option<u64>,
    pub good: u64,
    pub drifted: u64,
}

/// Runs frames from a source through the monitor, one at a time.
pub struct Session<S, R, F> {
    monitor: PostureMonitor,
    source: S,
    surface: R,
    sink: F,
    overlay: Overlay,
    stats: SessionStats,
}

impl<S, R, F> Session<S, R, F>
where
    S: FrameSource,
    R: Surface<Image = S::Image>,
    F: FeedbackSink,
{
    /// The warm-up clock starts here, not when [`run`](Self::run) is called.
    pub fn new(source: S, surface: R, sink: F, overlay: Overlay) -> Self {
        Self {
            monitor: PostureMonitor::new(),
            source,
            surface,
            sink,
            overlay,
            stats: SessionStats::default(),
        }
    }

    pub fn monitor(&self) -> &PostureMonitor {
        &self.monitor
    }

    pub fn surface(&self) -> &R {
        &self.surface
    }

    pub fn sink(&self) -> &F {
        &self.sink
    }

    /// Runs until the source runs dry or the surface is closed.
    pub fn run(&mut self) -> Result<SessionStats> {
        self.source.start()?;

        while let Some(frame) = self.source.next_frame()? {
            let now = frame
                .offset
                .map(|offset| self.monitor.session_start() + offset)
                .unwrap_or_else(Instant::now);
            let landmarks = frame.landmarks.as_deref();

            let result = self.monitor.on_frame_at(landmarks, now);
            self.overlay
                .paint(&mut self.surface, frame.image.as_ref(), landmarks, &result)?;
            self.record(&result)?;

            if !self.surface.present()? {
                info!("display closed");
                break;
            }
        }

        info!(
            frames = self.stats.frames,
            skipped = self.stats.skipped,
            good = self.stats.good,
            drifted = self.stats.drifted,
            "session ended"
        );
        Ok(self.stats.clone())
    }

    fn record(&mut self, result: &FrameResult) -> Result<()> {
        let index = self.stats.frames;
        self.stats.frames += 1;

        let Some(update) = result.update() else {
            debug!(frame = index, "no pose detected");
            self.stats.skipped += 1;
            return Ok(());
        };

        match update.feedback {
            Feedback::CalibrationComplete => self.stats.calibrated_at = Some(index),
            Feedback::GoodBalance => self.stats.good += 1,
            Feedback::KeepHeadStill => self.stats.drifted += 1,
            Feedback::Calibrating => {}
        }
        if let Some(drift) = update.drift {
            debug!(frame = index, drift, "head drift");
        }

        self.sink.show(update.feedback)
    }
}
