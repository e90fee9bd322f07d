use std::time::Duration;

use anyhow::Result;

use crate::landmark::Landmark;

/// One delivered frame: the picture (if any) and the pose found in it.
#[derive(Debug, Clone)]
pub struct SourceFrame<I> {
    pub image: Option<I>,
    /// `None` when no pose was detected.
    pub landmarks: Option<Vec<Landmark>>,
    /// Capture time relative to session start; wall clock when absent.
    pub offset: Option<Duration>,
}

/// Producer of pose frames, polled one frame at a time.
pub trait FrameSource {
    type Image;

    fn start(&mut self) -> Result<()>;

    /// Next frame, `None` once the source is exhausted.
    fn next_frame(&mut self) -> Result<Option<SourceFrame<Self::Image>>>;
}
