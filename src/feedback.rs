use std::io::Write;

use anyhow::Result;
use tracing::info;

use crate::posture::Feedback;

/// Where the one-line feedback text goes.
pub trait FeedbackSink {
    fn show(&mut self, feedback: Feedback) -> Result<()>;
}

/// Line-oriented text display; writes only when the message changes.
pub struct TerminalFeedback<W: Write> {
    out: W,
    current: Option<Feedback>,
}

impl TerminalFeedback<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> TerminalFeedback<W> {
    pub fn new(out: W) -> Self {
        Self { out, current: None }
    }

    pub fn current(&self) -> Option<Feedback> {
        self.current
    }
}

impl<W: Write> FeedbackSink for TerminalFeedback<W> {
    fn show(&mut self, feedback: Feedback) -> Result<()> {
        if self.current == Some(feedback) {
            return Ok(());
        }
        info!(%feedback, "feedback changed");
        writeln!(self.out, "{feedback}")?;
        self.out.flush()?;
        self.current = Some(feedback);
        Ok(())
    }
}
