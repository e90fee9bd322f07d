//! Head-drift balance trainer.
//!
//! A [`PostureMonitor`] turns per-frame pose landmarks into a head bounding
//! box, a one-shot calibrated head baseline, a drift classification and a
//! hip-aligned gravity line. Everything around it (frame sources, drawing
//! surfaces, the feedback display) is a swappable collaborator wired up by
//! [`Session`].

pub mod canvas;
pub mod config;
pub mod error;
pub mod feedback;
pub mod geometry;
pub mod landmark;
pub mod overlay;
pub mod posture;
pub mod replay;
pub mod session;
pub mod source;

#[cfg(feature = "live")]
pub mod camera;
#[cfg(feature = "live")]
pub mod inference;
#[cfg(feature = "live")]
pub mod live;

pub use config::{Config, PoseOptions};
pub use error::{Result, SentinelError};
pub use geometry::{BoundingBox, Point};
pub use landmark::{BodyLandmark, Landmark};
pub use posture::{Feedback, FrameResult, FrameUpdate, PostureMonitor};
pub use session::{Session, SessionStats};
