//! Paints a [`FrameResult`] onto a drawing surface.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::SentinelError;
use crate::landmark::{Landmark, POSE_CONNECTIONS};
use crate::posture::FrameResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb(pub u8, pub u8, pub u8);

impl TryFrom<String> for Rgb {
    type Error = SentinelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let invalid = || SentinelError::InvalidColor(value.clone());
        let hex = value.strip_prefix('#').ok_or_else(invalid)?;
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        Ok(Rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl From<Rgb> for String {
    fn from(c: Rgb) -> Self {
        c.to_string()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub color: Rgb,
    pub width: u32,
    /// `(on, off)` pixel lengths; solid when absent.
    pub dash: Option<(u32, u32)>,
}

impl Stroke {
    pub const fn solid(color: Rgb, width: u32) -> Self {
        Self {
            color,
            width,
            dash: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayStyle {
    pub skeleton: Stroke,
    pub head_box: Stroke,
    pub gravity_line: Stroke,
    /// Connectors are drawn only when both endpoints are more visible than this.
    pub min_visibility: f32,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            skeleton: Stroke::solid(Rgb(0x00, 0x77, 0xff), 3),
            head_box: Stroke::solid(Rgb(0x00, 0x80, 0x00), 3),
            gravity_line: Stroke {
                color: Rgb(0x80, 0x80, 0x80),
                width: 3,
                dash: Some((8, 8)),
            },
            min_visibility: 0.5,
        }
    }
}

/// Rectangle in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// A 2-D drawing target sized in pixels.
pub trait Surface {
    /// Frame image the surface can show beneath the overlay.
    type Image;

    fn size(&self) -> (u32, u32);

    /// Wipes previous drawing, showing `backdrop` when given.
    fn clear(&mut self, backdrop: Option<&Self::Image>) -> Result<()>;

    fn stroke_rect(&mut self, rect: PixelRect, stroke: &Stroke) -> Result<()>;

    fn stroke_line(&mut self, from: (f32, f32), to: (f32, f32), stroke: &Stroke) -> Result<()>;

    /// Shows the finished frame. `false` means the viewer is gone.
    fn present(&mut self) -> Result<bool>;
}

/// Splits a line into its drawn pieces for an `(on, off)` dash pattern.
pub fn dash_segments(
    from: (f32, f32),
    to: (f32, f32),
    dash: Option<(u32, u32)>,
) -> Vec<((f32, f32), (f32, f32))> {
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let length = dx.hypot(dy);

    let Some((on, off)) = dash.filter(|&(on, _)| on > 0) else {
        return vec![(from, to)];
    };
    if length == 0.0 {
        return vec![(from, to)];
    }

    let (ux, uy) = (dx / length, dy / length);
    let at = |d: f32| (from.0 + ux * d, from.1 + uy * d);
    let period = (on + off) as f32;

    let mut segments = Vec::new();
    let mut start = 0.0f32;
    while start < length {
        let end = (start + on as f32).min(length);
        segments.push((at(start), at(end)));
        start += period;
    }
    segments
}

pub struct Overlay {
    style: OverlayStyle,
}

impl Overlay {
    pub fn new(style: OverlayStyle) -> Self {
        Self { style }
    }

    /// Clears `surface` and draws skeleton, head box and gravity line for one frame.
    pub fn paint<S: Surface>(
        &self,
        surface: &mut S,
        backdrop: Option<&S::Image>,
        landmarks: Option<&[Landmark]>,
        result: &FrameResult,
    ) -> Result<()> {
        surface.clear(backdrop)?;

        let FrameResult::Update(update) = result else {
            return Ok(());
        };

        let (w, h) = surface.size();
        let (w, h) = (w as f32, h as f32);
        let to_px = |lm: &Landmark| (lm.x * w, lm.y * h);

        if let Some(landmarks) = landmarks {
            for &(a, b) in POSE_CONNECTIONS.iter() {
                let (Some(a), Some(b)) = (landmarks.get(a), landmarks.get(b)) else {
                    continue;
                };
                if a.visibility > self.style.min_visibility && b.visibility > self.style.min_visibility {
                    surface.stroke_line(to_px(a), to_px(b), &self.style.skeleton)?;
                }
            }
        }

        let head = update.head_box;
        surface.stroke_rect(
            PixelRect {
                x: head.min_x * w,
                y: head.min_y * h,
                width: head.width() * w,
                height: head.height() * h,
            },
            &self.style.head_box,
        )?;

        if let Some(x) = update.gravity_line_x {
            let x = x * w;
            for (from, to) in dash_segments((x, 0.0), (x, h), self.style.gravity_line.dash) {
                surface.stroke_line(from, to, &Stroke { dash: None, ..self.style.gravity_line })?;
            }
        }

        Ok(())
    }
}
