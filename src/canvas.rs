//! In-memory RGBA surface, optionally dumping each presented frame as PNG.

use anyhow::Result;
use image::{imageops, Rgba, RgbaImage};
use std::path::PathBuf;
use tracing::debug;

use crate::error::SentinelError;
use crate::overlay::{dash_segments, PixelRect, Rgb, Stroke, Surface};

pub struct ImageCanvas {
    image: RgbaImage,
    frames_dir: Option<PathBuf>,
    presented: u64,
}

impl ImageCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
            frames_dir: None,
            presented: 0,
        }
    }

    /// Writes every presented frame to `dir/frame_NNNNN.png`.
    pub fn with_frames_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.frames_dir = Some(dir.into());
        self
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    fn stamp(&mut self, cx: f32, cy: f32, width: u32, color: Rgba<u8>) {
        let half = width.max(1) as f32 / 2.0;
        let (x0, x1) = ((cx - half).round() as i64, (cx + half).round() as i64);
        let (y0, y1) = ((cy - half).round() as i64, (cy + half).round() as i64);
        let (w, h) = (self.image.width() as i64, self.image.height() as i64);

        for y in y0.max(0)..y1.max(y0 + 1).min(h) {
            for x in x0.max(0)..x1.max(x0 + 1).min(w) {
                self.image.put_pixel(x as u32, y as u32, color);
            }
        }
    }

    fn solid_line(&mut self, from: (f32, f32), to: (f32, f32), width: u32, color: Rgba<u8>) {
        let margin = width.max(1) as f32;
        let bounds = (
            -margin,
            -margin,
            self.image.width() as f32 + margin,
            self.image.height() as f32 + margin,
        );
        let Some((from, to)) = clip_segment(from, to, bounds) else {
            return;
        };

        let (dx, dy) = (to.0 - from.0, to.1 - from.1);
        let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as u32;
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            self.stamp(from.0 + dx * t, from.1 + dy * t, width, color);
        }
    }
}

/// Liang-Barsky clip of a segment to `(min_x, min_y, max_x, max_y)`.
fn clip_segment(
    from: (f32, f32),
    to: (f32, f32),
    (min_x, min_y, max_x, max_y): (f32, f32, f32, f32),
) -> Option<((f32, f32), (f32, f32))> {
    if ![from.0, from.1, to.0, to.1].iter().all(|v| v.is_finite()) {
        return None;
    }
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let (mut t0, mut t1) = (0.0f32, 1.0f32);

    for (p, q) in [
        (-dx, from.0 - min_x),
        (dx, max_x - from.0),
        (-dy, from.1 - min_y),
        (dy, max_y - from.1),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            t0 = t0.max(r);
        } else {
            t1 = t1.min(r);
        }
        if t0 > t1 {
            return None;
        }
    }

    Some((
        (from.0 + dx * t0, from.1 + dy * t0),
        (from.0 + dx * t1, from.1 + dy * t1),
    ))
}

fn rgba(c: Rgb) -> Rgba<u8> {
    Rgba([c.0, c.1, c.2, 0xff])
}

impl Surface for ImageCanvas {
    type Image = RgbaImage;

    fn size(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    fn clear(&mut self, backdrop: Option<&RgbaImage>) -> Result<()> {
        match backdrop {
            Some(frame) if frame.dimensions() == self.image.dimensions() => {
                self.image.copy_from_slice(frame.as_raw());
            }
            Some(frame) => {
                let (w, h) = self.image.dimensions();
                self.image = imageops::resize(frame, w, h, imageops::FilterType::Triangle);
            }
            None => self.image.pixels_mut().for_each(|p| *p = Rgba([0, 0, 0, 0])),
        }
        Ok(())
    }

    fn stroke_rect(&mut self, rect: PixelRect, stroke: &Stroke) -> Result<()> {
        let (l, t) = (rect.x, rect.y);
        let (r, b) = (rect.x + rect.width, rect.y + rect.height);
        for (from, to) in [((l, t), (r, t)), ((r, t), (r, b)), ((r, b), (l, b)), ((l, b), (l, t))] {
            self.stroke_line(from, to, stroke)?;
        }
        Ok(())
    }

    fn stroke_line(&mut self, from: (f32, f32), to: (f32, f32), stroke: &Stroke) -> Result<()> {
        let color = rgba(stroke.color);
        for (a, b) in dash_segments(from, to, stroke.dash) {
            self.solid_line(a, b, stroke.width, color);
        }
        Ok(())
    }

    fn present(&mut self) -> Result<bool> {
        self.presented += 1;
        if let Some(dir) = &self.frames_dir {
            let path = dir.join(format!("frame_{:05}.png", self.presented));
            self.image
                .save(&path)
                .map_err(|source| SentinelError::FrameSave { path: path.clone(), source })?;
            debug!(path = %path.display(), "frame written");
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgb = Rgb(255, 0, 0);

    fn is(canvas: &ImageCanvas, x: u32, y: u32, c: Rgb) -> bool {
        *canvas.image().get_pixel(x, y) == rgba(c)
    }

    #[test]
    fn rect_outline_leaves_interior_clear() {
        let mut canvas = ImageCanvas::new(40, 40);
        canvas
            .stroke_rect(
                PixelRect { x: 10.0, y: 10.0, width: 20.0, height: 20.0 },
                &Stroke::solid(RED, 1),
            )
            .unwrap();

        assert!(is(&canvas, 10, 10, RED));
        assert!(is(&canvas, 20, 10, RED));
        assert!(is(&canvas, 10, 20, RED));
        assert_eq!(canvas.image().get_pixel(20, 20).0, [0, 0, 0, 0]);
    }

    #[test]
    fn dashed_line_has_gaps() {
        let mut canvas = ImageCanvas::new(10, 40);
        let stroke = Stroke { color: RED, width: 1, dash: Some((8, 8)) };
        canvas.stroke_line((5.0, 0.0), (5.0, 40.0), &stroke).unwrap();

        assert!(is(&canvas, 5, 2, RED));
        assert!(!is(&canvas, 5, 12, RED));
        assert!(is(&canvas, 5, 18, RED));
    }

    #[test]
    fn clear_wipes_or_copies_backdrop() {
        let mut canvas = ImageCanvas::new(8, 8);
        canvas.stroke_line((0.0, 4.0), (8.0, 4.0), &Stroke::solid(RED, 1)).unwrap();
        canvas.clear(None).unwrap();
        assert!(canvas.image().pixels().all(|p| p.0 == [0, 0, 0, 0]));

        let backdrop = RgbaImage::from_pixel(8, 8, Rgba([1, 2, 3, 255]));
        canvas.clear(Some(&backdrop)).unwrap();
        assert_eq!(canvas.image(), &backdrop);

        let small = RgbaImage::from_pixel(4, 4, Rgba([9, 9, 9, 255]));
        canvas.clear(Some(&small)).unwrap();
        assert_eq!(canvas.size(), (8, 8));
    }

    #[test]
    fn drawing_off_canvas_is_clipped() {
        let mut canvas = ImageCanvas::new(8, 8);
        canvas.stroke_line((-20.0, -20.0), (30.0, 30.0), &Stroke::solid(RED, 3)).unwrap();
        assert!(is(&canvas, 4, 4, RED));
    }

    #[test]
    fn far_out_of_range_line_is_clipped_not_walked() {
        let mut canvas = ImageCanvas::new(64, 48);
        let start = std::time::Instant::now();
        canvas
            .stroke_line((32.0, 24.0), (6.4e8, 24.0), &Stroke::solid(RED, 3))
            .unwrap();
        canvas
            .stroke_line((f32::NAN, 0.0), (10.0, 10.0), &Stroke::solid(RED, 3))
            .unwrap();

        assert!(start.elapsed() < std::time::Duration::from_secs(1));
        assert!(is(&canvas, 40, 24, RED));
        assert!(is(&canvas, 63, 24, RED));
    }

    #[test]
    fn clipping_keeps_inside_segments_and_drops_outside_ones() {
        let bounds = (0.0, 0.0, 10.0, 10.0);
        assert_eq!(
            clip_segment((2.0, 2.0), (8.0, 8.0), bounds),
            Some(((2.0, 2.0), (8.0, 8.0)))
        );
        assert_eq!(
            clip_segment((-10.0, 5.0), (20.0, 5.0), bounds),
            Some(((0.0, 5.0), (10.0, 5.0)))
        );
        assert_eq!(clip_segment((-5.0, -5.0), (-1.0, 20.0), bounds), None);
    }

    #[test]
    fn present_writes_png_frames() {
        let dir = tempfile::tempdir().unwrap();
        let mut canvas = ImageCanvas::new(4, 4).with_frames_dir(dir.path());
        assert!(canvas.present().unwrap());
        assert!(canvas.present().unwrap());

        assert!(dir.path().join("frame_00001.png").exists());
        assert!(dir.path().join("frame_00002.png").exists());
    }
}
