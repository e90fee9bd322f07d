//! Recorded landmark frames, one JSON object per line:
//! `{"t_ms": 40, "landmarks": [{"x": 0.4, "y": 0.1}, ...]}` or `"landmarks": null`.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use image::RgbaImage;
use serde::Deserialize;
use tracing::info;

use crate::error::SentinelError;
use crate::landmark::Landmark;
use crate::source::{FrameSource, SourceFrame};

#[derive(Debug, Deserialize)]
struct RecordedFrame {
    #[serde(default)]
    t_ms: Option<u64>,
    #[serde(default)]
    landmarks: Option<Vec<Landmark>>,
}

pub struct ReplaySource<R> {
    lines: std::io::Lines<R>,
    line_no: usize,
    delivered: usize,
}

impl ReplaySource<BufReader<File>> {
    pub fn open(path: &Path) -> crate::error::Result<Self> {
        let file = File::open(path).map_err(|source| SentinelError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_reader(BufReader::new(file)))
    }
}

impl<R: BufRead> ReplaySource<R> {
    pub fn from_reader(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
            delivered: 0,
        }
    }

    fn next_record(&mut self) -> crate::error::Result<Option<RecordedFrame>> {
        for line in self.lines.by_ref() {
            self.line_no += 1;
            let line = line.map_err(SentinelError::ReplayIo)?;
            if line.trim().is_empty() {
                continue;
            }
            let record = serde_json::from_str(&line).map_err(|source| SentinelError::ReplayParse {
                line: self.line_no,
                source,
            })?;
            return Ok(Some(record));
        }
        Ok(None)
    }
}

impl<R: BufRead> FrameSource for ReplaySource<R> {
    type Image = RgbaImage;

    fn start(&mut self) -> Result<()> {
        info!("replaying recorded landmarks");
        Ok(())
    }

    fn next_frame(&mut self) -> Result<Option<SourceFrame<RgbaImage>>> {
        let Some(record) = self.next_record()? else {
            info!(frames = self.delivered, "replay finished");
            return Ok(None);
        };
        self.delivered += 1;

        Ok(Some(SourceFrame {
            image: None,
            landmarks: record.landmarks,
            offset: record.t_ms.map(Duration::from_millis),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn source(text: &str) -> ReplaySource<Cursor<Vec<u8>>> {
        ReplaySource::from_reader(Cursor::new(text.as_bytes().to_vec()))
    }

    #[test]
    fn reads_frames_and_gaps() {
        let mut src = source(
            "{\"t_ms\": 0, \"landmarks\": [{\"x\": 0.1, \"y\": 0.2}]}\n\
             \n\
             {\"t_ms\": 33, \"landmarks\": null}\n\
             {\"landmarks\": [{\"x\": 0.3, \"y\": 0.4, \"visibility\": 0.5}]}\n",
        );
        src.start().unwrap();

        let first = src.next_frame().unwrap().unwrap();
        assert_eq!(first.offset, Some(Duration::ZERO));
        assert_eq!(first.landmarks, Some(vec![Landmark::new(0.1, 0.2)]));
        assert!(first.image.is_none());

        let second = src.next_frame().unwrap().unwrap();
        assert_eq!(second.offset, Some(Duration::from_millis(33)));
        assert!(second.landmarks.is_none());

        let third = src.next_frame().unwrap().unwrap();
        assert_eq!(third.offset, None);
        assert_eq!(third.landmarks.unwrap()[0].visibility, 0.5);

        assert!(src.next_frame().unwrap().is_none());
    }

    #[test]
    fn parse_errors_carry_line_number() {
        let mut src = source("{\"t_ms\": 0, \"landmarks\": null}\n\n{not json}\n");
        src.next_frame().unwrap();

        let err = src.next_frame().unwrap_err();
        let err = err.downcast::<SentinelError>().unwrap();
        assert!(matches!(err, SentinelError::ReplayParse { line: 3, .. }), "{err}");
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(ReplaySource::open(Path::new("/nonexistent/poses.jsonl")).is_err());
    }
}
