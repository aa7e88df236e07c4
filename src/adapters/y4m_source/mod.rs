// Y4M adapter - YUV4MPEG2 input through the y4m crate

use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;

use tracing::debug;

use crate::domain::model::Dimension;
use crate::error::{AnalyzerError, AnalyzerResult};
use crate::frame::FrameBuffer;
use crate::ports::{FrameSource, ReadOutcome};

/// YUV4MPEG2 source restricted to 8-bit 4:2:0.
///
/// One frame is decoded ahead so that `eof()` is exact.
pub struct Y4mSource<R: Read> {
    decoder: y4m::Decoder<R>,
    dim: Dimension,
    count: usize,
    pending: Option<Vec<u8>>,
    failure: Option<AnalyzerError>,
    finished: bool,
}

impl Y4mSource<BufReader<File>> {
    pub fn open(path: &Path) -> AnalyzerResult<Self> {
        let file = File::open(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => AnalyzerError::InputFileNotFound {
                path: path.display().to_string(),
            },
            _ => AnalyzerError::IoError(e),
        })?;
        Self::from_reader(BufReader::new(file))
    }
}

impl<R: Read> Y4mSource<R> {
    /// Parse the stream header and check the colorspace
    pub fn from_reader(reader: R) -> AnalyzerResult<Self> {
        let decoder = y4m::decode(reader).map_err(|e| AnalyzerError::Y4mDecode {
            message: format!("Failed to decode Y4M header: {}", e),
        })?;

        match decoder.get_colorspace() {
            y4m::Colorspace::C420
            | y4m::Colorspace::C420jpeg
            | y4m::Colorspace::C420paldv
            | y4m::Colorspace::C420mpeg2 => {}
            other => {
                return Err(AnalyzerError::UnsupportedFormat {
                    message: format!("Y4M colorspace {:?} is not 8-bit 4:2:0", other),
                })
            }
        }

        let dim = Dimension::new(decoder.get_width(), decoder.get_height())?;
        let framerate = decoder.get_framerate();
        debug!(
            "Y4M stream {} at {}/{} fps",
            dim, framerate.num, framerate.den
        );

        Ok(Self {
            decoder,
            dim,
            count: 0,
            pending: None,
            failure: None,
            finished: false,
        })
    }

    fn prefetch(&mut self) {
        if self.pending.is_some() || self.failure.is_some() || self.finished {
            return;
        }
        match self.decoder.read_frame() {
            Ok(frame) => {
                let (y, u, v) = (frame.get_y_plane(), frame.get_u_plane(), frame.get_v_plane());
                let mut packed = Vec::with_capacity(y.len() + u.len() + v.len());
                packed.extend_from_slice(y);
                packed.extend_from_slice(u);
                packed.extend_from_slice(v);
                self.pending = Some(packed);
            }
            Err(y4m::Error::EOF) => self.finished = true,
            Err(e) => {
                self.failure = Some(AnalyzerError::Y4mDecode {
                    message: format!("Failed to read frame {}: {}", self.count, e),
                })
            }
        }
    }
}

impl<R: Read> FrameSource for Y4mSource<R> {
    fn dim(&self) -> Dimension {
        self.dim
    }

    fn count(&self) -> usize {
        self.count
    }

    fn eof(&mut self) -> bool {
        self.prefetch();
        self.pending.is_none() && self.failure.is_none()
    }

    fn read(&mut self, frame: &mut FrameBuffer) -> AnalyzerResult<ReadOutcome> {
        self.prefetch();
        if let Some(err) = self.failure.take() {
            return Err(err);
        }
        let Some(packed) = self.pending.take() else {
            return Ok(ReadOutcome::EndOfStream);
        };
        frame.fill_from_packed(&packed)?;
        self.count += 1;
        Ok(ReadOutcome::Frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Plane;
    use std::io::Cursor;

    fn stream(colorspace: &str, frames: &[u8]) -> Vec<u8> {
        let mut bytes = format!("YUV4MPEG2 W4 H2 F25:1 Ip A1:1 {}\n", colorspace).into_bytes();
        for &value in frames {
            bytes.extend_from_slice(b"FRAME\n");
            bytes.extend(std::iter::repeat(value).take(12));
        }
        bytes
    }

    #[test]
    fn test_reads_frames_with_exact_eof() {
        let mut source = Y4mSource::from_reader(Cursor::new(stream("C420jpeg", &[10, 20]))).unwrap();
        assert_eq!(source.dim(), Dimension::new(4, 2).unwrap());

        let mut frame = FrameBuffer::new(source.dim()).unwrap();
        assert!(!source.eof());
        assert_eq!(source.read(&mut frame).unwrap(), ReadOutcome::Frame);
        assert_eq!(frame.plane(Plane::Y).at(3, 1), 10);
        assert!(!source.eof());
        assert_eq!(source.read(&mut frame).unwrap(), ReadOutcome::Frame);
        assert_eq!(frame.plane(Plane::V).at(1, 0), 20);
        assert!(source.eof());
        assert_eq!(source.read(&mut frame).unwrap(), ReadOutcome::EndOfStream);
        assert_eq!(source.count(), 2);
    }

    #[test]
    fn test_accepts_every_8bit_420_colorspace() {
        for colorspace in ["C420", "C420jpeg", "C420paldv", "C420mpeg2"] {
            let mut source = Y4mSource::from_reader(Cursor::new(stream(colorspace, &[42])))
                .unwrap_or_else(|e| panic!("{}: {}", colorspace, e));
            let mut frame = FrameBuffer::new(source.dim()).unwrap();
            assert_eq!(source.read(&mut frame).unwrap(), ReadOutcome::Frame, "{}", colorspace);
            assert_eq!(frame.plane(Plane::U).at(0, 0), 42, "{}", colorspace);
            assert!(source.eof(), "{}", colorspace);
        }
    }

    #[test]
    fn test_rejects_non_420() {
        let result = Y4mSource::from_reader(Cursor::new(stream("C444", &[])));
        assert!(matches!(
            result.err(),
            Some(AnalyzerError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_rejects_garbage_header() {
        let result = Y4mSource::from_reader(Cursor::new(b"not a y4m stream\n".to_vec()));
        assert!(result.is_err());
    }
}
