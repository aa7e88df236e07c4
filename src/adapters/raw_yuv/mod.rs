// Raw YUV adapter - Planar 8-bit 4:2:0 frames with no container

use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;

use tracing::{debug, warn};

use crate::domain::model::Dimension;
use crate::error::{AnalyzerError, AnalyzerResult};
use crate::frame::FrameBuffer;
use crate::ports::{FrameSource, ReadOutcome};

/// Headerless I420 stream; the dimension must be supplied by the caller
pub struct RawYuvSource<R> {
    reader: R,
    dim: Dimension,
    count: usize,
    packed: Vec<u8>,
}

impl RawYuvSource<BufReader<File>> {
    /// Open a `.yuv` file
    pub fn open(path: &Path, dim: Dimension) -> AnalyzerResult<Self> {
        let file = File::open(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => AnalyzerError::InputFileNotFound {
                path: path.display().to_string(),
            },
            _ => AnalyzerError::IoError(e),
        })?;

        let len = file.metadata()?.len();
        let frame_bytes = dim.frame_bytes() as u64;
        if len % frame_bytes != 0 {
            warn!(
                "{} is not a whole number of {} frames ({} trailing bytes)",
                path.display(),
                dim,
                len % frame_bytes
            );
        }
        debug!(
            "Opened raw YUV {} ({} frames of {} bytes)",
            path.display(),
            len / frame_bytes,
            frame_bytes
        );

        Ok(Self::new(BufReader::new(file), dim))
    }
}

impl<R: BufRead> RawYuvSource<R> {
    pub fn new(reader: R, dim: Dimension) -> Self {
        Self {
            reader,
            dim,
            count: 0,
            packed: vec![0; dim.frame_bytes()],
        }
    }
}

impl<R: BufRead> FrameSource for RawYuvSource<R> {
    fn dim(&self) -> Dimension {
        self.dim
    }

    fn count(&self) -> usize {
        self.count
    }

    fn eof(&mut self) -> bool {
        // an I/O error here is left for read() to report
        self.reader
            .fill_buf()
            .map(|buf| buf.is_empty())
            .unwrap_or(false)
    }

    fn read(&mut self, frame: &mut FrameBuffer) -> AnalyzerResult<ReadOutcome> {
        match self.reader.read_exact(&mut self.packed) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
                debug!("End of raw YUV stream after {} frames", self.count);
                return Ok(ReadOutcome::EndOfStream);
            }
            Err(e) => return Err(AnalyzerError::IoError(e)),
        }
        frame.fill_from_packed(&self.packed)?;
        self.count += 1;
        Ok(ReadOutcome::Frame)
    }
}
