//! GOP-relative look-ahead cursor

/// Forward cursor inside the current GOP.
///
/// `td` counts pictures read since the GOP's I picture. Each sub-GOP reads
/// up to `sub_gop_size` pictures but never past the last picture of the GOP.
#[derive(Debug, Clone)]
pub struct GopCursor {
    gop_size: usize,
    sub_gop_size: usize,
    td: usize,
}

impl GopCursor {
    pub fn new(gop_size: usize, sub_gop_size: usize) -> Self {
        Self {
            gop_size: gop_size.max(1),
            sub_gop_size: sub_gop_size.max(1),
            td: 0,
        }
    }

    /// Rewind to the I picture of a new GOP
    pub fn start_gop(&mut self) {
        self.td = 0;
    }

    /// Pictures the next look-ahead fill should read
    pub fn lookahead_len(&self) -> usize {
        let remaining = (self.gop_size - 1).saturating_sub(self.td);
        remaining.min(self.sub_gop_size)
    }

    /// Record `n` pictures read by a fill
    pub fn advance(&mut self, n: usize) {
        self.td += n;
    }
}
