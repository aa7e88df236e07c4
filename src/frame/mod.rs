//! Padded planar frame buffers
//!
//! A [`FrameBuffer`] owns one contiguous block holding a bordered luma plane
//! and two bordered 4:2:0 chroma planes. The border lets motion vectors point
//! outside the visible area once [`FrameBuffer::border_extend`] has replicated
//! the edge pixels outward.

use std::mem;

use crate::domain::model::Dimension;
use crate::error::{AnalyzerError, AnalyzerResult};

pub mod grid;

pub use grid::{MacroblockGrid, PredictionScratch, MB_GRID_MARGIN, MB_WIDTH};

/// Luma border width in pixels
pub const HORIZONTAL_PADDING: usize = 16;
/// Luma border height in pixels
pub const VERTICAL_PADDING: usize = 16;

/// Plane selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plane {
    Y,
    U,
    V,
}

impl Plane {
    pub const ALL: [Plane; 3] = [Plane::Y, Plane::U, Plane::V];

    fn slot(self) -> usize {
        match self {
            Plane::Y => 0,
            Plane::U => 1,
            Plane::V => 2,
        }
    }
}

/// Placement of one bordered plane inside the frame block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PlaneLayout {
    offset: usize,
    stride: usize,
    width: usize,
    height: usize,
    hpad: usize,
    vpad: usize,
}

impl PlaneLayout {
    fn new(offset: usize, width: usize, height: usize, hpad: usize, vpad: usize) -> Option<Self> {
        let stride = width.checked_add(hpad.checked_mul(2)?)?;
        let layout = Self {
            offset,
            stride,
            width,
            height,
            hpad,
            vpad,
        };
        layout.len()?;
        Some(layout)
    }

    fn padded_height(&self) -> usize {
        self.height + 2 * self.vpad
    }

    fn len(&self) -> Option<usize> {
        self.stride.checked_mul(self.height.checked_add(2 * self.vpad)?)
    }

    /// Index of interior pixel (0, 0)
    fn origin(&self) -> usize {
        self.offset + self.vpad * self.stride + self.hpad
    }

    fn index(&self, x: isize, y: isize) -> usize {
        debug_assert!(x >= -(self.hpad as isize) && x < (self.width + self.hpad) as isize);
        debug_assert!(y >= -(self.vpad as isize) && y < (self.height + self.vpad) as isize);
        (self.origin() as isize + y * self.stride as isize + x) as usize
    }
}

/// Read-only view of one plane
#[derive(Clone, Copy)]
pub struct PlaneView<'a> {
    data: &'a [u8],
    layout: PlaneLayout,
}

impl<'a> PlaneView<'a> {
    pub fn width(&self) -> usize {
        self.layout.width
    }

    pub fn height(&self) -> usize {
        self.layout.height
    }

    pub fn stride(&self) -> usize {
        self.layout.stride
    }

    pub fn hpad(&self) -> usize {
        self.layout.hpad
    }

    pub fn vpad(&self) -> usize {
        self.layout.vpad
    }

    /// Sample at signed interior coordinates; negative or past-the-edge
    /// coordinates address the border.
    pub fn at(&self, x: isize, y: isize) -> u8 {
        self.data[self.layout.index(x, y)]
    }

    /// `len` samples starting at (x, y), which may begin or end in the border
    pub fn span(&self, x: isize, y: isize, len: usize) -> &'a [u8] {
        let start = self.layout.index(x, y);
        &self.data[start..start + len]
    }

    /// Interior samples of row `y`
    pub fn row(&self, y: usize) -> &'a [u8] {
        self.span(0, y as isize, self.layout.width)
    }
}

/// Mutable view of one plane
pub struct PlaneViewMut<'a> {
    data: &'a mut [u8],
    layout: PlaneLayout,
}

impl PlaneViewMut<'_> {
    pub fn width(&self) -> usize {
        self.layout.width
    }

    pub fn height(&self) -> usize {
        self.layout.height
    }

    /// Interior samples of row `y`
    pub fn row_mut(&mut self, y: usize) -> &mut [u8] {
        let start = self.layout.index(0, y as isize);
        &mut self.data[start..start + self.layout.width]
    }

    pub fn set(&mut self, x: isize, y: isize, value: u8) {
        let idx = self.layout.index(x, y);
        self.data[idx] = value;
    }

    /// Copy stride-free rows into the interior
    pub fn copy_from_packed(&mut self, packed: &[u8]) -> AnalyzerResult<()> {
        let width = self.layout.width;
        let expected = width * self.layout.height;
        if packed.len() != expected {
            return Err(AnalyzerError::invalid(format!(
                "Plane data has {} bytes, expected {}",
                packed.len(),
                expected
            )));
        }
        for (y, src) in packed.chunks_exact(width).enumerate() {
            self.row_mut(y).copy_from_slice(src);
        }
        Ok(())
    }
}

/// Bordered 4:2:0 frame with a presentation-position tag
pub struct FrameBuffer {
    dim: Dimension,
    layouts: [PlaneLayout; 3],
    data: Vec<u8>,
    pos: usize,
}

impl FrameBuffer {
    /// Allocate a zeroed frame for `dim`.
    ///
    /// Allocation failure is reported as [`AnalyzerError::Allocation`]; the
    /// caller treats it as fatal.
    pub fn new(dim: Dimension) -> AnalyzerResult<Self> {
        let overflow = || AnalyzerError::Allocation {
            bytes: usize::MAX,
            purpose: format!("{} frame buffer", dim),
        };

        let luma = PlaneLayout::new(0, dim.width, dim.height, HORIZONTAL_PADDING, VERTICAL_PADDING)
            .ok_or_else(overflow)?;
        let luma_len = luma.len().ok_or_else(overflow)?;

        let (cw, ch) = (dim.chroma_width(), dim.chroma_height());
        let (chpad, cvpad) = (HORIZONTAL_PADDING / 2, VERTICAL_PADDING / 2);
        let u = PlaneLayout::new(luma_len, cw, ch, chpad, cvpad).ok_or_else(overflow)?;
        let chroma_len = u.len().ok_or_else(overflow)?;
        let v = PlaneLayout::new(luma_len + chroma_len, cw, ch, chpad, cvpad)
            .ok_or_else(overflow)?;

        let total = luma_len
            .checked_add(chroma_len.checked_mul(2).ok_or_else(overflow)?)
            .ok_or_else(overflow)?;

        let mut data = Vec::new();
        data.try_reserve_exact(total)
            .map_err(|_| AnalyzerError::Allocation {
                bytes: total,
                purpose: format!("{} frame buffer", dim),
            })?;
        data.resize(total, 0);

        Ok(Self {
            dim,
            layouts: [luma, u, v],
            data,
            pos: 0,
        })
    }

    pub fn dim(&self) -> Dimension {
        self.dim
    }

    /// Source position of the picture currently held
    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn set_pos(&mut self, pos: usize) {
        self.pos = pos;
    }

    /// Luma stride, border included
    pub fn stride(&self) -> usize {
        self.layouts[0].stride
    }

    /// Bytes held by the backing block
    pub fn allocated_bytes(&self) -> usize {
        self.data.len()
    }

    pub fn plane(&self, plane: Plane) -> PlaneView<'_> {
        PlaneView {
            data: &self.data,
            layout: self.layouts[plane.slot()],
        }
    }

    pub fn plane_mut(&mut self, plane: Plane) -> PlaneViewMut<'_> {
        PlaneViewMut {
            data: &mut self.data,
            layout: self.layouts[plane.slot()],
        }
    }

    /// Fill all three planes from a packed Y ++ U ++ V frame
    pub fn fill_from_packed(&mut self, packed: &[u8]) -> AnalyzerResult<()> {
        if packed.len() != self.dim.frame_bytes() {
            return Err(AnalyzerError::invalid(format!(
                "Packed frame has {} bytes, expected {} for {}",
                packed.len(),
                self.dim.frame_bytes(),
                self.dim
            )));
        }
        let (y, chroma) = packed.split_at(self.dim.luma_size());
        let (u, v) = chroma.split_at(self.dim.chroma_size());
        self.plane_mut(Plane::Y).copy_from_packed(y)?;
        self.plane_mut(Plane::U).copy_from_packed(u)?;
        self.plane_mut(Plane::V).copy_from_packed(v)
    }

    /// Replicate edge pixels into the border of every plane.
    ///
    /// Rows are extended left and right first, then the first and last padded
    /// rows are copied up and down, so corners take the nearest corner pixel.
    pub fn border_extend(&mut self) {
        for layout in self.layouts {
            Self::extend_plane(&mut self.data, layout);
        }
    }

    fn extend_plane(data: &mut [u8], layout: PlaneLayout) {
        let PlaneLayout {
            offset,
            stride,
            width,
            height,
            hpad,
            vpad,
        } = layout;

        for y in 0..height {
            let row_start = offset + (vpad + y) * stride;
            let row = &mut data[row_start..row_start + stride];
            let left = row[hpad];
            let right = row[hpad + width - 1];
            row[..hpad].fill(left);
            row[hpad + width..].fill(right);
        }

        let first = offset + vpad * stride;
        for y in 0..vpad {
            data.copy_within(first..first + stride, offset + y * stride);
        }

        let last = offset + (vpad + height - 1) * stride;
        for y in vpad + height..layout.padded_height() {
            data.copy_within(last..last + stride, offset + y * stride);
        }
    }

    /// Swap pixel storage and position tag with `other` without copying pixels
    pub fn exchange(&mut self, other: &mut FrameBuffer) {
        debug_assert_eq!(self.dim, other.dim);
        mem::swap(&mut self.data, &mut other.data);
        mem::swap(&mut self.pos, &mut other.pos);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patterned(dim: Dimension, seed: u8) -> FrameBuffer {
        let mut frame = FrameBuffer::new(dim).unwrap();
        let packed: Vec<u8> = (0..dim.frame_bytes())
            .map(|i| (i as u8).wrapping_mul(7).wrapping_add(seed))
            .collect();
        frame.fill_from_packed(&packed).unwrap();
        frame
    }

    #[test]
    fn test_allocation_size() {
        let dim = Dimension::new(32, 16).unwrap();
        let frame = FrameBuffer::new(dim).unwrap();
        let luma = (32 + 32) * (16 + 32);
        let chroma = (16 + 16) * (8 + 16);
        assert_eq!(frame.allocated_bytes(), luma + 2 * chroma);
        assert_eq!(frame.stride(), 64);
    }

    #[test]
    fn test_fill_from_packed_places_interior() {
        let dim = Dimension::new(4, 2).unwrap();
        let mut frame = FrameBuffer::new(dim).unwrap();
        let packed: Vec<u8> = (1..=dim.frame_bytes() as u8).collect();
        frame.fill_from_packed(&packed).unwrap();

        assert_eq!(frame.plane(Plane::Y).row(0), &[1, 2, 3, 4]);
        assert_eq!(frame.plane(Plane::Y).row(1), &[5, 6, 7, 8]);
        assert_eq!(frame.plane(Plane::U).row(0), &[9, 10]);
        assert_eq!(frame.plane(Plane::V).row(0), &[11, 12]);
        // border untouched before extension
        assert_eq!(frame.plane(Plane::Y).at(-1, 0), 0);
    }

    #[test]
    fn test_fill_rejects_wrong_size() {
        let dim = Dimension::new(4, 2).unwrap();
        let mut frame = FrameBuffer::new(dim).unwrap();
        assert!(frame.fill_from_packed(&[0u8; 3]).is_err());
    }

    #[test]
    fn test_border_extend_all_edges() {
        let dim = Dimension::new(6, 5).unwrap();
        let mut frame = patterned(dim, 3);
        frame.border_extend();

        for plane in Plane::ALL {
            let view = frame.plane(plane);
            let (w, h) = (view.width() as isize, view.height() as isize);
            let (hp, vp) = (view.hpad() as isize, view.vpad() as isize);
            for y in -vp..h + vp {
                for x in -hp..w + hp {
                    let cx = x.clamp(0, w - 1);
                    let cy = y.clamp(0, h - 1);
                    assert_eq!(
                        view.at(x, y),
                        view.at(cx, cy),
                        "{:?} mismatch at ({}, {})",
                        plane,
                        x,
                        y
                    );
                }
            }
        }
    }

    #[test]
    fn test_border_extend_corners_take_corner_pixel() {
        let dim = Dimension::new(3, 3).unwrap();
        let mut frame = FrameBuffer::new(dim).unwrap();
        {
            let mut y = frame.plane_mut(Plane::Y);
            y.set(0, 0, 10);
            y.set(2, 0, 20);
            y.set(0, 2, 30);
            y.set(2, 2, 40);
        }
        frame.border_extend();
        let y = frame.plane(Plane::Y);
        let p = HORIZONTAL_PADDING as isize;
        let v = VERTICAL_PADDING as isize;
        assert_eq!(y.at(-p, -v), 10);
        assert_eq!(y.at(2 + p, -v), 20);
        assert_eq!(y.at(-p, 2 + v), 30);
        assert_eq!(y.at(2 + p, 2 + v), 40);
    }

    #[test]
    fn test_exchange_swaps_content_and_position() {
        let dim = Dimension::new(8, 4).unwrap();
        let mut a = patterned(dim, 1);
        let mut b = patterned(dim, 100);
        let mut c = patterned(dim, 50);
        a.set_pos(3);
        b.set_pos(9);
        c.set_pos(4);

        let a_row = a.plane(Plane::Y).row(1).to_vec();
        let b_row = b.plane(Plane::Y).row(1).to_vec();
        let c_row = c.plane(Plane::Y).row(1).to_vec();

        a.exchange(&mut b);

        assert_eq!(a.pos(), 9);
        assert_eq!(b.pos(), 3);
        assert_eq!(a.plane(Plane::Y).row(1), b_row.as_slice());
        assert_eq!(b.plane(Plane::Y).row(1), a_row.as_slice());
        assert_eq!(c.pos(), 4);
        assert_eq!(c.plane(Plane::Y).row(1), c_row.as_slice());
    }
}
