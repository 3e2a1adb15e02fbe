//! Pixel identities and adjacency
//!
//! Pixel `(x, y)` has id `width * y + x`, which is also its index into
//! [`Pix::data`](colormerge_core::Pix::data).

use crate::error::{RegionError, RegionResult};
use colormerge_core::{Error, Pix};

/// Neighbourhood used when looking for adjacent pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectivityType {
    /// 4-way connectivity (up, down, left, right)
    FourWay,
    /// 8-way connectivity (includes diagonals)
    #[default]
    EightWay,
}

/// `(dx, dy)` offsets, dx outer and dy inner.
const EIGHT_WAY: [(i64, i64); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

const FOUR_WAY: [(i64, i64); 4] = [(-1, 0), (0, -1), (0, 1), (1, 0)];

impl ConnectivityType {
    fn offsets(self) -> &'static [(i64, i64)] {
        match self {
            Self::FourWay => &FOUR_WAY,
            Self::EightWay => &EIGHT_WAY,
        }
    }

    /// Maximum number of neighbours of an interior pixel.
    pub fn neighbor_count(self) -> usize {
        self.offsets().len()
    }
}

/// Bijection between pixel coordinates and pixel ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelGrid {
    width: u32,
    height: u32,
}

impl PixelGrid {
    /// Create a grid.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidDimension`] if either dimension is zero.
    pub fn new(width: u32, height: u32) -> RegionResult<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height }.into());
        }
        Ok(Self { width, height })
    }

    /// The grid matching an image's dimensions.
    pub fn from_pix(pix: &Pix) -> Self {
        Self {
            width: pix.width(),
            height: pix.height(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of pixels.
    pub fn len(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Always false; a grid has at least one pixel.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Id of pixel `(x, y)`, or `None` outside the grid.
    pub fn id(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| y as usize * self.width as usize + x as usize)
    }

    /// Coordinates of a pixel id.
    pub fn coords(&self, id: usize) -> RegionResult<(u32, u32)> {
        if id >= self.len() {
            return Err(RegionError::OutOfRange {
                id,
                len: self.len(),
            });
        }
        let w = self.width as usize;
        Ok(((id % w) as u32, (id / w) as u32))
    }

    /// In-bounds neighbours of `id` in a fixed order: dx = -1, 0, 1 outer,
    /// dy = -1, 0, 1 inner.
    ///
    /// # Arguments
    ///
    /// * `id` - Pixel id; ids outside the grid have no neighbours
    /// * `connectivity` - Which of the eight surrounding pixels count
    ///
    /// # Returns
    ///
    /// An iterator over the neighbour ids, never yielding `id` itself.
    pub fn neighbors(
        &self,
        id: usize,
        connectivity: ConnectivityType,
    ) -> impl Iterator<Item = usize> + '_ {
        let origin = self.coords(id).ok();
        connectivity
            .offsets()
            .iter()
            .filter_map(move |&(dx, dy)| {
                let (x, y) = origin?;
                let nx = i64::from(x) + dx;
                let ny = i64::from(y) + dy;
                if nx < 0 || ny < 0 || nx >= i64::from(self.width) || ny >= i64::from(self.height)
                {
                    return None;
                }
                Some(ny as usize * self.width as usize + nx as usize)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_coords_bijection() {
        let grid = PixelGrid::new(5, 3).unwrap();
        assert_eq!(grid.len(), 15);
        for id in 0..grid.len() {
            let (x, y) = grid.coords(id).unwrap();
            assert_eq!(grid.id(x, y), Some(id));
        }
        assert_eq!(grid.id(5, 0), None);
        assert_eq!(grid.id(0, 3), None);
    }

    #[test]
    fn test_coords_out_of_range() {
        let grid = PixelGrid::new(2, 2).unwrap();
        assert!(matches!(
            grid.coords(4),
            Err(RegionError::OutOfRange { id: 4, len: 4 })
        ));
    }

    #[test]
    fn test_zero_dimension_rejected() {
        assert!(matches!(
            PixelGrid::new(0, 4),
            Err(RegionError::Core(Error::InvalidDimension { .. }))
        ));
    }

    #[test]
    fn test_neighbor_order_interior() {
        // 3x3 grid, center pixel is id 4
        let grid = PixelGrid::new(3, 3).unwrap();
        let eight: Vec<usize> = grid.neighbors(4, ConnectivityType::EightWay).collect();
        assert_eq!(eight, vec![0, 3, 6, 1, 7, 2, 5, 8]);
        let four: Vec<usize> = grid.neighbors(4, ConnectivityType::FourWay).collect();
        assert_eq!(four, vec![3, 1, 7, 5]);
    }

    #[test]
    fn test_neighbors_at_corner_and_outside() {
        let grid = PixelGrid::new(3, 2).unwrap();
        let corner: Vec<usize> = grid.neighbors(0, ConnectivityType::EightWay).collect();
        assert_eq!(corner, vec![3, 1, 4]);
        assert_eq!(grid.neighbors(6, ConnectivityType::EightWay).count(), 0);
    }

    #[test]
    fn test_single_row() {
        let grid = PixelGrid::new(3, 1).unwrap();
        let middle: Vec<usize> = grid.neighbors(1, ConnectivityType::EightWay).collect();
        assert_eq!(middle, vec![0, 2]);
    }
}
