// Atlas geometry: images, regions, and grid slicing
//
// Atlas space has its origin at the bottom-left corner of the image with y
// growing upward. All sprite offsets in the game are written in this space;
// the flip to top-down texture rows happens only when UVs are computed.

use super::AssetId;
use glam::{UVec2, Vec2};
use image::RgbaImage;
use std::fmt;

/// Geometry misconfiguration, raised when a grid or sprite table is built
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeometryError {
    #[error("{what} must be non-zero")]
    ZeroSize { what: &'static str },

    #[error("Atlas {width}x{height} cannot hold a single {cell_width}x{cell_height} cell")]
    AtlasTooSmall {
        width: u32,
        height: u32,
        cell_width: u32,
        cell_height: u32,
    },

    #[error("Region {region:?} lies outside atlas '{atlas}' ({width}x{height})")]
    RegionOutOfBounds {
        atlas: String,
        region: AtlasRegion,
        width: u32,
        height: u32,
    },
}

/// A decoded atlas image shared between the game and the renderer
pub struct AtlasImage {
    id: AssetId,
    name: String,
    pixels: RgbaImage,
}

impl AtlasImage {
    pub fn new(name: &str, pixels: RgbaImage) -> Self {
        Self {
            id: AssetId::from_path(name),
            name: name.to_string(),
            pixels,
        }
    }

    pub fn id(&self) -> AssetId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> UVec2 {
        UVec2::new(self.pixels.width(), self.pixels.height())
    }

    /// Raw RGBA8 pixels, top row first
    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }
}

impl fmt::Debug for AtlasImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AtlasImage")
            .field("name", &self.name)
            .field("size", &self.size())
            .finish()
    }
}

/// A rectangular region within an atlas, in atlas pixel space
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtlasRegion {
    /// Bottom-left corner (pixels)
    pub x: u32,
    pub y: u32,

    /// Size of the region (pixels)
    pub width: u32,
    pub height: u32,
}

impl AtlasRegion {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A sprite-sized region anchored at a fixed offset
    pub fn sprite(x: u32, y: u32, size: UVec2) -> Self {
        Self::new(x, y, size.x, size.y)
    }

    pub fn min(&self) -> UVec2 {
        UVec2::new(self.x, self.y)
    }

    pub fn max(&self) -> UVec2 {
        UVec2::new(self.x + self.width, self.y + self.height)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    /// Check that the region lies entirely inside an atlas of the given size
    pub fn fits_within(&self, atlas_size: UVec2) -> bool {
        let max = self.max();
        max.x <= atlas_size.x && max.y <= atlas_size.y
    }

    /// Texture coordinates as (top-left, bottom-right), v growing downward
    pub fn uv_rect(&self, atlas_size: UVec2) -> (Vec2, Vec2) {
        let atlas = atlas_size.as_vec2();
        let min = self.min().as_vec2();
        let max = self.max().as_vec2();

        let uv_min = Vec2::new(min.x / atlas.x, (atlas.y - max.y) / atlas.y);
        let uv_max = Vec2::new(max.x / atlas.x, (atlas.y - min.y) / atlas.y);
        (uv_min, uv_max)
    }
}

/// Describes how a sheet of equally sized cells is carved out of an atlas
///
/// A border line of `border` pixels runs left of every column and below every
/// row, and a footer band of `footer` pixels sits underneath the first row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileGridSpec {
    cell_size: UVec2,
    border: u32,
    footer: u32,
    columns: u32,
    rows: u32,
}

impl TileGridSpec {
    /// Create a grid with explicit row and column counts
    pub fn new(
        cell_size: UVec2,
        border: u32,
        footer: u32,
        columns: u32,
        rows: u32,
    ) -> Result<Self, GeometryError> {
        if cell_size.x == 0 || cell_size.y == 0 {
            return Err(GeometryError::ZeroSize { what: "cell size" });
        }
        if columns == 0 {
            return Err(GeometryError::ZeroSize { what: "column count" });
        }
        if rows == 0 {
            return Err(GeometryError::ZeroSize { what: "row count" });
        }

        Ok(Self {
            cell_size,
            border,
            footer,
            columns,
            rows,
        })
    }

    /// Derive row and column counts from the atlas size
    ///
    /// Only cells that fit entirely inside the atlas are counted.
    pub fn fit(
        atlas_size: UVec2,
        cell_size: UVec2,
        border: u32,
        footer: u32,
    ) -> Result<Self, GeometryError> {
        if cell_size.x == 0 || cell_size.y == 0 {
            return Err(GeometryError::ZeroSize { what: "cell size" });
        }

        let columns = contained_cells(atlas_size.x, border, cell_size.x, border);
        let rows = contained_cells(atlas_size.y, footer + border, cell_size.y, border);

        if columns == 0 || rows == 0 {
            return Err(GeometryError::AtlasTooSmall {
                width: atlas_size.x,
                height: atlas_size.y,
                cell_width: cell_size.x,
                cell_height: cell_size.y,
            });
        }

        Self::new(cell_size, border, footer, columns, rows)
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cell_count(&self) -> usize {
        (self.columns * self.rows) as usize
    }

    /// Distance between the origins of neighbouring cells
    pub fn stride(&self) -> UVec2 {
        self.cell_size + UVec2::splat(self.border)
    }

    /// Bottom-left corner of the first cell
    pub fn origin(&self) -> UVec2 {
        UVec2::new(self.border, self.footer + self.border)
    }

    /// Atlas region of the cell at (column, row), row 0 being the bottom row
    pub fn region(&self, column: u32, row: u32) -> AtlasRegion {
        let min = self.origin() + self.stride() * UVec2::new(column, row);
        AtlasRegion::new(min.x, min.y, self.cell_size.x, self.cell_size.y)
    }

    /// Grid coordinates in slicing order: columns left to right, rows bottom to top
    pub fn cells(&self) -> impl Iterator<Item = (u32, u32)> {
        let rows = self.rows;
        (0..self.columns).flat_map(move |column| (0..rows).map(move |row| (column, row)))
    }
}

/// Number of `cell`-sized spans starting at `start`, spaced `cell + gap`
/// apart, that end at or before `extent`
fn contained_cells(extent: u32, start: u32, cell: u32, gap: u32) -> u32 {
    match extent.checked_sub(start + cell) {
        Some(slack) => slack / (cell + gap) + 1,
        None => 0,
    }
}

/// Carve an atlas into the cells of `grid`
///
/// Regions are emitted column by column, left to right, and within a column
/// from the bottom row up. The footer band and border lines are skipped, and
/// slicing stops at the first cell that does not lie entirely inside the
/// atlas, so the output is always a prefix of `grid.cells()`. Placement code
/// depends on this order.
pub fn slice_grid(atlas_size: UVec2, grid: &TileGridSpec) -> Vec<AtlasRegion> {
    grid.cells()
        .map(|(column, row)| grid.region(column, row))
        .take_while(|region| region.fits_within(atlas_size))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CELL: UVec2 = UVec2::new(256, 176);
    const FOOTER: u32 = 181;

    fn slice(atlas: UVec2) -> Vec<AtlasRegion> {
        slice_grid(atlas, &TileGridSpec::fit(atlas, CELL, 1, FOOTER).unwrap())
    }

    #[test]
    fn test_atlas_region_uv_flips_v() {
        let region = AtlasRegion::new(0, 0, 64, 64);
        let (uv_min, uv_max) = region.uv_rect(UVec2::new(256, 256));

        // Bottom-left region maps to the bottom of the texture
        assert_eq!(uv_min, Vec2::new(0.0, 0.75));
        assert_eq!(uv_max, Vec2::new(0.25, 1.0));
    }

    #[test]
    fn test_region_fits_within() {
        let size = UVec2::new(16, 16);
        assert!(AtlasRegion::sprite(0, 0, size).fits_within(UVec2::new(16, 16)));
        assert!(!AtlasRegion::sprite(1, 0, size).fits_within(UVec2::new(16, 16)));
        assert!(!AtlasRegion::sprite(0, 300, size).fits_within(UVec2::new(16, 16)));
    }

    #[test]
    fn test_slice_single_column_bottom_to_top() {
        // One column, two rows, border lines all around
        let atlas = UVec2::new(CELL.x + 2, FOOTER + 2 * CELL.y + 3);
        let regions = slice(atlas);

        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0], AtlasRegion::new(1, 182, 256, 176));
        assert_eq!(regions[1], AtlasRegion::new(1, 359, 256, 176));
    }

    #[test]
    fn test_slice_column_major_order() {
        let atlas = UVec2::new(2 * CELL.x + 3, FOOTER + 2 * CELL.y + 3);
        let regions = slice(atlas);

        let origins: Vec<(u32, u32)> = regions.iter().map(|r| (r.x, r.y)).collect();
        assert_eq!(origins, vec![(1, 182), (1, 359), (258, 182), (258, 359)]);
    }

    #[test]
    fn test_slice_drops_partial_cells() {
        // One pixel short of a second column and a second row: only one cell
        let atlas = UVec2::new(2 * CELL.x + 1, FOOTER + 2 * CELL.y + 1);
        let regions = slice(atlas);

        assert_eq!(regions, vec![AtlasRegion::new(1, 182, 256, 176)]);
        assert!(regions.iter().all(|r| r.fits_within(atlas)));
    }

    #[test]
    fn test_slice_full_overworld_sheet() {
        // 16 x 8 maps with a border around each and the footer underneath
        let atlas = UVec2::new(16 * 257 + 1, FOOTER + 8 * 177 + 1);
        let regions = slice(atlas);

        assert_eq!(regions.len(), 128);
        assert_eq!(regions[7], AtlasRegion::new(1, 182 + 7 * 177, 256, 176));
        assert_eq!(regions[8], AtlasRegion::new(258, 182, 256, 176));
        assert_eq!(regions[127].max(), UVec2::new(16 * 257, FOOTER + 8 * 177));
    }

    #[test]
    fn test_slice_stops_at_atlas_edge() {
        // Grid asks for 2 x 2 cells but the atlas only holds the first column
        let grid = TileGridSpec::new(CELL, 1, FOOTER, 2, 2).unwrap();
        let atlas = UVec2::new(CELL.x + 2, FOOTER + 2 * CELL.y + 3);

        let regions = slice_grid(atlas, &grid);
        assert_eq!(regions.len(), 2);
        assert!(regions.iter().all(|r| r.x == 1));
    }

    #[test]
    fn test_slice_follows_grid_cells() {
        let atlas = UVec2::new(3 * CELL.x + 10, FOOTER + 2 * CELL.y + 40);
        let grid = TileGridSpec::fit(atlas, CELL, 1, FOOTER).unwrap();
        let regions = slice_grid(atlas, &grid);

        assert_eq!(grid.columns(), 3);
        assert_eq!(grid.rows(), 2);
        assert_eq!(grid.cell_count(), regions.len());

        for ((column, row), region) in grid.cells().zip(&regions) {
            assert_eq!(grid.region(column, row), *region);
        }
    }

    #[test]
    fn test_grid_cells_order() {
        let grid = TileGridSpec::new(UVec2::new(8, 8), 0, 0, 2, 3).unwrap();
        let cells: Vec<(u32, u32)> = grid.cells().collect();
        assert_eq!(cells, vec![(0, 0), (0, 1), (0, 2), (1, 0), (1, 1), (1, 2)]);
    }

    #[test]
    fn test_grid_rejects_zero_sizes() {
        assert_eq!(
            TileGridSpec::new(UVec2::new(0, 8), 1, 0, 1, 1),
            Err(GeometryError::ZeroSize { what: "cell size" })
        );
        assert_eq!(
            TileGridSpec::new(UVec2::new(8, 8), 1, 0, 0, 1),
            Err(GeometryError::ZeroSize { what: "column count" })
        );
        assert!(TileGridSpec::fit(UVec2::new(64, 64), UVec2::new(8, 0), 1, 0).is_err());
    }

    #[test]
    fn test_grid_fit_rejects_tiny_atlas() {
        let err = TileGridSpec::fit(UVec2::new(300, 200), CELL, 1, FOOTER).unwrap_err();
        assert!(matches!(err, GeometryError::AtlasTooSmall { .. }));
    }

    #[test]
    fn test_atlas_image_identity() {
        let image = AtlasImage::new("sheet.png", RgbaImage::new(32, 16));
        assert_eq!(image.size(), UVec2::new(32, 16));
        assert_eq!(image.name(), "sheet.png");
        assert_eq!(image.id(), AssetId::from_path("sheet.png"));
    }
}
