use crate::models::{LayoutSettings, Rect};

/// Column count used before a viewport has a real width.
const FALLBACK_COLUMNS: usize = 4;

/// Fixed-size tile grid.
///
/// Tiles are square, `padding` in from the top-left corner, and `spacing`
/// apart. Rectangles are in content coordinates so they can be registered
/// with the marquee engine directly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    pub tile_size: f32,
    pub padding: f32,
    pub spacing: f32,
}

impl GridLayout {
    pub fn new(tile_size: f32, padding: f32, spacing: f32) -> Self {
        Self {
            tile_size,
            padding,
            spacing,
        }
    }

    pub fn from_settings(tile_size: u32, settings: &LayoutSettings) -> Self {
        Self::new(tile_size as f32, settings.padding, settings.spacing)
    }

    /// Horizontal room one tile takes when estimating columns.
    pub fn approx_item_width(&self) -> f32 {
        self.tile_size + self.padding + self.spacing
    }

    /// Columns that fit in `viewport_width`; at least one.
    pub fn columns(&self, viewport_width: f32) -> usize {
        let approx = self.approx_item_width();
        if viewport_width <= 0.0 || approx <= 0.0 {
            return FALLBACK_COLUMNS;
        }
        ((viewport_width / approx) as usize).max(1)
    }

    pub fn tile_rect(&self, index: usize, columns: usize) -> Rect {
        let columns = columns.max(1);
        let stride = self.tile_size + self.spacing;
        let column = (index % columns) as f32;
        let row = (index / columns) as f32;

        Rect::new(
            self.padding + column * stride,
            self.padding + row * stride,
            self.tile_size,
            self.tile_size,
        )
    }

    /// Lay `keys` out row by row for a viewport of the given width.
    pub fn layout<K, I>(&self, keys: I, viewport_width: f32) -> Vec<(K, Rect)>
    where
        I: IntoIterator<Item = K>,
    {
        let columns = self.columns(viewport_width);
        keys.into_iter()
            .enumerate()
            .map(|(index, key)| (key, self.tile_rect(index, columns)))
            .collect()
    }

    /// Height needed to show `count` tiles.
    pub fn content_height(&self, count: usize, viewport_width: f32) -> f32 {
        if count == 0 {
            return 0.0;
        }
        let rows = count.div_ceil(self.columns(viewport_width)) as f32;
        self.padding * 2.0 + rows * self.tile_size + (rows - 1.0) * self.spacing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> GridLayout {
        GridLayout::new(180.0, 10.0, 20.0)
    }

    #[test]
    fn test_columns() {
        let grid = grid();
        assert_eq!(grid.approx_item_width(), 210.0);
        assert_eq!(grid.columns(1000.0), 4);
        assert_eq!(grid.columns(2100.0), 10);
        assert_eq!(grid.columns(50.0), 1);
    }

    #[test]
    fn test_columns_fallback_without_width() {
        assert_eq!(grid().columns(0.0), FALLBACK_COLUMNS);
        assert_eq!(grid().columns(-5.0), FALLBACK_COLUMNS);
    }

    #[test]
    fn test_tile_rect_wraps() {
        let grid = grid();
        assert_eq!(grid.tile_rect(0, 3), Rect::new(10.0, 10.0, 180.0, 180.0));
        assert_eq!(grid.tile_rect(2, 3), Rect::new(410.0, 10.0, 180.0, 180.0));
        assert_eq!(grid.tile_rect(3, 3), Rect::new(10.0, 210.0, 180.0, 180.0));
    }

    #[test]
    fn test_tiles_do_not_overlap() {
        let grid = grid();
        let rects = grid.layout(0..12, 900.0);
        for (i, (_, a)) in rects.iter().enumerate() {
            for (_, b) in rects.iter().skip(i + 1) {
                assert!(!a.intersects(b), "{:?} overlaps {:?}", a, b);
            }
        }
    }

    #[test]
    fn test_content_height() {
        let grid = grid();
        assert_eq!(grid.content_height(0, 900.0), 0.0);
        // 4 columns at 900px, so 5 tiles take two rows
        assert_eq!(grid.content_height(5, 900.0), 10.0 * 2.0 + 360.0 + 20.0);
    }
}
