//! Masonry column layout.

use gallery_core::Record;

pub const MAX_COLUMNS: usize = 5;

/// (max viewport width, column cap), narrowest first.
const BREAKPOINTS: [(u32, usize); 4] = [(640, 1), (800, 2), (1200, 3), (1600, 4)];

/// Number of columns for `record_count` records at `viewport_width`.
///
/// Never more columns than records; no records means no columns.
pub fn column_count(record_count: usize, viewport_width: Option<u32>) -> usize {
    if record_count == 0 {
        return 0;
    }

    let cap = viewport_width
        .and_then(|width| {
            BREAKPOINTS
                .iter()
                .find(|(max_width, _)| width <= *max_width)
                .map(|(_, columns)| *columns)
        })
        .unwrap_or(MAX_COLUMNS);

    cap.min(record_count)
}

/// Relative card height: image aspect ratio when known, otherwise 1.
pub fn estimated_height(record: &Record) -> f64 {
    record
        .dimensions()
        .map(|(width, height)| height / width)
        .unwrap_or(1.0)
}

/// Packs items into `columns` columns, each item going to the currently
/// shortest column (leftmost on ties).
pub fn masonry<T, F>(items: Vec<T>, columns: usize, height: F) -> Vec<Vec<T>>
where
    F: Fn(&T) -> f64,
{
    if columns == 0 {
        return Vec::new();
    }

    let mut out: Vec<Vec<T>> = (0..columns).map(|_| Vec::new()).collect();
    let mut heights = vec![0.0_f64; columns];

    for item in items {
        let mut target = 0;
        for (i, h) in heights.iter().enumerate() {
            if *h < heights[target] {
                target = i;
            }
        }
        heights[target] += height(&item);
        out[target].push(item);
    }

    out
}
