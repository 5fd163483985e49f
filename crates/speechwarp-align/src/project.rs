//! Projection of a coarse alignment path onto the next finer grid.

use speechwarp_dtw::{AlignmentPath, GridCell, Window};
use tracing::{debug, instrument};

/// Grow `low_res_path` by `radius` coarse cells and project it onto a
/// `rows x cols` grid that is `upsample` times finer.
///
/// Each coarse cell `(i, j)` within `radius` of the path (Chebyshev distance)
/// marks the `upsample x upsample` block starting at `(i * upsample,
/// j * upsample)`, clipped to the target grid. Marking happens on a dense
/// occupancy grid, which is then compacted row by row into a [`Window`].
///
/// Every allowed column of every row is kept, including disjoint runs.
#[must_use]
#[instrument(skip(low_res_path), fields(path_len = low_res_path.len()))]
pub fn project_window(
    low_res_path: &AlignmentPath,
    rows: usize,
    cols: usize,
    radius: usize,
    upsample: usize,
) -> Window {
    let mut allowed = vec![false; rows * cols];
    // A radius wider than the target grid marks the same cells as one that
    // just spans it.
    let radius = radius.min(rows.max(cols));

    for cell in low_res_path {
        let i_range = cell.i.saturating_sub(radius)..=cell.i.saturating_add(radius);
        for ci in i_range {
            let row_start = ci.saturating_mul(upsample);
            if row_start >= rows {
                break;
            }
            let row_end = row_start.saturating_add(upsample).min(rows);

            let col_start = cell.j.saturating_sub(radius).saturating_mul(upsample);
            let col_end = cell
                .j
                .saturating_add(radius)
                .saturating_add(1)
                .saturating_mul(upsample)
                .min(cols);
            if col_start >= col_end {
                continue;
            }

            for fi in row_start..row_end {
                allowed[fi * cols + col_start..fi * cols + col_end].fill(true);
            }
        }
    }

    let window: Window = (0..rows)
        .flat_map(|i| {
            let row = &allowed[i * cols..(i + 1) * cols];
            row.iter()
                .enumerate()
                .filter(|&(_, &ok)| ok)
                .map(move |(j, _)| GridCell::new(i, j))
        })
        .collect();

    debug!(cells = window.len(), grid = rows * cols, "projected window");
    window
}
