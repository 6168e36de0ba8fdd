//! Self-comparison mirroring.
//!
//! When a sequence is compared against itself with a symmetric matrix the
//! scan computes only the lower triangle and this step copies it across
//! the main diagonal. Both the source and destination offsets go through
//! the grid bounds check; an out-of-range offset indicates a geometry bug,
//! so that one copy is dropped with a diagnostic instead of performed.

use crate::core::diagnostics::ScanDiagnostics;
use crate::core::pixelmap::PixelMap;

/// Copy `grid[s][q]` into `grid[q][s]` for all `q < s`. The main diagonal
/// and the already-computed half are left alone.
pub fn mirror_grid(grid: &mut PixelMap, diag: &ScanDiagnostics) {
    let span = grid.width().min(grid.height());
    for s in 0..span {
        for q in 0..s {
            let value = match grid.get(q, s) {
                Some(v) => v,
                None => {
                    diag.record_dropped_write();
                    eprintln!("seqdot: mirror source out of range at ({}, {})", q, s);
                    continue;
                }
            };
            if value == 0 {
                continue;
            }
            if grid.merge_max(s, q, value) {
                diag.record_mirror();
            } else {
                diag.record_dropped_write();
                eprintln!("seqdot: mirror destination out of range at ({}, {})", s, q);
            }
        }
    }
}
