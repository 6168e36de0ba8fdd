//! The sliding-window diagonal scanner.
//!
//! For every (query offset, subject offset) pair the scan computes the sum
//! of substitution scores over the window of residue pairs ending there
//! along the diagonal, in O(1) amortized time per cell: the score of the
//! incoming pair is added and the score of the pair that left the window
//! is subtracted. Total cost is O(Lq * Ls) regardless of the window
//! length; the window only selects which earlier term is subtracted.
//!
//! Forward passes walk the subject axis in increasing order, the
//! reverse-strand pass walks it in decreasing order, pairing a rising
//! query offset with a falling subject offset along anti-diagonals.

use crate::core::diagnostics::ScanDiagnostics;
use crate::core::diagonal::DiagonalBuffers;
use crate::core::pixelmap::PixelMap;
use crate::core::score_vector::ScoreVector;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanDirection {
    /// Subject offsets processed in increasing order.
    Ascending,
    /// Subject offsets processed in decreasing order.
    Descending,
}

pub struct ScanParams<'a> {
    /// Score lookup table built from this pass's query.
    pub scores: &'a ScoreVector,
    /// Subject residue ids.
    pub subject: &'a [u8],
    /// Window length in residue pairs.
    pub window: usize,
    pub direction: ScanDirection,
    /// Source positions per grid cell.
    pub zoom: f64,
    /// Score-to-intensity scale.
    pub pixel_scale: f64,
    /// Restrict each subject row to columns `q <= s`. Used by the
    /// self-comparison path, whose mirror step supplies the other half.
    pub lower_triangle: bool,
}

/// Windowed score mapped to a grid byte.
#[inline(always)]
pub fn intensity(sum: i32, pixel_scale: f64, window: usize) -> u8 {
    let scaled = (sum as f64 * pixel_scale / window as f64).round();
    scaled.clamp(0.0, 255.0) as u8
}

/// Run one pass over the whole subject, folding every fully-covered
/// positive window into the shared grid by maximum.
pub fn scan_pass(params: &ScanParams<'_>, grid: &mut PixelMap, diag: &ScanDiagnostics) {
    let query_len = params.scores.positions();
    let subject_len = params.subject.len();
    let win = params.window;
    if query_len == 0 || subject_len == 0 || win == 0 {
        return;
    }

    let mut bufs = DiagonalBuffers::new(query_len);
    let mut row = |step: usize, s: usize, bufs: &mut DiagonalBuffers| {
        bufs.rotate();
        let add_row = params.scores.row(params.subject[s]);
        // The residue pair leaving the window sits `win` subject steps
        // back along the scan order.
        let del_row = if step >= win {
            let back = match params.direction {
                ScanDirection::Ascending => s - win,
                ScanDirection::Descending => s + win,
            };
            Some(params.scores.row(params.subject[back]))
        } else {
            None
        };
        let q_end = if params.lower_triangle {
            s.min(query_len - 1)
        } else {
            query_len - 1
        };
        for q in 0..=q_end {
            let mut sum = bufs.upstream(q) + add_row[q];
            if q >= win {
                if let Some(del) = del_row {
                    sum -= del[q - win];
                }
            }
            bufs.set(q, sum);
            // The first win-1 steps and columns never hold a complete
            // window; non-positive sums carry no signal.
            if sum > 0 && step + 1 >= win && q + 1 >= win {
                let x = (q as f64 / params.zoom) as usize;
                let y = (s as f64 / params.zoom) as usize;
                let value = intensity(sum, params.pixel_scale, win);
                if grid.merge_max(x, y, value) {
                    diag.record_emit();
                } else {
                    diag.record_dropped_write();
                    eprintln!(
                        "seqdot: dropped out-of-range grid write at ({}, {}) for offsets ({}, {})",
                        x, y, q, s
                    );
                }
            }
        }
    };

    match params.direction {
        ScanDirection::Ascending => {
            for (step, s) in (0..subject_len).enumerate() {
                row(step, s, &mut bufs);
            }
        }
        ScanDirection::Descending => {
            for (step, s) in (0..subject_len).rev().enumerate() {
                row(step, s, &mut bufs);
            }
        }
    }
}
